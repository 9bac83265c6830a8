//! DTOs used by the puja bookings table and the puja editor.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::puja::PujaBooking;
use crate::dto::TableFilters;
use crate::pagination::Paginated;
use crate::status::StatusCounts;
use crate::wizard::{FieldErrors, PujaEditor, PujaTab};

pub struct BookingsPageData {
    pub bookings: Paginated<PujaBooking>,
    pub counts: StatusCounts,
    pub filters: TableFilters,
}

/// Tab strip entry.
#[derive(Debug, Serialize)]
pub struct TabView {
    pub name: &'static str,
    pub label: &'static str,
    pub active: bool,
    pub optional: bool,
    pub has_errors: bool,
}

/// Data required to render the editor.
pub struct EditorPageData {
    pub editor: PujaEditor,
    pub tabs: Vec<TabView>,
}

impl EditorPageData {
    pub fn new(editor: PujaEditor) -> Self {
        Self::with_errors(editor, &BTreeMap::new())
    }

    /// Marks every tab listed in `grouped` as failing.
    pub fn with_errors(editor: PujaEditor, grouped: &BTreeMap<PujaTab, FieldErrors>) -> Self {
        let tabs = PujaTab::ALL
            .into_iter()
            .map(|tab| TabView {
                name: tab.as_str(),
                label: tab.label(),
                active: tab == editor.active_tab,
                optional: tab.is_optional(),
                has_errors: grouped.contains_key(&tab)
                    || (tab == editor.active_tab && !editor.errors.is_empty()),
            })
            .collect();
        Self { editor, tabs }
    }
}

/// Result of pressing "Save" in the editor.
pub enum SubmitOutcome {
    Created,
    Updated,
    /// Some tabs failed validation; the editor is re-rendered.
    Invalid(EditorPageData),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::puja::PujaDraft;

    #[test]
    fn tab_strip_marks_optional_and_failing_tabs() {
        let editor = PujaEditor::new(PujaDraft::default());
        let mut grouped = BTreeMap::new();
        grouped.insert(PujaTab::Packages, FieldErrors::new());

        let data = EditorPageData::with_errors(editor, &grouped);

        let optional: Vec<&str> = data
            .tabs
            .iter()
            .filter(|tab| tab.optional)
            .map(|tab| tab.name)
            .collect();
        assert_eq!(
            optional,
            vec![PujaTab::Testimonials.as_str(), PujaTab::Faqs.as_str()]
        );
        assert!(data.tabs[0].active);
        let packages = data
            .tabs
            .iter()
            .find(|tab| tab.name == PujaTab::Packages.as_str())
            .unwrap();
        assert!(packages.has_errors);
    }
}
