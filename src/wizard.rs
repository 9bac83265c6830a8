//! Tab state machine of the puja editor.
//!
//! The editor walks a fixed sequence of tabs. Moving forward requires the
//! active tab to validate; moving back is always allowed and clears errors.
//! Submission re-validates every tab.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::domain::puja::{Benefit, Faq, Package, PujaDraft, Testimonial};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PujaTab {
    #[default]
    BasicInfo,
    Details,
    Benefits,
    WhoShouldBook,
    WhyPerform,
    Packages,
    Testimonials,
    Faqs,
}

impl PujaTab {
    pub const ALL: [PujaTab; 8] = [
        PujaTab::BasicInfo,
        PujaTab::Details,
        PujaTab::Benefits,
        PujaTab::WhoShouldBook,
        PujaTab::WhyPerform,
        PujaTab::Packages,
        PujaTab::Testimonials,
        PujaTab::Faqs,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<PujaTab> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<PujaTab> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PujaTab::BasicInfo => "basic_info",
            PujaTab::Details => "details",
            PujaTab::Benefits => "benefits",
            PujaTab::WhoShouldBook => "who_should_book",
            PujaTab::WhyPerform => "why_perform",
            PujaTab::Packages => "packages",
            PujaTab::Testimonials => "testimonials",
            PujaTab::Faqs => "faqs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PujaTab::BasicInfo => "Basic Info",
            PujaTab::Details => "Details",
            PujaTab::Benefits => "Benefits",
            PujaTab::WhoShouldBook => "Who Should Book",
            PujaTab::WhyPerform => "Why Perform",
            PujaTab::Packages => "Packages",
            PujaTab::Testimonials => "Testimonials",
            PujaTab::Faqs => "FAQs",
        }
    }

    pub fn parse(raw: &str) -> Option<PujaTab> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw.trim())
    }

    /// Testimonials and FAQs may be left empty.
    pub fn is_optional(self) -> bool {
        matches!(self, PujaTab::Testimonials | PujaTab::Faqs)
    }
}

/// Field path to message, e.g. `benefits.items[0].title`.
pub type FieldErrors = BTreeMap<String, String>;

/// Flattens nested `validator` output into dotted field paths, keeping the
/// first message reported for each path.
pub fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    out.entry(path).or_insert(message);
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn tab_errors(draft: &PujaDraft, tab: PujaTab) -> FieldErrors {
    let result = match tab {
        PujaTab::BasicInfo => draft.basic.validate(),
        PujaTab::Details => draft.details.validate(),
        PujaTab::Benefits => draft.benefits.validate(),
        PujaTab::WhoShouldBook => draft.who_should_book.validate(),
        PujaTab::WhyPerform => draft.why_perform.validate(),
        PujaTab::Packages => draft.packages.validate(),
        PujaTab::Testimonials => draft.testimonials.validate(),
        PujaTab::Faqs => draft.faqs.validate(),
    };
    let mut out = FieldErrors::new();
    if let Err(errors) = result {
        flatten_errors(tab.as_str(), &errors, &mut out);
    }
    out
}

/// Editor state carried between requests.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PujaEditor {
    pub active_tab: PujaTab,
    pub errors: FieldErrors,
    pub draft: PujaDraft,
}

impl PujaEditor {
    pub fn new(draft: PujaDraft) -> Self {
        Self {
            active_tab: PujaTab::BasicInfo,
            errors: FieldErrors::new(),
            draft,
        }
    }

    pub fn at(mut self, tab: PujaTab) -> Self {
        self.active_tab = tab;
        self
    }

    pub fn is_editing(&self) -> bool {
        self.draft.id.is_some()
    }

    /// Validates the active tab and advances on success. Returns whether the
    /// editor moved.
    pub fn next(&mut self) -> bool {
        self.errors = tab_errors(&self.draft, self.active_tab);
        if !self.errors.is_empty() {
            return false;
        }
        match self.active_tab.next() {
            Some(tab) => {
                self.active_tab = tab;
                true
            }
            None => false,
        }
    }

    pub fn previous(&mut self) {
        self.errors.clear();
        if let Some(tab) = self.active_tab.previous() {
            self.active_tab = tab;
        }
    }

    /// Appends an empty row to the list edited on `tab`, moving there.
    pub fn add_item(&mut self, tab: PujaTab) {
        let draft = &mut self.draft;
        match tab {
            PujaTab::Benefits => draft.benefits.items.push(Benefit::default()),
            PujaTab::WhoShouldBook => draft.who_should_book.items.push(String::new()),
            PujaTab::WhyPerform => draft.why_perform.items.push(String::new()),
            PujaTab::Packages => draft.packages.items.push(Package {
                persons: 1,
                ..Package::default()
            }),
            PujaTab::Testimonials => draft.testimonials.items.push(Testimonial {
                rating: 5,
                ..Testimonial::default()
            }),
            PujaTab::Faqs => draft.faqs.items.push(Faq::default()),
            PujaTab::BasicInfo | PujaTab::Details => return,
        }
        self.active_tab = tab;
        self.errors.clear();
    }

    /// Drops row `index` from the list edited on `tab`; out of range is a no-op.
    pub fn remove_item(&mut self, tab: PujaTab, index: usize) {
        fn drop_at<T>(items: &mut Vec<T>, index: usize) {
            if index < items.len() {
                items.remove(index);
            }
        }
        let draft = &mut self.draft;
        match tab {
            PujaTab::Benefits => drop_at(&mut draft.benefits.items, index),
            PujaTab::WhoShouldBook => drop_at(&mut draft.who_should_book.items, index),
            PujaTab::WhyPerform => drop_at(&mut draft.why_perform.items, index),
            PujaTab::Packages => drop_at(&mut draft.packages.items, index),
            PujaTab::Testimonials => drop_at(&mut draft.testimonials.items, index),
            PujaTab::Faqs => drop_at(&mut draft.faqs.items, index),
            PujaTab::BasicInfo | PujaTab::Details => return,
        }
        self.active_tab = tab;
        self.errors.clear();
    }

    /// Moves to `target`. Jumping back is free; jumping forward passes through
    /// every intermediate tab and stops at the first one that fails.
    pub fn jump_to(&mut self, target: PujaTab) -> bool {
        if target <= self.active_tab {
            self.errors.clear();
            self.active_tab = target;
            return true;
        }
        while self.active_tab < target {
            if !self.next() {
                return false;
            }
        }
        true
    }

    /// Validates every tab. Errors are grouped by tab in tab order; an empty
    /// map means the draft may be submitted. The active tab moves to the first
    /// failing tab.
    pub fn validate_all(&mut self) -> BTreeMap<PujaTab, FieldErrors> {
        let grouped: BTreeMap<PujaTab, FieldErrors> = PujaTab::ALL
            .into_iter()
            .map(|tab| (tab, tab_errors(&self.draft, tab)))
            .filter(|(_, errors)| !errors.is_empty())
            .collect();

        if let Some((tab, errors)) = grouped.iter().next() {
            self.active_tab = *tab;
            self.errors = errors.clone();
        } else {
            self.errors.clear();
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> PujaDraft {
        let mut draft = PujaDraft::default();
        draft.basic.title = "Rudrabhishek".to_string();
        draft.basic.temple = "Kashi Vishwanath".to_string();
        draft.basic.location = "Varanasi".to_string();
        draft.basic.image_url = "https://cdn.example.com/rudra.jpg".to_string();
        draft.basic.short_description = "Abhishek of Lord Shiva".to_string();
        draft.details.description = "A Vedic ritual bathing the Shiva linga.".to_string();
        draft.details.significance = "Removes obstacles".to_string();
        draft.benefits.items = vec![Benefit {
            title: "Peace".to_string(),
            description: "Calm household".to_string(),
        }];
        draft.who_should_book.items = vec!["Families".to_string()];
        draft.why_perform.items = vec!["Monday fasts".to_string()];
        draft.packages.items = vec![Package {
            name: "Individual".to_string(),
            price: 1100,
            persons: 1,
            description: String::new(),
        }];
        draft
    }

    #[test]
    fn next_is_gated_by_the_active_tab() {
        let mut editor = PujaEditor::new(PujaDraft::default());

        assert!(!editor.next());
        assert_eq!(editor.active_tab, PujaTab::BasicInfo);
        assert!(editor.errors.contains_key("basic_info.title"));
        assert!(editor.errors.contains_key("basic_info.image_url"));

        editor.draft = complete_draft();
        assert!(editor.next());
        assert_eq!(editor.active_tab, PujaTab::Details);
        assert!(editor.errors.is_empty());
    }

    #[test]
    fn previous_always_moves_back_and_clears_errors() {
        let mut editor = PujaEditor::new(PujaDraft::default()).at(PujaTab::Packages);
        assert!(!editor.next());
        assert!(!editor.errors.is_empty());

        editor.previous();

        assert_eq!(editor.active_tab, PujaTab::WhyPerform);
        assert!(editor.errors.is_empty());

        let mut first = PujaEditor::default();
        first.previous();
        assert_eq!(first.active_tab, PujaTab::BasicInfo);
    }

    #[test]
    fn jump_forward_stops_at_first_invalid_tab() {
        let mut draft = complete_draft();
        draft.benefits.items.clear();
        let mut editor = PujaEditor::new(draft);

        assert!(!editor.jump_to(PujaTab::Faqs));
        assert_eq!(editor.active_tab, PujaTab::Benefits);
        assert!(editor.errors.contains_key("benefits.items"));

        assert!(editor.jump_to(PujaTab::BasicInfo));
        assert!(editor.errors.is_empty());
    }

    #[test]
    fn optional_tabs_may_be_empty_but_entries_must_be_complete() {
        let mut editor = PujaEditor::new(complete_draft());
        assert!(editor.validate_all().is_empty());

        editor.draft.testimonials.items = vec![Testimonial {
            name: "Asha".to_string(),
            text: String::new(),
            rating: 5,
        }];
        editor.draft.faqs.items = vec![Faq {
            question: "When?".to_string(),
            answer: "Mondays".to_string(),
        }];

        let grouped = editor.validate_all();
        assert_eq!(grouped.len(), 1);
        let errors = &grouped[&PujaTab::Testimonials];
        assert!(errors.contains_key("testimonials.items[0].text"));
        assert_eq!(editor.active_tab, PujaTab::Testimonials);
    }

    #[test]
    fn validate_all_groups_every_failing_tab() {
        let mut editor = PujaEditor::new(PujaDraft::default());

        let grouped = editor.validate_all();

        let tabs: Vec<_> = grouped.keys().copied().collect();
        assert_eq!(
            tabs,
            vec![
                PujaTab::BasicInfo,
                PujaTab::Details,
                PujaTab::Benefits,
                PujaTab::WhoShouldBook,
                PujaTab::WhyPerform,
                PujaTab::Packages,
            ]
        );
        assert_eq!(editor.active_tab, PujaTab::BasicInfo);
    }

    #[test]
    fn tabs_round_trip_through_their_names() {
        for tab in PujaTab::ALL {
            assert_eq!(PujaTab::parse(tab.as_str()), Some(tab));
        }
        assert_eq!(PujaTab::Faqs.next(), None);
        assert!(PujaTab::Faqs.is_optional());
    }

    #[test]
    fn add_and_remove_rows() {
        let mut editor = PujaEditor::new(PujaDraft::default());

        editor.add_item(PujaTab::Faqs);
        editor.add_item(PujaTab::Faqs);
        editor.remove_item(PujaTab::Faqs, 0);
        editor.remove_item(PujaTab::Faqs, 5);

        assert_eq!(editor.active_tab, PujaTab::Faqs);
        assert_eq!(editor.draft.faqs.items.len(), 1);

        editor.add_item(PujaTab::Packages);
        assert_eq!(editor.draft.packages.items[0].persons, 1);
    }
}
