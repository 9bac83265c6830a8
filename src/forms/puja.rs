//! Flat form encoding of the puja editor.
//!
//! HTML forms cannot nest, so every tab's fields are posted on every step:
//! scalar fields once, list rows as repeated keys. `serde_html_form` collects
//! the repeated keys into the `Vec` fields below.

use serde::Deserialize;

use crate::domain::puja::{
    BasicInfo, Benefit, Benefits, BulletList, Details, Faq, Faqs, Package, Packages, PujaDraft,
    Testimonial, Testimonials,
};
use crate::domain::types::PujaId;
use crate::forms::{FormError, optional_text, parse_form_date};
use crate::wizard::PujaTab;

/// Button pressed in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    Next,
    Previous,
    GoTo(PujaTab),
    Add(PujaTab),
    Remove(PujaTab, usize),
}

impl TryFrom<&str> for EditorAction {
    type Error = FormError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        let invalid = || FormError::Invalid(format!("Unknown editor action `{raw}`"));
        let mut parts = raw.trim().split(':');
        let action = match (parts.next(), parts.next(), parts.next()) {
            (Some("next"), None, None) => EditorAction::Next,
            (Some("previous"), None, None) => EditorAction::Previous,
            (Some("goto"), Some(tab), None) => {
                EditorAction::GoTo(PujaTab::parse(tab).ok_or_else(invalid)?)
            }
            (Some("add"), Some(tab), None) => {
                EditorAction::Add(PujaTab::parse(tab).ok_or_else(invalid)?)
            }
            (Some("remove"), Some(tab), Some(index)) => EditorAction::Remove(
                PujaTab::parse(tab).ok_or_else(invalid)?,
                index.parse().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };
        Ok(action)
    }
}

#[derive(Deserialize, Default)]
pub struct PujaEditorForm {
    pub id: Option<String>,
    #[serde(default)]
    pub active_tab: String,
    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub temple: String,
    #[serde(default)]
    pub location: String,
    pub date: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub short_description: String,

    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub significance: String,

    #[serde(default)]
    pub benefit_title: Vec<String>,
    #[serde(default)]
    pub benefit_description: Vec<String>,

    #[serde(default)]
    pub who_should_book: Vec<String>,
    #[serde(default)]
    pub why_perform: Vec<String>,

    #[serde(default)]
    pub package_name: Vec<String>,
    #[serde(default)]
    pub package_price: Vec<String>,
    #[serde(default)]
    pub package_persons: Vec<String>,
    #[serde(default)]
    pub package_description: Vec<String>,

    #[serde(default)]
    pub testimonial_name: Vec<String>,
    #[serde(default)]
    pub testimonial_text: Vec<String>,
    #[serde(default)]
    pub testimonial_rating: Vec<String>,

    #[serde(default)]
    pub faq_question: Vec<String>,
    #[serde(default)]
    pub faq_answer: Vec<String>,
}

fn cell(values: &[String], index: usize) -> String {
    values
        .get(index)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Unparseable numbers become zero so the range rules report them.
fn number<T: std::str::FromStr + Default>(values: &[String], index: usize) -> T {
    cell(values, index).parse().unwrap_or_default()
}

fn rows(columns: &[&Vec<String>]) -> usize {
    columns.iter().map(|c| c.len()).max().unwrap_or(0)
}

impl PujaEditorForm {
    pub fn active_tab(&self) -> PujaTab {
        PujaTab::parse(&self.active_tab).unwrap_or_default()
    }

    pub fn action(&self) -> Result<EditorAction, FormError> {
        EditorAction::try_from(self.action.as_str())
    }

    /// Rebuilds the draft from the posted fields.
    pub fn draft(&self) -> Result<PujaDraft, FormError> {
        let id = optional_text(self.id.as_deref())
            .map(PujaId::new)
            .transpose()?;
        let date = optional_text(self.date.as_deref())
            .map(|raw| parse_form_date(&raw))
            .transpose()?;

        let benefits = (0..rows(&[&self.benefit_title, &self.benefit_description]))
            .map(|i| Benefit {
                title: cell(&self.benefit_title, i),
                description: cell(&self.benefit_description, i),
            })
            .collect();
        let packages = (0..rows(&[
            &self.package_name,
            &self.package_price,
            &self.package_persons,
            &self.package_description,
        ]))
            .map(|i| Package {
                name: cell(&self.package_name, i),
                price: number(&self.package_price, i),
                persons: number(&self.package_persons, i),
                description: cell(&self.package_description, i),
            })
            .collect();
        let testimonials = (0..rows(&[
            &self.testimonial_name,
            &self.testimonial_text,
            &self.testimonial_rating,
        ]))
            .map(|i| Testimonial {
                name: cell(&self.testimonial_name, i),
                text: cell(&self.testimonial_text, i),
                rating: number(&self.testimonial_rating, i),
            })
            .collect();
        let faqs = (0..rows(&[&self.faq_question, &self.faq_answer]))
            .map(|i| Faq {
                question: cell(&self.faq_question, i),
                answer: cell(&self.faq_answer, i),
            })
            .collect();

        Ok(PujaDraft {
            id,
            basic: BasicInfo {
                title: self.title.trim().to_string(),
                temple: self.temple.trim().to_string(),
                location: self.location.trim().to_string(),
                date,
                image_url: self.image_url.trim().to_string(),
                short_description: self.short_description.trim().to_string(),
            },
            details: Details {
                description: self.description.trim().to_string(),
                significance: self.significance.trim().to_string(),
            },
            benefits: Benefits { items: benefits },
            who_should_book: BulletList {
                items: self.who_should_book.iter().map(|s| s.trim().to_string()).collect(),
            },
            why_perform: BulletList {
                items: self.why_perform.iter().map(|s| s.trim().to_string()).collect(),
            },
            packages: Packages { items: packages },
            testimonials: Testimonials {
                items: testimonials,
            },
            faqs: Faqs { items: faqs },
        })
    }
}
