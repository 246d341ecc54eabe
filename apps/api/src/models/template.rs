use serde::{Deserialize, Serialize};

use crate::models::cv::Section;
use crate::models::lenient;

/// Chosen items and their display order for one section.
///
/// `order` holds positions into `selected`, not indices into the section list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<i64>>,
}

/// Client-supplied description of a customized CV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default = "default_true")]
    pub include_summary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<SectionSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<SectionSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<SectionSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<SectionSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<SectionSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otros: Option<SectionSelection>,
}

fn default_true() -> bool {
    true
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            include_summary: true,
            skills: None,
            experience: None,
            projects: None,
            education: None,
            courses: None,
            otros: None,
        }
    }
}

impl Selection {
    pub fn section(&self, section: Section) -> Option<&SectionSelection> {
        match section {
            Section::Skills => self.skills.as_ref(),
            Section::Experience => self.experience.as_ref(),
            Section::Projects => self.projects.as_ref(),
            Section::Education => self.education.as_ref(),
            Section::Courses => self.courses.as_ref(),
            Section::Otros => self.otros.as_ref(),
        }
    }
}

/// A named, saved selection preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created: String,
}
