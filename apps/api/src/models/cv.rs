use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::lenient;

/// The six list sections of a CV, named as they appear in `cv.json` and in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Skills,
    Experience,
    Projects,
    Education,
    Courses,
    Otros,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::Education,
        Section::Courses,
        Section::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Education => "education",
            Section::Courses => "courses",
            Section::Otros => "otros",
        }
    }

    /// Recognized item fields, in form/display order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Section::Skills => &["name", "level", "tags"],
            Section::Experience | Section::Projects => &[
                "title",
                "company",
                "location",
                "start",
                "end",
                "description",
                "tech",
            ],
            Section::Education => &["degree", "institution", "start", "end", "notes"],
            Section::Courses => &["name", "issuer", "date", "hours", "credential", "tags"],
            Section::Otros => &[
                "title",
                "institution",
                "start",
                "end",
                "periodo",
                "description",
                "tags",
            ],
        }
    }
}

/// Fields holding a list of strings rather than a plain string.
pub fn is_list_field(field: &str) -> bool {
    matches!(field, "tags" | "tech")
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub links: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub level: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Shared shape of `experience` and `projects` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkItem {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tech: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    #[serde(deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(deserialize_with = "lenient::string")]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub issuer: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub hours: String,
    #[serde(deserialize_with = "lenient::string")]
    pub credential: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherItem {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(deserialize_with = "lenient::string")]
    pub periodo: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OtherItem {
    /// Legacy entries carried `company` instead of `institution`.
    pub fn company(&self) -> &str {
        self.extra
            .get("company")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// The whole resume document as persisted in `cv.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvRecord {
    #[serde(deserialize_with = "lenient::or_default")]
    pub contact: Contact,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub skills: Vec<SkillItem>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub experience: Vec<WorkItem>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub projects: Vec<WorkItem>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub education: Vec<EducationItem>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub courses: Vec<CourseItem>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub otros: Vec<OtherItem>,
}

impl CvRecord {
    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Skills => self.skills.len(),
            Section::Experience => self.experience.len(),
            Section::Projects => self.projects.len(),
            Section::Education => self.education.len(),
            Section::Courses => self.courses.len(),
            Section::Otros => self.otros.len(),
        }
    }
}
