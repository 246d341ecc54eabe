//! Plain-text document rendering of a CV record.
//!
//! Output is a pure function of the record and the format: list order is kept
//! as stored, nothing is sorted or escaped, and empty sections are omitted.

use serde::Serialize;

use crate::models::cv::{CvRecord, Section};

pub mod markdown;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Format {
    #[serde(rename = "md")]
    Markdown,
    #[serde(rename = "txt")]
    Text,
}

impl Format {
    /// `"md"` selects Markdown; any other value selects plain text.
    pub fn parse(raw: &str) -> Self {
        if raw == "md" {
            Format::Markdown
        } else {
            Format::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Markdown => "md",
            Format::Text => "txt",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Markdown => ".md",
            Format::Text => ".txt",
        }
    }
}

pub fn render(cv: &CvRecord, format: Format) -> String {
    match format {
        Format::Markdown => markdown::render(cv),
        Format::Text => text::render(cv),
    }
}

fn heading(section: Section) -> &'static str {
    match section {
        Section::Skills => "Skills",
        Section::Experience => "Experience",
        Section::Projects => "Projects",
        Section::Education => "Education",
        Section::Courses => "Courses",
        Section::Otros => "Other",
    }
}

/// Joins the non-blank parts with `sep`.
fn join_present(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn date_range(start: &str, end: &str) -> String {
    join_present(&[start, end], " - ")
}
