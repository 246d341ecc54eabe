//! Selection filter: narrows and reorders a record per a client `Selection`.

use crate::models::cv::{CvRecord, Section};
use crate::models::template::{SectionSelection, Selection};

/// Parses the `selection_data` form field. Callers fall back to the unfiltered
/// record on error.
pub fn parse_selection(raw: &str) -> Result<Selection, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Returns a new record restricted to the selected items of each section.
///
/// For a section with a `selected` list, the output is built by walking
/// `order` (default: `0..selected.len()`); each position is looked up in
/// `selected` and the resulting index in the section list. Positions or
/// indices that are out of range, including negative ones, are skipped.
/// Sections without an entry, or without `selected`, are copied whole.
/// `contact` is always copied; `summary` is blanked when
/// `include_summary` is false.
pub fn filter_by_selection(cv: &CvRecord, selection: &Selection) -> CvRecord {
    CvRecord {
        contact: cv.contact.clone(),
        summary: if selection.include_summary {
            cv.summary.clone()
        } else {
            String::new()
        },
        skills: pick(&cv.skills, selection.section(Section::Skills)),
        experience: pick(&cv.experience, selection.section(Section::Experience)),
        projects: pick(&cv.projects, selection.section(Section::Projects)),
        education: pick(&cv.education, selection.section(Section::Education)),
        courses: pick(&cv.courses, selection.section(Section::Courses)),
        otros: pick(&cv.otros, selection.section(Section::Otros)),
    }
}

fn pick<T: Clone>(items: &[T], entry: Option<&SectionSelection>) -> Vec<T> {
    let Some(selected) = entry.and_then(|e| e.selected.as_deref()) else {
        return items.to_vec();
    };

    let lookup = |pos: i64| {
        let idx = *selected.get(usize::try_from(pos).ok()?)?;
        items.get(usize::try_from(idx).ok()?).cloned()
    };

    match entry.and_then(|e| e.order.as_deref()) {
        Some(order) => order.iter().filter_map(|&pos| lookup(pos)).collect(),
        None => (0..selected.len() as i64).filter_map(lookup).collect(),
    }
}
