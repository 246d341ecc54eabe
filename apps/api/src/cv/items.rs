//! Index-based item operations over the six section lists.
//!
//! Indices are positions in the list as loaded for the current request; they
//! are not stable identifiers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::cv::{CvRecord, Section};

macro_rules! with_items {
    ($cv:expr, $section:expr, |$items:ident| $body:expr) => {
        match $section {
            Section::Skills => {
                let $items = &$cv.skills;
                $body
            }
            Section::Experience => {
                let $items = &$cv.experience;
                $body
            }
            Section::Projects => {
                let $items = &$cv.projects;
                $body
            }
            Section::Education => {
                let $items = &$cv.education;
                $body
            }
            Section::Courses => {
                let $items = &$cv.courses;
                $body
            }
            Section::Otros => {
                let $items = &$cv.otros;
                $body
            }
        }
    };
}

macro_rules! with_items_mut {
    ($cv:expr, $section:expr, |$items:ident| $body:expr) => {
        match $section {
            Section::Skills => {
                let $items = &mut $cv.skills;
                $body
            }
            Section::Experience => {
                let $items = &mut $cv.experience;
                $body
            }
            Section::Projects => {
                let $items = &mut $cv.projects;
                $body
            }
            Section::Education => {
                let $items = &mut $cv.education;
                $body
            }
            Section::Courses => {
                let $items = &mut $cv.courses;
                $body
            }
            Section::Otros => {
                let $items = &mut $cv.otros;
                $body
            }
        }
    };
}

/// All items of a section as JSON objects, in stored order.
pub fn list(cv: &CvRecord, section: Section) -> Result<Vec<Value>, serde_json::Error> {
    with_items!(cv, section, |items| items
        .iter()
        .map(serde_json::to_value)
        .collect())
}

pub fn get(
    cv: &CvRecord,
    section: Section,
    index: usize,
) -> Result<Option<Value>, serde_json::Error> {
    with_items!(cv, section, |items| items
        .get(index)
        .map(serde_json::to_value)
        .transpose())
}

/// Appends a new item built from `fields`.
pub fn push(
    cv: &mut CvRecord,
    section: Section,
    fields: Map<String, Value>,
) -> Result<(), serde_json::Error> {
    with_items_mut!(cv, section, |items| {
        items.push(serde_json::from_value(Value::Object(fields))?);
        Ok(())
    })
}

/// Overwrites the given fields of the item at `index`, keeping every other key.
/// Returns `false` when `index` is out of range.
pub fn update(
    cv: &mut CvRecord,
    section: Section,
    index: usize,
    fields: Map<String, Value>,
) -> Result<bool, serde_json::Error> {
    with_items_mut!(cv, section, |items| match items.get_mut(index) {
        Some(item) => merge(item, fields).map(|()| true),
        None => Ok(false),
    })
}

/// Removes the item at `index`. Returns `false` when `index` is out of range.
pub fn remove(cv: &mut CvRecord, section: Section, index: usize) -> bool {
    with_items_mut!(cv, section, |items| {
        if index < items.len() {
            items.remove(index);
            true
        } else {
            false
        }
    })
}

fn merge<T>(item: &mut T, fields: Map<String, Value>) -> Result<(), serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut current = match serde_json::to_value(&*item)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    current.extend(fields);
    *item = serde_json::from_value(Value::Object(current))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_push_then_list() {
        let mut cv = CvRecord::default();
        push(
            &mut cv,
            Section::Skills,
            fields(json!({"name": "Go", "level": "expert", "tags": ["backend"]})),
        )
        .unwrap();
        assert_eq!(cv.skills[0].name, "Go");
        assert_eq!(cv.skills[0].tags, ["backend"]);

        let listed = list(&cv, Section::Skills).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["level"], "expert");
        assert!(list(&cv, Section::Courses).unwrap().is_empty());
    }

    #[test]
    fn test_update_keeps_unrecognized_keys() {
        let mut cv: CvRecord = serde_json::from_value(json!({
            "experience": [{"title": "Dev", "company": "ACME", "url": "https://acme"}]
        }))
        .unwrap();
        let updated = update(
            &mut cv,
            Section::Experience,
            0,
            fields(json!({"title": "Lead", "tech": ["rust"]})),
        )
        .unwrap();
        assert!(updated);
        assert_eq!(cv.experience[0].title, "Lead");
        assert_eq!(cv.experience[0].company, "ACME");
        assert_eq!(cv.experience[0].extra["url"], "https://acme");
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut cv = CvRecord::default();
        assert!(!update(&mut cv, Section::Projects, 3, Map::new()).unwrap());
        assert!(!remove(&mut cv, Section::Projects, 0));
        assert!(get(&cv, Section::Projects, 0).unwrap().is_none());
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut cv: CvRecord = serde_json::from_value(json!({
            "education": [{"degree": "A"}, {"degree": "B"}, {"degree": "C"}]
        }))
        .unwrap();
        assert!(remove(&mut cv, Section::Education, 1));
        let degrees: Vec<_> = cv.education.iter().map(|e| e.degree.as_str()).collect();
        assert_eq!(degrees, ["A", "C"]);
        assert_eq!(get(&cv, Section::Education, 1).unwrap().unwrap()["degree"], "C");
    }
}
