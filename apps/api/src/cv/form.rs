//! Conversion of submitted HTML-form fields into record values.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::cv::{is_list_field, Contact, Section};

pub type FormFields = HashMap<String, String>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub links: String,
}

impl ContactForm {
    /// Overwrites the contact fields, keeping any unrecognized keys.
    /// Links are comma separated; each piece is trimmed.
    pub fn apply_to(self, contact: &mut Contact) {
        contact.name = self.name;
        contact.title = self.title;
        contact.location = self.location;
        contact.email = self.email;
        contact.phone = self.phone;
        let links = self.links.trim();
        contact.links = if links.is_empty() {
            Vec::new()
        } else {
            links.split(',').map(|l| l.trim().to_string()).collect()
        };
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SummaryForm {
    pub summary: String,
}

/// Splits a comma-separated list, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the recognized fields of a `section` item from form input.
/// Missing fields become empty; every value is trimmed.
pub fn item_fields(section: Section, form: &FormFields) -> Map<String, Value> {
    section
        .fields()
        .iter()
        .map(|&field| {
            let raw = form.get(field).map(|v| v.trim()).unwrap_or("");
            let value = if is_list_field(field) {
                Value::from(split_list(raw))
            } else {
                Value::from(raw)
            };
            (field.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_item_fields_trim_and_split() {
        let fields = item_fields(
            Section::Skills,
            &form(&[("name", " Go "), ("level", "expert"), ("tags", "backend, , cli ")]),
        );
        assert_eq!(fields["name"], "Go");
        assert_eq!(fields["level"], "expert");
        assert_eq!(fields["tags"], serde_json::json!(["backend", "cli"]));
    }

    #[test]
    fn test_item_fields_fill_missing_and_ignore_unknown() {
        let fields = item_fields(
            Section::Experience,
            &form(&[("title", "Dev"), ("salary", "lots")]),
        );
        assert_eq!(fields.len(), Section::Experience.fields().len());
        assert_eq!(fields["company"], "");
        assert_eq!(fields["tech"], serde_json::json!([]));
        assert!(!fields.contains_key("salary"));
    }

    #[test]
    fn test_contact_links_keep_empty_pieces() {
        let mut contact = Contact::default();
        ContactForm {
            name: "Ana".to_string(),
            links: " a.com ,, b.com".to_string(),
            ..Default::default()
        }
        .apply_to(&mut contact);
        assert_eq!(contact.name, "Ana");
        assert_eq!(contact.links, ["a.com", "", "b.com"]);
    }

    #[test]
    fn test_contact_blank_links_clear_list() {
        let mut contact = Contact {
            links: vec!["old".to_string()],
            ..Default::default()
        };
        ContactForm {
            links: "   ".to_string(),
            ..Default::default()
        }
        .apply_to(&mut contact);
        assert!(contact.links.is_empty());
    }
}
