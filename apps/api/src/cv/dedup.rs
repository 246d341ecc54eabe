use std::collections::HashSet;

use crate::models::cv::{CvRecord, OtherItem};

/// Identity of an `otros` entry: title, issuing body and period, each trimmed.
/// Older entries used `company`/`start` where newer ones use
/// `institution`/`periodo`; the first non-empty one wins.
fn signature(item: &OtherItem) -> (String, String, String) {
    let body = first_non_empty(&item.institution, item.company());
    let period = first_non_empty(&item.periodo, &item.start);
    (
        item.title.trim().to_string(),
        body.trim().to_string(),
        period.trim().to_string(),
    )
}

fn first_non_empty<'a>(primary: &'a str, fallback: &'a str) -> &'a str {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}

/// Drops repeated `otros` entries, keeping the first occurrence and the
/// original order. Other sections are untouched.
pub fn dedup_otros(mut cv: CvRecord) -> CvRecord {
    let mut seen = HashSet::new();
    cv.otros.retain(|item| seen.insert(signature(item)));
    cv
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn otros(value: serde_json::Value) -> CvRecord {
        serde_json::from_value(json!({ "otros": value })).unwrap()
    }

    #[test]
    fn test_company_start_matches_institution_periodo() {
        let cv = otros(json!([
            {"title": "X", "company": "Y", "start": "2020"},
            {"title": "X", "institution": "Y", "periodo": "2020"}
        ]));
        let cv = dedup_otros(cv);
        assert_eq!(cv.otros.len(), 1);
        assert_eq!(cv.otros[0].company(), "Y");
    }

    #[test]
    fn test_signature_is_trimmed() {
        let cv = otros(json!([
            {"title": "Talk ", "institution": " Conf", "periodo": "2021"},
            {"title": "Talk", "institution": "Conf", "periodo": " 2021 "}
        ]));
        assert_eq!(dedup_otros(cv).otros.len(), 1);
    }

    #[test]
    fn test_keeps_first_and_order() {
        let cv = otros(json!([
            {"title": "A", "description": "first"},
            {"title": "B"},
            {"title": "A", "description": "second"},
            {"title": "C"}
        ]));
        let cv = dedup_otros(cv);
        let titles: Vec<_> = cv.otros.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
        assert_eq!(cv.otros[0].description, "first");
    }

    #[test]
    fn test_different_period_is_distinct() {
        let cv = otros(json!([
            {"title": "X", "institution": "Y", "periodo": "2020"},
            {"title": "X", "institution": "Y", "periodo": "2021"}
        ]));
        assert_eq!(dedup_otros(cv).otros.len(), 2);
    }

    #[test]
    fn test_whitespace_institution_does_not_fall_back() {
        // "  " is non-empty, so company is not consulted; trimmed it becomes "".
        let cv = otros(json!([
            {"title": "X", "institution": "  ", "company": "Y"},
            {"title": "X"}
        ]));
        assert_eq!(dedup_otros(cv).otros.len(), 1);
    }
}
