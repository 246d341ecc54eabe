use crate::models::cv::{CvRecord, OtherItem, Section, WorkItem};
use crate::render::{date_range, heading, join_present};

pub fn render(cv: &CvRecord) -> String {
    let contact = &cv.contact;
    let mut txt = String::new();

    let header = [
        contact.name.trim().to_uppercase(),
        contact.title.trim().to_string(),
        join_present(
            &[
                contact.location.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
            ],
            " | ",
        ),
    ];
    for line in header.iter().filter(|l| !l.is_empty()) {
        txt.push_str(line);
        txt.push('\n');
    }
    for link in contact.links.iter().filter(|l| !l.trim().is_empty()) {
        txt.push_str(&format!("{link}\n"));
    }
    if !txt.is_empty() {
        txt.push('\n');
    }

    if !cv.summary.trim().is_empty() {
        underline(&mut txt, "Summary");
        txt.push_str(cv.summary.trim_end());
        txt.push_str("\n\n");
    }

    if !cv.skills.is_empty() {
        underline(&mut txt, heading(Section::Skills));
        for skill in &cv.skills {
            let mut entry = if skill.name.trim().is_empty() {
                "-".to_string()
            } else {
                format!("- {}", skill.name)
            };
            if !skill.level.trim().is_empty() {
                entry.push_str(&format!(" ({})", skill.level));
            }
            if !skill.tags.is_empty() {
                entry.push_str(&format!(": {}", skill.tags.join(", ")));
            }
            if entry != "-" {
                txt.push_str(&entry);
                txt.push('\n');
            }
        }
        txt.push('\n');
    }

    work_section(&mut txt, Section::Experience, &cv.experience);
    work_section(&mut txt, Section::Projects, &cv.projects);

    if !cv.education.is_empty() {
        underline(&mut txt, heading(Section::Education));
        for edu in &cv.education {
            bullet(&mut txt, &edu.degree);
            let dates = date_range(&edu.start, &edu.end);
            indented(&mut txt, &join_present(&[edu.institution.as_str(), dates.as_str()], " | "));
            indented(&mut txt, &edu.notes);
        }
        txt.push('\n');
    }

    if !cv.courses.is_empty() {
        underline(&mut txt, heading(Section::Courses));
        for course in &cv.courses {
            bullet(&mut txt, &course.name);
            let hours = if course.hours.trim().is_empty() {
                String::new()
            } else {
                format!("{} h", course.hours.trim())
            };
            indented(
                &mut txt,
                &join_present(
                    &[course.issuer.as_str(), course.date.as_str(), hours.as_str()],
                    ", ",
                ),
            );
            if !course.credential.trim().is_empty() {
                indented(&mut txt, &format!("Credential: {}", course.credential));
            }
            if !course.tags.is_empty() {
                indented(&mut txt, &format!("Tags: {}", course.tags.join(", ")));
            }
        }
        txt.push('\n');
    }

    if !cv.otros.is_empty() {
        underline(&mut txt, heading(Section::Otros));
        for other in &cv.otros {
            other_entry(&mut txt, other);
        }
        txt.push('\n');
    }

    txt.truncate(txt.trim_end().len());
    txt.push('\n');
    txt
}

fn underline(txt: &mut String, title: &str) {
    let title = title.to_uppercase();
    txt.push_str(&format!("{title}\n{}\n", "=".repeat(title.chars().count())));
}

/// `- label`, omitted for a blank label.
fn bullet(txt: &mut String, label: &str) {
    if !label.trim().is_empty() {
        txt.push_str(&format!("- {label}\n"));
    }
}

/// Writes `text` indented under the current bullet. Inner blank lines are
/// kept as bare newlines; leading and trailing blank lines are dropped.
fn indented(txt: &mut String, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return;
    };
    let last = lines.iter().rposition(|l| !l.trim().is_empty()).unwrap_or(first);
    for line in &lines[first..=last] {
        if line.trim().is_empty() {
            txt.push('\n');
        } else {
            txt.push_str(&format!("  {line}\n"));
        }
    }
}

fn work_section(txt: &mut String, section: Section, items: &[WorkItem]) {
    if items.is_empty() {
        return;
    }
    underline(txt, heading(section));
    for item in items {
        let title = join_present(&[item.title.as_str(), item.company.as_str()], " · ");
        bullet(txt, &title);
        let dates = date_range(&item.start, &item.end);
        indented(txt, &join_present(&[item.location.as_str(), dates.as_str()], " | "));
        indented(txt, &item.description);
        if !item.tech.is_empty() {
            indented(txt, &format!("Tech: {}", item.tech.join(", ")));
        }
    }
    txt.push('\n');
}

fn other_entry(txt: &mut String, other: &OtherItem) {
    bullet(txt, &other.title);
    let body = if other.institution.is_empty() {
        other.company()
    } else {
        other.institution.as_str()
    };
    let period = if other.periodo.trim().is_empty() {
        date_range(&other.start, &other.end)
    } else {
        other.periodo.clone()
    };
    indented(txt, &join_present(&[body, period.as_str()], " | "));
    indented(txt, &other.description);
    if !other.tags.is_empty() {
        indented(txt, &format!("Tags: {}", other.tags.join(", ")));
    }
}
