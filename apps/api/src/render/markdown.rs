use crate::models::cv::{CvRecord, OtherItem, Section, WorkItem};
use crate::render::{date_range, heading, join_present};

pub fn render(cv: &CvRecord) -> String {
    let contact = &cv.contact;
    let mut md = String::new();

    if !contact.name.trim().is_empty() {
        md.push_str(&format!("# {}\n\n", contact.name));
    }
    if !contact.title.trim().is_empty() {
        md.push_str(&format!("**{}**\n\n", contact.title));
    }
    let line = join_present(
        &[
            contact.location.as_str(),
            contact.email.as_str(),
            contact.phone.as_str(),
        ],
        " | ",
    );
    if !line.is_empty() {
        md.push_str(&format!("{line}\n\n"));
    }
    if !contact.links.is_empty() {
        for link in contact.links.iter().filter(|l| !l.trim().is_empty()) {
            md.push_str(&format!("- {link}\n"));
        }
        md.push('\n');
    }

    if !cv.summary.trim().is_empty() {
        md.push_str("## Summary\n\n");
        md.push_str(cv.summary.trim_end());
        md.push_str("\n\n");
    }

    if !cv.skills.is_empty() {
        section_heading(&mut md, Section::Skills);
        for skill in &cv.skills {
            let mut entry = bullet(&skill.name);
            if !skill.level.trim().is_empty() {
                entry.push_str(&format!(" ({})", skill.level));
            }
            if !skill.tags.is_empty() {
                entry.push_str(&format!(": {}", skill.tags.join(", ")));
            }
            if entry != "-" {
                md.push_str(&entry);
                md.push('\n');
            }
        }
        md.push('\n');
    }

    work_section(&mut md, Section::Experience, &cv.experience);
    work_section(&mut md, Section::Projects, &cv.projects);

    if !cv.education.is_empty() {
        section_heading(&mut md, Section::Education);
        for edu in &cv.education {
            entry_heading(&mut md, &edu.degree);
            let dates = date_range(&edu.start, &edu.end);
            let line = join_present(&[edu.institution.as_str(), dates.as_str()], " | ");
            if !line.is_empty() {
                md.push_str(&format!("*{line}*\n\n"));
            }
            if !edu.notes.trim().is_empty() {
                md.push_str(&format!("{}\n\n", edu.notes.trim_end()));
            }
        }
    }

    if !cv.courses.is_empty() {
        section_heading(&mut md, Section::Courses);
        for course in &cv.courses {
            let hours = if course.hours.trim().is_empty() {
                String::new()
            } else {
                format!("{} h", course.hours.trim())
            };
            let details = join_present(
                &[course.issuer.as_str(), course.date.as_str(), hours.as_str()],
                ", ",
            );
            let mut entry = bullet(&course.name);
            if !details.is_empty() {
                entry.push_str(&format!(" ({details})"));
            }
            if !course.credential.trim().is_empty() {
                entry.push_str(&format!(". Credential: {}", course.credential));
            }
            if !course.tags.is_empty() {
                entry.push_str(&format!(". Tags: {}", course.tags.join(", ")));
            }
            if entry != "-" {
                md.push_str(&entry);
                md.push('\n');
            }
        }
        md.push('\n');
    }

    if !cv.otros.is_empty() {
        section_heading(&mut md, Section::Otros);
        for other in &cv.otros {
            other_entry(&mut md, other);
        }
    }

    md.truncate(md.trim_end().len());
    md.push('\n');
    md
}

fn section_heading(md: &mut String, section: Section) {
    md.push_str(&format!("## {}\n\n", heading(section)));
}

/// `### title`, omitted for a blank title.
fn entry_heading(md: &mut String, title: &str) {
    if !title.trim().is_empty() {
        md.push_str(&format!("### {title}\n\n"));
    }
}

/// `- **name**`, or a bare `-` for a blank name.
fn bullet(name: &str) -> String {
    if name.trim().is_empty() {
        "-".to_string()
    } else {
        format!("- **{name}**")
    }
}

fn work_section(md: &mut String, section: Section, items: &[WorkItem]) {
    if items.is_empty() {
        return;
    }
    section_heading(md, section);
    for item in items {
        let title = join_present(&[item.title.as_str(), item.company.as_str()], " · ");
        entry_heading(md, &title);
        let dates = date_range(&item.start, &item.end);
        let line = join_present(&[item.location.as_str(), dates.as_str()], " | ");
        if !line.is_empty() {
            md.push_str(&format!("*{line}*\n\n"));
        }
        if !item.description.trim().is_empty() {
            md.push_str(&format!("{}\n\n", item.description.trim_end()));
        }
        if !item.tech.is_empty() {
            md.push_str(&format!("**Tech:** {}\n\n", item.tech.join(", ")));
        }
    }
}

fn other_entry(md: &mut String, other: &OtherItem) {
    entry_heading(md, &other.title);
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
    let line = join_present(&[body, period.as_str()], " | ");
    if !line.is_empty() {
        md.push_str(&format!("*{line}*\n\n"));
    }
    if !other.description.trim().is_empty() {
        md.push_str(&format!("{}\n\n", other.description.trim_end()));
    }
    if !other.tags.is_empty() {
        md.push_str(&format!("**Tags:** {}\n\n", other.tags.join(", ")));
    }
}
