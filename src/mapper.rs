//! Conversion between the persisted backend record and [`ResumeDocument`].
//!
//! The persisted shape groups contact fields separately from the profile,
//! names the employer `name`, stores the education year in `endDate` and keeps
//! interests as plain strings. Conversion is structural only.
//!
//! Two read paths exist:
//! - [`to_document`] is the rendering path: lists come through as stored, and
//!   the templates' section-omission rule hides blank rows.
//! - [`to_editable`] is the editing path: every empty list is padded with one
//!   blank row so an editor always has something to fill in.

use crate::error::MappingError;
use crate::model::{
    Certification, Education, Experience, Named, Personal, Project, ResumeDocument,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInfo {
    pub full_name: String,
    pub designation: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub email: String,
    pub phone_number: String,
    pub location: String,
    #[serde(rename = "linkedIn")]
    pub linked_in: String,
    pub github: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub name: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedEducation {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    /// Legacy records carry the year here instead of in `end_date`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedProject {
    pub title: String,
    pub description: String,
    pub github: String,
    pub live_demo: String,
}

/// A skill or language with the backend's (unused) progress gauge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatedName {
    pub name: String,
    pub progress: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedCertification {
    pub title: String,
    pub issuer: String,
    pub year: String,
    /// Legacy records sometimes date certifications with an end date.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateChoice {
    pub theme: String,
    pub color_palette: Vec<String>,
}

/// The backend's résumé record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedResume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub profile_info: ProfileInfo,
    pub contact_info: ContactInfo,
    pub work_experiences: Vec<WorkExperience>,
    pub educations: Vec<PersistedEducation>,
    pub projects: Vec<PersistedProject>,
    pub skills: Vec<RatedName>,
    pub certifications: Vec<PersistedCertification>,
    pub languages: Vec<RatedName>,
    pub interests: Vec<String>,
    pub template: TemplateChoice,
}

/// A coerced value together with the shape problems found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub issues: Vec<MappingError>,
}

impl<T> Normalized<T> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Stored template and palette identifiers, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSelection {
    pub template_id: Option<String>,
    pub palette_id: Option<String>,
}

/// Editing-path view: the padded document plus the stored selection.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableResume {
    pub document: ResumeDocument,
    pub selection: TemplateSelection,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Walks arbitrary backend JSON, coercing anything malformed.
struct Reader {
    issues: Vec<MappingError>,
}

impl Reader {
    fn object<'a>(
        &mut self,
        parent: &'a Map<String, Value>,
        field: &str,
    ) -> Option<&'a Map<String, Value>> {
        match parent.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                self.issues.push(MappingError::NotAnObject {
                    field: field.to_string(),
                    found: kind_of(other).to_string(),
                });
                None
            }
        }
    }

    fn text(&mut self, parent: Option<&Map<String, Value>>, path: &str, key: &str) -> String {
        match parent.and_then(|p| p.get(key)) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => {
                self.issues.push(MappingError::InvalidScalar {
                    field: format!("{}.{}", path, key),
                    found: kind_of(other).to_string(),
                });
                String::new()
            }
        }
    }

    fn number(&mut self, parent: &Map<String, Value>, key: &str) -> u32 {
        parent
            .get(key)
            .and_then(Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(0)
    }

    /// Collects list entries. Objects go through `from_object`; strings go
    /// through `from_string`, which returns `None` for lists that only hold
    /// records.
    fn list<T>(
        &mut self,
        root: &Map<String, Value>,
        field: &str,
        mut from_object: impl FnMut(&mut Self, &Map<String, Value>, &str) -> T,
        from_string: impl Fn(&str) -> Option<T>,
    ) -> Vec<T> {
        let items = match root.get(field) {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.issues.push(MappingError::NotAList {
                    field: field.to_string(),
                    found: kind_of(other).to_string(),
                });
                return Vec::new();
            }
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = format!("{}[{}]", field, index);
            let converted = match item {
                Value::Object(map) => Some(from_object(self, map, &path)),
                Value::String(s) => from_string(s),
                _ => None,
            };
            match converted {
                Some(entry) => out.push(entry),
                None => self.issues.push(MappingError::InvalidEntry {
                    field: field.to_string(),
                    index,
                    found: kind_of(item).to_string(),
                }),
            }
        }
        out
    }
}

impl PersistedResume {
    /// Reads a record of arbitrary shape without failing.
    pub fn from_value(value: &Value) -> Normalized<PersistedResume> {
        let mut r = Reader { issues: Vec::new() };
        let empty = Map::new();
        let root = match value {
            Value::Object(map) => map,
            other => {
                r.issues.push(MappingError::NotAnObject {
                    field: "record".to_string(),
                    found: kind_of(other).to_string(),
                });
                &empty
            }
        };

        let profile = r.object(root, "profileInfo");
        let contact = r.object(root, "contactInfo");
        let template = r.object(root, "template");

        let record = PersistedResume {
            user_id: root.get("userId").and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            title: root.get("title").and_then(Value::as_str).map(str::to_string),
            profile_info: ProfileInfo {
                full_name: r.text(profile, "profileInfo", "fullName"),
                designation: r.text(profile, "profileInfo", "designation"),
                summary: r.text(profile, "profileInfo", "summary"),
            },
            contact_info: ContactInfo {
                email: r.text(contact, "contactInfo", "email"),
                phone_number: r.text(contact, "contactInfo", "phoneNumber"),
                location: r.text(contact, "contactInfo", "location"),
                linked_in: r.text(contact, "contactInfo", "linkedIn"),
                github: r.text(contact, "contactInfo", "github"),
                website: r.text(contact, "contactInfo", "website"),
            },
            work_experiences: r.list(
                root,
                "workExperiences",
                |r, m, p| WorkExperience {
                    name: r.text(Some(m), p, "name"),
                    role: r.text(Some(m), p, "role"),
                    start_date: r.text(Some(m), p, "startDate"),
                    end_date: r.text(Some(m), p, "endDate"),
                    description: r.text(Some(m), p, "description"),
                },
                |_| None,
            ),
            educations: r.list(
                root,
                "educations",
                |r, m, p| PersistedEducation {
                    institution: r.text(Some(m), p, "institution"),
                    degree: r.text(Some(m), p, "degree"),
                    start_date: r.text(Some(m), p, "startDate"),
                    end_date: r.text(Some(m), p, "endDate"),
                    year: r.text(Some(m), p, "year"),
                },
                |_| None,
            ),
            projects: r.list(
                root,
                "projects",
                |r, m, p| PersistedProject {
                    title: r.text(Some(m), p, "title"),
                    description: r.text(Some(m), p, "description"),
                    github: r.text(Some(m), p, "github"),
                    live_demo: r.text(Some(m), p, "liveDemo"),
                },
                |_| None,
            ),
            skills: r.list(
                root,
                "skills",
                |r, m, p| RatedName {
                    name: r.text(Some(m), p, "name"),
                    progress: r.number(m, "progress"),
                },
                |s| {
                    Some(RatedName {
                        name: s.to_string(),
                        progress: 0,
                    })
                },
            ),
            certifications: r.list(
                root,
                "certifications",
                |r, m, p| PersistedCertification {
                    title: r.text(Some(m), p, "title"),
                    issuer: r.text(Some(m), p, "issuer"),
                    year: r.text(Some(m), p, "year"),
                    end_date: r.text(Some(m), p, "endDate"),
                },
                |_| None,
            ),
            languages: r.list(
                root,
                "languages",
                |r, m, p| RatedName {
                    name: r.text(Some(m), p, "name"),
                    progress: r.number(m, "progress"),
                },
                |s| {
                    Some(RatedName {
                        name: s.to_string(),
                        progress: 0,
                    })
                },
            ),
            // Interests are stored as strings; older records used `{name}`.
            interests: r.list(
                root,
                "interests",
                |r, m, p| r.text(Some(m), p, "name"),
                |s| Some(s.to_string()),
            ),
            template: TemplateChoice {
                theme: r.text(template, "template", "theme"),
                color_palette: template
                    .and_then(|t| t.get("colorPalette"))
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        };

        for issue in &r.issues {
            log::warn!("persisted record coerced: {}", issue);
        }
        Normalized {
            value: record,
            issues: r.issues,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Normalized<PersistedResume>> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }
}

/// Rendering path: persisted record → document, no padding.
pub fn to_document(record: &PersistedResume) -> ResumeDocument {
    let profile = &record.profile_info;
    let contact = &record.contact_info;
    ResumeDocument {
        personal: Personal {
            full_name: profile.full_name.clone(),
            designation: profile.designation.clone(),
            summary: profile.summary.clone(),
            email: contact.email.clone(),
            phone_number: contact.phone_number.clone(),
            location: contact.location.clone(),
            linkedin: contact.linked_in.clone(),
            github: contact.github.clone(),
            website: contact.website.clone(),
        },
        experience: record
            .work_experiences
            .iter()
            .map(|w| Experience {
                company: w.name.clone(),
                role: w.role.clone(),
                start_date: w.start_date.clone(),
                end_date: w.end_date.clone(),
                description: w.description.clone(),
            })
            .collect(),
        education: record
            .educations
            .iter()
            .map(|e| Education {
                institution: e.institution.clone(),
                degree: e.degree.clone(),
                year: first_present(&e.end_date, &e.year),
            })
            .collect(),
        projects: record
            .projects
            .iter()
            .map(|p| Project {
                title: p.title.clone(),
                description: p.description.clone(),
                github: p.github.clone(),
                live_demo: p.live_demo.clone(),
            })
            .collect(),
        skills: record.skills.iter().map(|s| Named::new(s.name.clone())).collect(),
        languages: record
            .languages
            .iter()
            .map(|l| Named::new(l.name.clone()))
            .collect(),
        interests: record.interests.iter().map(Named::new).collect(),
        certifications: record
            .certifications
            .iter()
            .map(|c| Certification {
                title: c.title.clone(),
                issuer: c.issuer.clone(),
                year: first_present(&c.year, &c.end_date),
            })
            .collect(),
    }
}

/// Editing path: like [`to_document`], with every empty list padded with a
/// single blank row.
pub fn to_editable(record: &PersistedResume) -> EditableResume {
    let mut document = to_document(record);
    pad(&mut document.experience);
    pad(&mut document.education);
    pad(&mut document.projects);
    pad(&mut document.skills);
    pad(&mut document.certifications);
    pad(&mut document.languages);
    pad(&mut document.interests);
    EditableResume {
        document,
        selection: selection(record),
    }
}

/// Document → persisted record, storing the render selection alongside.
pub fn to_persisted(
    document: &ResumeDocument,
    template_id: &str,
    palette_id: &str,
) -> PersistedResume {
    let p = &document.personal;
    PersistedResume {
        user_id: None,
        title: None,
        profile_info: ProfileInfo {
            full_name: p.full_name.clone(),
            designation: p.designation.clone(),
            summary: p.summary.clone(),
        },
        contact_info: ContactInfo {
            email: p.email.clone(),
            phone_number: p.phone_number.clone(),
            location: p.location.clone(),
            linked_in: p.linkedin.clone(),
            github: p.github.clone(),
            website: p.website.clone(),
        },
        work_experiences: document
            .experience
            .iter()
            .map(|e| WorkExperience {
                name: e.company.clone(),
                role: e.role.clone(),
                start_date: e.start_date.clone(),
                end_date: e.end_date.clone(),
                description: e.description.clone(),
            })
            .collect(),
        educations: document
            .education
            .iter()
            .map(|e| PersistedEducation {
                institution: e.institution.clone(),
                degree: e.degree.clone(),
                start_date: String::new(),
                end_date: e.year.clone(),
                year: String::new(),
            })
            .collect(),
        projects: document
            .projects
            .iter()
            .map(|p| PersistedProject {
                title: p.title.clone(),
                description: p.description.clone(),
                github: p.github.clone(),
                live_demo: p.live_demo.clone(),
            })
            .collect(),
        skills: document
            .skills
            .iter()
            .map(|s| RatedName {
                name: s.name.clone(),
                progress: 0,
            })
            .collect(),
        certifications: document
            .certifications
            .iter()
            .map(|c| PersistedCertification {
                title: c.title.clone(),
                issuer: c.issuer.clone(),
                year: c.year.clone(),
                end_date: String::new(),
            })
            .collect(),
        languages: document
            .languages
            .iter()
            .map(|l| RatedName {
                name: l.name.clone(),
                progress: 0,
            })
            .collect(),
        // The backend only accepts non-empty strings here.
        interests: document
            .interests
            .iter()
            .map(|i| i.name.clone())
            .filter(|name| !name.trim().is_empty())
            .collect(),
        template: TemplateChoice {
            theme: template_id.to_string(),
            color_palette: vec![palette_id.to_string()],
        },
    }
}

/// The stored template/palette identifiers, blank ones treated as unset.
pub fn selection(record: &PersistedResume) -> TemplateSelection {
    let non_blank = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
    TemplateSelection {
        template_id: non_blank(record.template.theme.as_str()),
        palette_id: record
            .template
            .color_palette
            .first()
            .and_then(|p| non_blank(p.as_str())),
    }
}

fn first_present(preferred: &str, fallback: &str) -> String {
    if preferred.is_empty() {
        fallback.to_string()
    } else {
        preferred.to_string()
    }
}

fn pad<T: Default>(list: &mut Vec<T>) {
    if list.is_empty() {
        list.push(T::default());
    }
}
