//! The normalized, template-agnostic résumé document.
//!
//! Every scalar is a `String` where blank (empty or whitespace-only) means
//! absent, and every list is a `Vec` that defaults to empty. JSON with missing
//! keys or `null` values therefore deserializes to the same shape as an
//! explicitly empty document.

use serde::{Deserialize, Deserializer, Serialize};

/// Returns `true` when a field should be treated as absent.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns the trimmed value, or `None` when it is blank.
pub fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Personal header block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Personal {
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub designation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub linkedin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub github: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

impl Personal {
    pub fn is_blank(&self) -> bool {
        [
            &self.full_name,
            &self.designation,
            &self.email,
            &self.phone_number,
            &self.location,
            &self.linkedin,
            &self.github,
            &self.website,
            &self.summary,
        ]
        .iter()
        .all(|v| is_blank(v))
    }
}

/// Implemented by every list entry so the section-omission rule can be
/// evaluated uniformly.
pub trait Entry {
    /// The field that names the entry (company, institution, title, name).
    fn identifier(&self) -> &str;

    /// Every scalar of the entry, identifier included.
    fn fields(&self) -> Vec<&str>;

    /// `true` when every field is blank, i.e. an untouched editor row.
    fn is_blank(&self) -> bool {
        self.fields().iter().all(|f| is_blank(f))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

impl Entry for Experience {
    fn identifier(&self) -> &str {
        &self.company
    }

    fn fields(&self) -> Vec<&str> {
        vec![
            &self.company,
            &self.role,
            &self.start_date,
            &self.end_date,
            &self.description,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
}

impl Entry for Education {
    fn identifier(&self) -> &str {
        &self.institution
    }

    fn fields(&self) -> Vec<&str> {
        vec![&self.institution, &self.degree, &self.year]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub github: String,
    #[serde(deserialize_with = "null_as_default")]
    pub live_demo: String,
}

impl Entry for Project {
    fn identifier(&self) -> &str {
        &self.title
    }

    fn fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description, &self.github, &self.live_demo]
    }
}

/// A single named entry: used for skills, languages and interests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Named {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

impl Named {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Entry for Named {
    fn identifier(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
}

impl Entry for Certification {
    fn identifier(&self) -> &str {
        &self.title
    }

    fn fields(&self) -> Vec<&str> {
        vec![&self.title, &self.issuer, &self.year]
    }
}

/// The single shape every template consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub personal: Personal,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<Named>,
    #[serde(deserialize_with = "null_as_default")]
    pub languages: Vec<Named>,
    #[serde(deserialize_with = "null_as_default")]
    pub interests: Vec<Named>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,
}

impl ResumeDocument {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// `true` when the document has no renderable content at all.
    pub fn is_empty(&self) -> bool {
        self.personal.is_blank()
            && !has_section(&self.experience)
            && !has_section(&self.education)
            && !has_section(&self.projects)
            && !has_section(&self.skills)
            && !has_section(&self.languages)
            && !has_section(&self.interests)
            && !has_section(&self.certifications)
    }
}

/// Section-omission rule: a list section is shown only when at least one
/// entry has a non-blank identifying field.
pub fn has_section<E: Entry>(entries: &[E]) -> bool {
    entries.iter().any(|e| !is_blank(e.identifier()))
}

/// The entries a visible section prints: wholly blank rows are skipped.
///
/// Returns an empty iterator when the section itself is omitted.
pub fn visible<E: Entry>(entries: &[E]) -> impl Iterator<Item = &E> {
    let shown = has_section(entries);
    entries.iter().filter(move |e| shown && !e.is_blank())
}

/// Names of the visible entries of a named list, trimmed.
pub fn names(entries: &[Named]) -> Vec<&str> {
    visible(entries).filter_map(|n| present(&n.name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_fields_deserialize_to_defaults() {
        let doc = ResumeDocument::from_json(
            r#"{"personal":{"fullName":"Jane Doe","email":null},"skills":null}"#,
        )
        .unwrap();
        assert_eq!(doc.personal.full_name, "Jane Doe");
        assert_eq!(doc.personal.email, "");
        assert!(doc.skills.is_empty());
        assert!(doc.experience.is_empty());
    }

    #[test]
    fn single_blank_row_hides_section() {
        let rows = vec![Experience::default()];
        assert!(!has_section(&rows));
        assert_eq!(visible(&rows).count(), 0);
    }

    #[test]
    fn blank_identifier_everywhere_hides_section() {
        let rows = vec![Experience {
            role: "Engineer".into(),
            ..Default::default()
        }];
        assert!(!has_section(&rows));
    }

    #[test]
    fn visible_skips_blank_rows_inside_shown_section() {
        let rows = vec![Named::new("Rust"), Named::new("  "), Named::new("Go")];
        assert_eq!(names(&rows), vec!["Rust", "Go"]);
    }

    #[test]
    fn empty_document_is_empty() {
        assert!(ResumeDocument::default().is_empty());
        let mut doc = ResumeDocument::default();
        doc.interests.push(Named::new(""));
        assert!(doc.is_empty());
        doc.personal.full_name = "Jane Doe".into();
        assert!(!doc.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let doc = ResumeDocument {
            projects: vec![Project {
                title: "x".into(),
                live_demo: "demo.dev".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"liveDemo\":\"demo.dev\""));
        assert!(json.contains("\"fullName\""));
    }
}
