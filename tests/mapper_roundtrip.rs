use rfresume::mapper::{self, PersistedResume};
use rfresume::rendering::SectionKind;
use rfresume::{render, MappingError, ResumeDocument};

fn fixture() -> ResumeDocument {
    let json = std::fs::read_to_string("tests/fixtures/full_resume.json").expect("read fixture");
    ResumeDocument::from_json(&json).expect("parse fixture")
}

#[test]
fn document_survives_persistence() {
    let doc = fixture();
    let record = mapper::to_persisted(&doc, "premium-tech", "emerald");
    assert_eq!(mapper::to_document(&record), doc);

    let selection = mapper::selection(&record);
    assert_eq!(selection.template_id.as_deref(), Some("premium-tech"));
    assert_eq!(selection.palette_id.as_deref(), Some("emerald"));
}

#[test]
fn persisted_json_round_trips_through_the_lenient_reader() {
    let doc = fixture();
    let record = mapper::to_persisted(&doc, "ats-classic", "blue");
    let json = serde_json::to_value(&record).unwrap();
    let normalized = PersistedResume::from_value(&json);
    assert!(normalized.is_clean(), "{:?}", normalized.issues);
    assert_eq!(mapper::to_document(&normalized.into_inner()), doc);
}

#[test]
fn legacy_record_is_normalized() {
    let json = std::fs::read_to_string("tests/fixtures/persisted_record.json").unwrap();
    let normalized = PersistedResume::from_json(&json).unwrap();
    assert_eq!(
        normalized.issues,
        vec![MappingError::InvalidEntry {
            field: "skills".into(),
            index: 1,
            found: "number".into(),
        }]
    );
    let record = normalized.into_inner();
    let doc = mapper::to_document(&record);

    assert_eq!(doc.personal.full_name, "Sam Lee");
    assert_eq!(doc.experience[0].company, "Acme");
    assert_eq!(doc.education[0].year, "2018");
    assert_eq!(doc.skills.len(), 1);
    let interests: Vec<&str> = rfresume::model::names(&doc.interests);
    assert_eq!(interests, vec!["Surfing", "Photography"]);

    let selection = mapper::selection(&record);
    assert_eq!(selection.template_id.as_deref(), Some("premium-elegant"));
    assert_eq!(selection.palette_id.as_deref(), Some("purple"));
}

#[test]
fn mapped_record_renders_only_populated_sections() {
    let json = std::fs::read_to_string("tests/fixtures/persisted_record.json").unwrap();
    let record = PersistedResume::from_json(&json).unwrap().into_inner();
    let editable = mapper::to_editable(&record);
    // Editing pads the empty lists; rendering must still omit them.
    assert_eq!(editable.document.projects.len(), 1);
    assert_eq!(editable.document.certifications.len(), 1);

    let tree = render(&editable.document, "premium-elegant", "purple", true);
    assert!(!tree.has_section(SectionKind::Projects));
    assert!(!tree.has_section(SectionKind::Certifications));
    assert!(tree.has_section(SectionKind::Experience));
    assert!(tree.has_section(SectionKind::Interests));
}

#[test]
fn garbage_input_never_fails() {
    let normalized = PersistedResume::from_value(&serde_json::json!([1, 2, 3]));
    assert!(!normalized.is_clean());
    let doc = mapper::to_document(&normalized.into_inner());
    assert!(doc.is_empty());
}
