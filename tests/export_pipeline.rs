#![cfg(feature = "pdf")]

use lopdf::Document;
use rfresume::export::{export_blocking, ExportOptions};
use rfresume::{export_to_pdf, palette, Engine, EngineConfig, ExportError, Registry, ResumeDocument};

fn fixture() -> ResumeDocument {
    let json = std::fs::read_to_string("tests/fixtures/full_resume.json").expect("read fixture");
    ResumeDocument::from_json(&json).expect("parse fixture")
}

fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).expect("valid pdf").get_pages().len()
}

#[tokio::test]
async fn concurrent_exports_are_independent() {
    let doc = fixture();
    let (a, b) = tokio::join!(
        export_to_pdf(&doc, "ats-classic", "blue"),
        export_to_pdf(&doc, "premium-tech", "emerald"),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.template_id, "ats-classic");
    assert_eq!(b.template_id, "premium-tech");
    assert_ne!(a.bytes, b.bytes);
    assert_eq!(page_count(&a.bytes), a.page_count);
    assert_eq!(page_count(&b.bytes), b.page_count);

    // Each matches a lone export of the same input.
    let lone = export_to_pdf(&doc, "ats-classic", "blue").await.unwrap();
    assert_eq!(lone.bytes, a.bytes);
}

#[tokio::test]
async fn export_bytes_are_deterministic() {
    let doc = fixture();
    for id in Registry::builtin().ids() {
        let first = export_to_pdf(&doc, id, "red").await.unwrap();
        let second = export_to_pdf(&doc, id, "red").await.unwrap();
        assert_eq!(first.bytes, second.bytes, "{}", id);
    }
}

#[tokio::test]
async fn short_resume_is_exactly_one_page() {
    let doc = ResumeDocument {
        personal: rfresume::model::Personal {
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    for id in Registry::builtin().ids() {
        let artifact = export_to_pdf(&doc, id, "blue").await.unwrap();
        assert_eq!(artifact.page_count, 1, "{}", id);
        assert_eq!(page_count(&artifact.bytes), 1, "{}", id);
    }
}

#[tokio::test]
async fn overflow_produces_more_pages() {
    let mut doc = fixture();
    let entry = doc.experience[0].clone();
    doc.experience = (0..40)
        .map(|i| {
            let mut e = entry.clone();
            e.company = format!("Company {}", i);
            e
        })
        .collect();
    let artifact = export_to_pdf(&doc, "ats-classic", "blue").await.unwrap();
    assert!(artifact.page_count >= 2);
    assert_eq!(page_count(&artifact.bytes), artifact.page_count);
}

#[test]
fn invalid_options_fail_without_output() {
    let options = ExportOptions {
        pixel_ratio: 0.5,
        ..Default::default()
    };
    let err = export_blocking(
        Registry::builtin(),
        &fixture(),
        "ats-classic",
        &palette::resolve("blue"),
        &options,
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::Rasterize(_)));
}

#[test]
fn page_margins_are_refused_instead_of_spilling() {
    let doc = ResumeDocument {
        personal: rfresume::model::Personal {
            full_name: "Jane Doe".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    let options = ExportOptions {
        margin_mm: 10.0,
        ..Default::default()
    };
    let result = export_blocking(
        Registry::builtin(),
        &doc,
        "ats-classic",
        &palette::resolve("blue"),
        &options,
    );
    assert!(matches!(result, Err(ExportError::Rasterize(_))));

    let artifact = export_blocking(
        Registry::builtin(),
        &doc,
        "ats-classic",
        &palette::resolve("blue"),
        &ExportOptions::default(),
    )
    .unwrap();
    assert_eq!(artifact.page_count, 1);
}

#[tokio::test]
async fn engine_export_many_covers_every_template() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let ids: Vec<String> = engine
        .list_templates()
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    let results = engine.export_many(&fixture(), &ids, "slate").await;
    assert_eq!(results.len(), ids.len());
    for (id, result) in ids.iter().zip(results) {
        let artifact = result.unwrap();
        assert_eq!(&artifact.template_id, id);
        assert!(artifact.to_base64().starts_with("JVBERi0xLjU"));
    }
}
