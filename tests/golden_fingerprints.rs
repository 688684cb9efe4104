use std::fs;
use std::path::PathBuf;

use rfresume::{render, Registry, ResumeDocument};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

#[test]
fn golden_section_outline_matches_fixture() {
    let json = fs::read_to_string("tests/fixtures/full_resume.json").expect("read fixture");
    let doc = ResumeDocument::from_json(&json).expect("parse fixture");

    let mut lines = Vec::new();
    for id in Registry::builtin().ids() {
        let tree = render(&doc, id, "blue", true);
        let sections = tree.sections();
        let headings = tree.headings();
        assert_eq!(sections.len(), headings.len(), "{}", id);
        for (kind, heading) in sections.iter().zip(headings) {
            lines.push(format!("{} {:?} {}", id, kind, heading));
        }
    }
    let actual = lines.join("\n");

    let expected_path = golden_path("sections.txt");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &actual).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(actual.trim(), expected.trim());
}

#[test]
fn golden_fingerprints_match_fixture() {
    let json = fs::read_to_string("tests/fixtures/full_resume.json").expect("read fixture");
    let doc = ResumeDocument::from_json(&json).expect("parse fixture");

    let mut lines = Vec::new();
    for id in Registry::builtin().ids() {
        for palette in ["blue", "emerald"] {
            let tree = render(&doc, id, palette, true);
            lines.push(format!("{} {} {}", id, palette, tree.fingerprint()));
        }
    }
    let actual = lines.join("\n");

    let expected_path = golden_path("fingerprints.txt");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &actual).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(actual.trim(), expected.trim());
}

#[cfg(feature = "pdf")]
#[tokio::test]
async fn golden_pdf_digest_matches_fixture() {
    use sha2::{Digest, Sha256};

    let json = fs::read_to_string("tests/fixtures/full_resume.json").expect("read fixture");
    let doc = ResumeDocument::from_json(&json).expect("parse fixture");
    let artifact = rfresume::export_to_pdf(&doc, "ats-classic", "blue")
        .await
        .expect("export");
    let digest = hex::encode(Sha256::digest(&artifact.bytes));

    let expected_path = golden_path("ats-classic.pdf.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {:?}; run with UPDATE_GOLDENS=1 to create it. Skipping.",
            expected_path
        );
        return;
    }

    let exp = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, exp.trim());
}
