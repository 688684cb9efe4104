//! Text snapshot example - prints what each template puts on the page

use rfresume::{Engine, EngineConfig, RenderMode, ResumeDocument};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("RFox Résumé Engine - Text Snapshot Example\n");

    let engine = Engine::new(EngineConfig::default())?;

    let doc = ResumeDocument::from_json(
        r#"{
            "personal": {
                "fullName": "Jane Doe",
                "designation": "Backend Engineer",
                "email": "jane@example.com",
                "location": "Berlin"
            },
            "experience": [
                {
                    "company": "Globex",
                    "role": "Engineer",
                    "startDate": "2020",
                    "description": "Storage."
                }
            ],
            "skills": [{ "name": "Rust" }, { "name": "SQL" }]
        }"#,
    )?;

    for descriptor in engine.list_templates() {
        println!("{} ({})", descriptor.display_name, descriptor.id);
        println!("{}", "=".repeat(60));

        let tree = engine.render(&doc, descriptor.id, "emerald", RenderMode::Export);
        println!("Sections: {:?}", tree.sections());
        for line in tree.text_content() {
            println!("  {}", line);
        }
        println!("Fingerprint: {}\n", &tree.fingerprint()[..16]);
    }

    Ok(())
}
