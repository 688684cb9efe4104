//! rfresume CLI
//!
//! Commands: templates, palettes, render, snapshot, export-all

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rfresume::mapper::{self, PersistedResume};
use rfresume::{palette, Engine, EngineConfig, RenderMode, ResumeDocument, TemplateSelection};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rfresume")]
#[command(about = "Render résumés into templates and export them as PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (JSON); missing keys keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    Templates,

    /// List palettes and their colors
    Palettes,

    /// Render a résumé to PDF
    Render {
        /// Résumé JSON (document shape, or a stored record with --persisted)
        input: PathBuf,

        /// Template ID (defaults to the stored selection, then the engine default)
        #[arg(short, long)]
        template: Option<String>,

        /// Palette name
        #[arg(short, long)]
        palette: Option<String>,

        /// Output path; defaults to INPUT with a .pdf extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat INPUT as a stored backend record
        #[arg(long)]
        persisted: bool,
    },

    /// Print the text content and fingerprint of a render
    Snapshot {
        input: PathBuf,

        #[arg(short, long)]
        template: Option<String>,

        #[arg(short, long)]
        palette: Option<String>,

        /// Render with preview chrome instead of for print
        #[arg(long)]
        interactive: bool,

        #[arg(long)]
        persisted: bool,
    },

    /// Export the résumé under every template
    ExportAll {
        input: PathBuf,

        /// Output directory
        #[arg(short = 'd', long)]
        dir: PathBuf,

        #[arg(short, long)]
        palette: Option<String>,

        #[arg(long)]
        persisted: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Ok(EngineConfig::from_json(&json)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Reads either shape of résumé input along with any stored selection.
fn load_input(path: &Path, persisted: bool) -> anyhow::Result<(ResumeDocument, TemplateSelection)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    if persisted {
        let normalized = PersistedResume::from_json(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        for issue in &normalized.issues {
            eprintln!("warning: {}", issue);
        }
        let record = normalized.into_inner();
        Ok((mapper::to_document(&record), mapper::selection(&record)))
    } else {
        let doc = ResumeDocument::from_json(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok((doc, TemplateSelection::default()))
    }
}

fn pick(flag: Option<String>, stored: Option<String>) -> String {
    flag.or(stored).unwrap_or_default()
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let engine = Engine::new(load_config(cli.config.as_deref())?)?;

    match cli.command {
        Commands::Templates => print_json(&engine.list_templates())?,

        Commands::Palettes => {
            let palettes: Vec<_> = palette::list_palettes()
                .into_iter()
                .map(|name| {
                    let p = palette::resolve(name);
                    serde_json::json!({
                        "name": name,
                        "primaryColor": p.primary_color,
                        "secondaryColor": p.secondary_color,
                        "textColor": p.text_color,
                    })
                })
                .collect();
            print_json(&palettes)?;
        }

        Commands::Render {
            input,
            template,
            palette,
            output,
            persisted,
        } => {
            let (doc, stored) = load_input(&input, persisted)?;
            let template = pick(template, stored.template_id);
            let palette = pick(palette, stored.palette_id);
            let artifact = engine.export_to_pdf(&doc, &template, palette).await?;
            let output = output.unwrap_or_else(|| input.with_extension("pdf"));
            std::fs::write(&output, &artifact.bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "{} ({}, {} page(s), {} bytes)",
                output.display(),
                artifact.template_id,
                artifact.page_count,
                artifact.len()
            );
        }

        Commands::Snapshot {
            input,
            template,
            palette,
            interactive,
            persisted,
        } => {
            let (doc, stored) = load_input(&input, persisted)?;
            let mode = if interactive {
                RenderMode::Interactive
            } else {
                RenderMode::Export
            };
            let tree = engine.render(
                &doc,
                &pick(template, stored.template_id),
                pick(palette, stored.palette_id),
                mode,
            );
            println!("template: {}", tree.template_id);
            println!("sections: {:?}", tree.sections());
            println!("{}", "=".repeat(60));
            for line in tree.text_content() {
                println!("{}", line);
            }
            println!("{}", "=".repeat(60));
            println!("fingerprint: {}", tree.fingerprint());
        }

        Commands::ExportAll {
            input,
            dir,
            palette,
            persisted,
        } => {
            let (doc, stored) = load_input(&input, persisted)?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            let ids: Vec<String> = engine
                .list_templates()
                .iter()
                .map(|t| t.id.to_string())
                .collect();
            let results = engine
                .export_many(&doc, &ids, pick(palette, stored.palette_id))
                .await;

            let mut failed = 0;
            for (id, result) in ids.iter().zip(results) {
                match result {
                    Ok(artifact) => {
                        let path = dir.join(format!("{}.pdf", id));
                        std::fs::write(&path, &artifact.bytes)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("{} ({} page(s))", path.display(), artifact.page_count);
                    }
                    Err(e) => {
                        eprintln!("{}: {}", id, e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                bail!("{} of {} exports failed", failed, ids.len());
            }
        }
    }

    Ok(())
}
