use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rfresume::export::{export_blocking, ExportOptions};
use rfresume::rendering::layout::wrap;
use rfresume::rendering::raster::rasterize;
use rfresume::{palette, render, Registry, ResumeDocument};

fn fixture() -> ResumeDocument {
    let json = std::fs::read_to_string("tests/fixtures/full_resume.json").expect("read fixture");
    ResumeDocument::from_json(&json).expect("parse fixture")
}

fn bench_render_templates(c: &mut Criterion) {
    let doc = fixture();
    for id in Registry::builtin().ids() {
        c.bench_function(&format!("render/{}", id), |b| {
            b.iter(|| render(black_box(&doc), id, "blue", true))
        });
    }
}

fn bench_wrap(c: &mut Criterion) {
    let doc = fixture();
    let style = rfresume::rendering::TextStyle::new(
        rfresume::rendering::FontFamily::Serif,
        10.5,
        rfresume::Color::BLACK,
    );
    let text = doc.experience[0].description.repeat(8);
    c.bench_function("layout/wrap", |b| b.iter(|| wrap(black_box(&text), &style, 480.0)));
}

fn bench_rasterize(c: &mut Criterion) {
    let doc = fixture();
    let tree = render(&doc, "premium-modern", "blue", true);
    let surface = ExportOptions::default().surface();
    c.bench_function("raster/premium-modern", |b| {
        b.iter(|| rasterize(black_box(&tree), &surface).unwrap())
    });
}

fn bench_export(c: &mut Criterion) {
    if !cfg!(feature = "pdf") {
        return;
    }
    let doc = fixture();
    let palette = palette::resolve("blue");
    let options = ExportOptions::default();
    c.bench_function("export/ats-classic", |b| {
        b.iter(|| {
            let _ = export_blocking(
                Registry::builtin(),
                black_box(&doc),
                "ats-classic",
                &palette,
                &options,
            );
        })
    });
}

criterion_group!(benches, bench_render_templates, bench_wrap, bench_rasterize, bench_export);
criterion_main!(benches);
