use super::{
    date_range, join_present, page, wrapped, Category, Template, TemplateDescriptor, PAGE_PADDING,
};
use crate::model::{has_section, names, present, visible, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::{fill, layout_text, text_width, Column, Decoration, Insets};
use crate::rendering::{
    FontFamily, NodeKind, PageGeometry, PageTree, RenderMode, Rect, Role, SectionKind, TextStyle,
};

pub const ID: &str = "premium-tech";

const INK: Color = Color::hex(0x111111);
const GREY: Color = Color::hex(0x555555);
const FAINT: Color = Color::hex(0x666666);
const TAG: Color = Color::hex(0xeeeeee);
const DASH: Color = Color::hex(0xcccccc);

/// Monospaced, code-flavoured headings.
pub struct Tech;

fn mono(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Mono, size, INK)
}

/// Heading on a grey tag sized to its text.
fn heading(col: &mut Column, text: &str) {
    let style = mono(11.0).bold();
    let pad = 8.0;
    let w = (text_width(text, &style) + 2.0 * pad).min(col.width());
    let (x, y) = (col.x() + pad, col.y());
    if let Some(node) = layout_text(text, style, Role::Heading, x, y, w - 2.0 * pad) {
        let h = node.rect.height;
        col.push(fill(Rect::new(col.x(), col.y(), w, h), TAG));
        col.push(node);
        col.gap(h + 8.0);
    }
}

/// `["a", "b"]`
fn array(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("\"{}\"", s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// `const contact = { email: "…", github: "…" };` over the present fields.
fn contact_object(doc: &ResumeDocument) -> String {
    let p = &doc.personal;
    let fields: Vec<String> = [
        ("email", p.email.as_str()),
        ("phone", p.phone_number.as_str()),
        ("location", p.location.as_str()),
        ("github", p.github.as_str()),
        ("linkedin", p.linkedin.as_str()),
        ("web", p.website.as_str()),
    ]
    .into_iter()
    .filter_map(|(k, v)| present(v).map(|v| format!("{}: \"{}\"", k, v)))
    .collect();
    if fields.is_empty() {
        String::new()
    } else {
        format!("const contact = {{ {} }};", fields.join(", "))
    }
}

fn main_sections(doc: &ResumeDocument, palette: &Palette, col: &mut Column) {
    if has_section(&doc.experience) {
        col.section(SectionKind::Experience, "FUNCTION EXPERIENCE()", |c| {
            heading(c, "FUNCTION EXPERIENCE()");
            for exp in visible(&doc.experience) {
                c.nest(
                    NodeKind::Item,
                    Insets::left(16.0),
                    Some(Decoration::LeftBar { color: DASH, width: 1.0 }),
                    |c| {
                        c.text(&exp.role, mono(10.5).bold(), Role::Body);
                        let meta = join_present(
                            [
                                wrapped("@", &exp.company, "").as_str(),
                                wrapped(
                                    "[",
                                    &date_range(&exp.start_date, &exp.end_date, " - "),
                                    "]",
                                )
                                .as_str(),
                            ],
                            " ",
                        );
                        c.text(&meta, mono(9.0).color(palette.primary_color), Role::Meta);
                        c.gap(4.0);
                        c.text(&exp.description, mono(10.0), Role::Body);
                    },
                );
                c.gap(16.0);
            }
        });
        col.gap(8.0);
    }

    if has_section(&doc.projects) {
        col.section(SectionKind::Projects, "FUNCTION PROJECTS()", |c| {
            heading(c, "FUNCTION PROJECTS()");
            for proj in visible(&doc.projects) {
                c.item(|c| {
                    c.text(&proj.title, mono(10.0).bold(), Role::Body);
                    c.text(&wrapped("// ", &proj.description, ""), mono(9.5), Role::Body);
                    let links =
                        join_present([proj.github.as_str(), proj.live_demo.as_str()], " | ");
                    c.text(&links, mono(9.0).color(palette.primary_color), Role::Meta);
                });
                c.gap(16.0);
            }
        });
    }
}

fn side_sections(doc: &ResumeDocument, col: &mut Column) {
    let lists = [
        (SectionKind::Skills, "ARRAY SKILLS", &doc.skills),
        (SectionKind::Languages, "ARRAY LANGUAGES", &doc.languages),
        (SectionKind::Interests, "ARRAY INTERESTS", &doc.interests),
    ];
    for (kind, title, entries) in lists {
        if has_section(entries) {
            col.section(kind, title, |c| {
                heading(c, title);
                c.text(&array(&names(entries)), mono(9.5).line_height(1.6), Role::Body);
            });
            col.gap(24.0);
        }
    }

    if has_section(&doc.education) {
        col.section(SectionKind::Education, "OBJECT EDUCATION", |c| {
            heading(c, "OBJECT EDUCATION");
            for edu in visible(&doc.education) {
                c.item(|c| {
                    c.text(&edu.institution, mono(10.0).bold(), Role::Body);
                    c.text(&edu.degree, mono(9.5), Role::Body);
                    c.text(&edu.year, mono(9.0).color(GREY), Role::Meta);
                });
                c.gap(16.0);
            }
        });
        col.gap(8.0);
    }

    if has_section(&doc.certifications) {
        col.section(SectionKind::Certifications, "OBJECT CERTIFICATIONS", |c| {
            heading(c, "OBJECT CERTIFICATIONS");
            for cert in visible(&doc.certifications) {
                c.item(|c| {
                    c.text(&cert.title, mono(10.0).bold(), Role::Body);
                    let meta = join_present([cert.issuer.as_str(), cert.year.as_str()], ", ");
                    c.text(&meta, mono(9.0).color(GREY), Role::Meta);
                });
                c.gap(12.0);
            }
        });
    }
}

impl Template for Tech {
    fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: ID,
            display_name: "Tech",
            category: Category::Premium,
            is_premium: true,
            description: "Monospaced font and code-inspired aesthetics for developers.",
        }
    }

    fn render(&self, doc: &ResumeDocument, palette: &Palette, mode: RenderMode) -> PageTree {
        let p = &doc.personal;
        let width = PageGeometry::A4.width_px();
        let mut col = Column::new(PAGE_PADDING, PAGE_PADDING, width - 2.0 * PAGE_PADDING);

        let named = col.text(
            &wrapped("> ", &p.full_name, ""),
            mono(20.0).bold().color(palette.primary_color).line_height(1.2),
            Role::Name,
        );
        let titled = col.text(
            &wrapped("// ", &p.designation, ""),
            mono(12.0).color(GREY),
            Role::Designation,
        );
        let contacts = contact_object(doc);
        if (named || titled) && !contacts.is_empty() {
            col.gap(8.0);
        }
        let contacted = col.text(&contacts, mono(9.0).color(FAINT), Role::Contact);
        if named || titled || contacted {
            col.gap(16.0).rule(palette.primary_color, 2.0).gap(24.0);
        }

        if present(&p.summary).is_some() {
            col.section(SectionKind::Summary, "README", |c| {
                heading(c, "README");
                c.text(&p.summary, mono(10.0).line_height(1.5), Role::Body);
            });
            col.gap(24.0);
        }

        col.columns(&[2.0, 1.0], 24.0, |cols| {
            let (left, right) = cols.split_at_mut(1);
            main_sections(doc, palette, &mut left[0]);
            side_sections(doc, &mut right[0]);
        });

        let bottom = col.y();
        page(ID, mode, Color::WHITE, bottom, PAGE_PADDING, col.into_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Named, Personal};

    #[test]
    fn blank_identity_prints_no_placeholders() {
        let tree = Tech.render(&ResumeDocument::default(), &Palette::default(), RenderMode::Export);
        assert!(tree.text_content().is_empty());
    }

    #[test]
    fn contact_object_lists_present_fields_only() {
        let doc = ResumeDocument {
            personal: Personal {
                email: "a@b.dev".into(),
                github: "gh/a".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            contact_object(&doc),
            "const contact = { email: \"a@b.dev\", github: \"gh/a\" };"
        );
    }

    #[test]
    fn skills_render_as_array_literal() {
        let doc = ResumeDocument {
            skills: vec![Named::new("Rust"), Named::new(""), Named::new("Go")],
            ..Default::default()
        };
        let tree = Tech.render(&doc, &Palette::default(), RenderMode::Export);
        assert!(tree.text_content().contains(&"[\"Rust\", \"Go\"]"));
    }
}
