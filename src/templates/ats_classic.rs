use super::{
    bulleted, date_range, join_present, labelled, page, wrapped, Category, Template,
    TemplateDescriptor, PAGE_PADDING,
};
use crate::model::{has_section, names, present, visible, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::{Column, Insets};
use crate::rendering::{
    Align, FontFamily, NodeKind, PageGeometry, PageTree, RenderMode, Role, SectionKind, TextStyle,
};

pub const ID: &str = "ats-classic";

const INK: Color = Color::BLACK;
const SECTION_GAP: f32 = 24.0;

/// Serif, single column, centered header and ruled headings. Ignores the
/// palette: parsers and printers get pure black on white.
pub struct AtsClassic;

fn serif(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Serif, size, INK).line_height(1.3)
}

fn heading(col: &mut Column, text: &str) {
    col.text(text, serif(11.0).bold().uppercase(), Role::Heading);
    col.rule(INK, 1.0).gap(4.0);
}

impl Template for AtsClassic {
    fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: ID,
            display_name: "ATS Classic",
            category: Category::AtsFriendly,
            is_premium: false,
            description: "Clean, simple, and parsing-optimized. Best for corporate applications.",
        }
    }

    fn render(&self, doc: &ResumeDocument, _palette: &Palette, mode: RenderMode) -> PageTree {
        let p = &doc.personal;
        let width = PageGeometry::A4.width_px();
        let mut col = Column::new(PAGE_PADDING, PAGE_PADDING, width - 2.0 * PAGE_PADDING);

        let contacts = join_present(
            [
                p.email.as_str(),
                p.phone_number.as_str(),
                p.location.as_str(),
                labelled("LinkedIn: ", &p.linkedin).as_str(),
                labelled("GitHub: ", &p.github).as_str(),
                labelled("Portfolio: ", &p.website).as_str(),
            ],
            " | ",
        );
        if present(&p.full_name).is_some() || !contacts.is_empty() {
            let name = col.text(
                &p.full_name,
                serif(20.0).bold().uppercase().spacing(1.2).align(Align::Center),
                Role::Name,
            );
            if name {
                col.gap(8.0);
            }
            col.text(&contacts, serif(10.0).align(Align::Center), Role::Contact);
            col.gap(16.0);
            col.rule(INK, 1.0).gap(SECTION_GAP);
        }

        if present(&p.summary).is_some() {
            col.section(SectionKind::Summary, "Professional Summary", |c| {
                heading(c, "Professional Summary");
                c.text(&p.summary, serif(10.5), Role::Body);
            });
            col.gap(SECTION_GAP);
        }

        if has_section(&doc.experience) {
            col.section(SectionKind::Experience, "Experience", |c| {
                heading(c, "Experience");
                for exp in visible(&doc.experience) {
                    c.item(|c| {
                        c.split_row(
                            (&exp.company, serif(11.0).bold(), Role::Body),
                            (
                                &date_range(&exp.start_date, &exp.end_date, " – "),
                                serif(10.0),
                                Role::Meta,
                            ),
                        );
                        c.text(&exp.role, serif(10.0).italic(), Role::Meta);
                        c.nest(NodeKind::Container, Insets::left(16.0), None, |c| {
                            c.gap(4.0);
                            c.text(&bulleted(&exp.description), serif(10.5), Role::Body);
                        });
                    });
                    c.gap(16.0);
                }
            });
            col.gap(SECTION_GAP - 16.0);
        }

        if has_section(&doc.education) {
            col.section(SectionKind::Education, "Education", |c| {
                heading(c, "Education");
                for edu in visible(&doc.education) {
                    c.item(|c| {
                        c.split_row(
                            (&edu.institution, serif(11.0).bold(), Role::Body),
                            (&edu.year, serif(10.0), Role::Meta),
                        );
                        c.text(&edu.degree, serif(10.0), Role::Body);
                    });
                    c.gap(8.0);
                }
            });
            col.gap(SECTION_GAP - 8.0);
        }

        if has_section(&doc.projects) {
            col.section(SectionKind::Projects, "Projects", |c| {
                heading(c, "Projects");
                for proj in visible(&doc.projects) {
                    c.item(|c| {
                        let links = join_present(
                            [
                                wrapped("[Demo] ", &proj.live_demo, "").as_str(),
                                wrapped("[Code] ", &proj.github, "").as_str(),
                            ],
                            "  ",
                        );
                        c.split_row(
                            (&proj.title, serif(10.5).bold(), Role::Body),
                            (&links, serif(10.0), Role::Meta),
                        );
                        c.text(&proj.description, serif(10.0), Role::Body);
                    });
                    c.gap(12.0);
                }
            });
            col.gap(SECTION_GAP - 12.0);
        }

        if has_section(&doc.skills) {
            col.section(SectionKind::Skills, "Skills", |c| {
                heading(c, "Skills");
                c.text(&names(&doc.skills).join(" • "), serif(10.5), Role::Body);
            });
            col.gap(SECTION_GAP);
        }

        if has_section(&doc.languages) {
            col.section(SectionKind::Languages, "Languages", |c| {
                heading(c, "Languages");
                c.text(&names(&doc.languages).join(" • "), serif(10.5), Role::Body);
            });
            col.gap(SECTION_GAP);
        }

        if has_section(&doc.certifications) {
            col.section(SectionKind::Certifications, "Certifications", |c| {
                heading(c, "Certifications");
                for cert in visible(&doc.certifications) {
                    let line = join_present(
                        [
                            join_present([cert.title.as_str(), cert.issuer.as_str()], ", ")
                                .as_str(),
                            wrapped("(", &cert.year, ")").as_str(),
                        ],
                        " ",
                    );
                    c.text(&format!("• {}", line), serif(10.5), Role::Body);
                }
            });
            col.gap(SECTION_GAP);
        }

        if has_section(&doc.interests) {
            col.section(SectionKind::Interests, "Interests", |c| {
                heading(c, "Interests");
                c.text(&names(&doc.interests).join(", "), serif(10.5), Role::Body);
            });
            col.gap(SECTION_GAP);
        }

        let bottom = col.y() - SECTION_GAP;
        page(ID, mode, Color::WHITE, bottom, PAGE_PADDING, col.into_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Certification, Experience};

    #[test]
    fn bullets_every_description_line() {
        let doc = ResumeDocument {
            experience: vec![Experience {
                company: "Acme".into(),
                description: "Shipped things\nFixed things".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let tree = AtsClassic.render(&doc, &Palette::default(), RenderMode::Export);
        let text = tree.text_content();
        assert!(text.contains(&"• Shipped things"));
        assert!(text.contains(&"• Fixed things"));
    }

    #[test]
    fn certification_without_issuer_has_no_dangling_comma() {
        let doc = ResumeDocument {
            certifications: vec![Certification {
                title: "CKA".into(),
                year: "2023".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let tree = AtsClassic.render(&doc, &Palette::default(), RenderMode::Export);
        assert!(tree.text_content().contains(&"• CKA (2023)"));
    }

    #[test]
    fn palette_does_not_change_output() {
        let doc = ResumeDocument::default();
        let a = AtsClassic.render(&doc, &crate::palette::resolve("red"), RenderMode::Export);
        let b = AtsClassic.render(&doc, &crate::palette::resolve("blue"), RenderMode::Export);
        assert_eq!(a, b);
    }
}
