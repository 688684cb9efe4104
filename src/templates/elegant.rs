use super::{
    date_range, join_present, labelled, page, Category, Template, TemplateDescriptor, MUTED,
    PAGE_PADDING,
};
use crate::model::{has_section, names, present, visible, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::{fill, text_width, Column, Insets};
use crate::rendering::{
    Align, FontFamily, NodeKind, PageGeometry, PageTree, RenderMode, Rect, Role, SectionKind,
    TextStyle,
};

pub const ID: &str = "premium-elegant";

const INK: Color = Color::hex(0x333333);
const DIVIDER: Color = Color::hex(0xeeeeee);
const GUTTER: f32 = 32.0;

/// Serif, centered and quiet: the accent only marks the name and the
/// underline of each heading.
pub struct Elegant;

fn serif(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Serif, size, INK)
}

/// Heading underlined only as wide as its text.
fn heading(col: &mut Column, text: &str, palette: &Palette) {
    let style = serif(12.0).color(palette.text_color);
    let underline = text_width(text, &style).min(col.width());
    col.text(text, style, Role::Heading);
    col.gap(4.0);
    col.push(fill(Rect::new(col.x(), col.y(), underline, 2.0), palette.primary_color));
    col.gap(2.0 + 16.0);
}

fn main_sections(doc: &ResumeDocument, palette: &Palette, col: &mut Column) {
    if has_section(&doc.experience) {
        col.section(SectionKind::Experience, "Professional Experience", |c| {
            heading(c, "Professional Experience", palette);
            for exp in visible(&doc.experience) {
                c.item(|c| {
                    c.text(&exp.company, serif(11.0).bold(), Role::Body);
                    let meta = join_present(
                        [
                            exp.role.as_str(),
                            date_range(&exp.start_date, &exp.end_date, " — ").as_str(),
                        ],
                        "  |  ",
                    );
                    c.text(&meta, serif(10.0).color(palette.primary_color), Role::Meta);
                    c.gap(4.0);
                    c.text(&exp.description, serif(10.5), Role::Body);
                });
                c.gap(24.0);
            }
        });
        col.gap(8.0);
    }

    if has_section(&doc.projects) {
        col.section(SectionKind::Projects, "Key Projects", |c| {
            heading(c, "Key Projects", palette);
            for proj in visible(&doc.projects) {
                c.item(|c| {
                    c.text(&proj.title, serif(10.5).bold(), Role::Body);
                    c.text(&proj.description, serif(10.0), Role::Body);
                });
                c.gap(16.0);
            }
        });
    }
}

fn side_sections(doc: &ResumeDocument, palette: &Palette, col: &mut Column) {
    let p = &doc.personal;
    let links: Vec<String> = [
        labelled("LinkedIn: ", &p.linkedin),
        labelled("GitHub: ", &p.github),
        labelled("Web: ", &p.website),
    ]
    .into_iter()
    .filter(|l| !l.is_empty())
    .collect();
    if !links.is_empty() {
        col.section(SectionKind::Contact, "Connect", |c| {
            heading(c, "Connect", palette);
            for link in &links {
                c.text(&format!("• {}", link), serif(10.0), Role::Contact);
            }
        });
        col.gap(32.0);
    }

    if has_section(&doc.skills) {
        col.section(SectionKind::Skills, "Expertise", |c| {
            heading(c, "Expertise", palette);
            for name in names(&doc.skills) {
                c.text(&format!("• {}", name), serif(10.0), Role::Body);
                c.gap(4.0);
            }
        });
        col.gap(28.0);
    }

    if has_section(&doc.education) {
        col.section(SectionKind::Education, "Education", |c| {
            heading(c, "Education", palette);
            for edu in visible(&doc.education) {
                c.item(|c| {
                    c.text(&edu.institution, serif(10.0).bold(), Role::Body);
                    let detail = join_present([edu.degree.as_str(), edu.year.as_str()], ", ");
                    c.text(&detail, serif(9.0), Role::Meta);
                });
                c.gap(16.0);
            }
        });
        col.gap(16.0);
    }

    if has_section(&doc.certifications) {
        col.section(SectionKind::Certifications, "Certifications", |c| {
            heading(c, "Certifications", palette);
            for cert in visible(&doc.certifications) {
                let line = join_present([cert.title.as_str(), cert.issuer.as_str()], ", ");
                c.text(&format!("• {}", line), serif(9.0), Role::Body);
                c.gap(4.0);
            }
        });
        col.gap(28.0);
    }

    if has_section(&doc.languages) {
        col.section(SectionKind::Languages, "Languages", |c| {
            heading(c, "Languages", palette);
            c.text(&names(&doc.languages).join(", "), serif(10.0), Role::Body);
        });
        col.gap(32.0);
    }

    if has_section(&doc.interests) {
        col.section(SectionKind::Interests, "Interests", |c| {
            heading(c, "Interests", palette);
            c.text(&names(&doc.interests).join(", "), serif(10.0), Role::Body);
        });
    }
}

impl Template for Elegant {
    fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: ID,
            display_name: "Elegant",
            category: Category::Premium,
            is_premium: true,
            description: "Serif typography and centered layout for a sophisticated look.",
        }
    }

    fn render(&self, doc: &ResumeDocument, palette: &Palette, mode: RenderMode) -> PageTree {
        let p = &doc.personal;
        let width = PageGeometry::A4.width_px();
        let mut col = Column::new(PAGE_PADDING, PAGE_PADDING, width - 2.0 * PAGE_PADDING);

        let centered = |size: f32| serif(size).align(Align::Center);
        let named = col.text(
            &p.full_name,
            centered(22.0).color(palette.primary_color).spacing(2.0).line_height(1.2),
            Role::Name,
        );
        if named {
            col.gap(8.0);
        }
        let titled = col.text(
            &p.designation,
            centered(12.0).italic().color(MUTED),
            Role::Designation,
        );
        let contacts = join_present(
            [p.email.as_str(), p.phone_number.as_str(), p.location.as_str()],
            "  ·  ",
        );
        if (named || titled) && !contacts.is_empty() {
            col.gap(16.0);
        }
        let contacted = col.text(
            &contacts,
            centered(10.0).color(Color::hex(0x555555)),
            Role::Contact,
        );
        if named || titled || contacted {
            col.gap(32.0);
        }

        if let Some(summary) = present(&p.summary) {
            col.section(SectionKind::Summary, "Summary", |c| {
                let inset = c.width() * 0.05;
                c.nest(
                    NodeKind::Container,
                    Insets {
                        left: inset,
                        right: inset,
                        ..Default::default()
                    },
                    None,
                    |c| {
                        c.text(
                            &format!("\"{}\"", summary),
                            centered(11.0).italic().line_height(1.6),
                            Role::Body,
                        );
                    },
                );
            });
            col.gap(24.0);
        }

        let top = col.y();
        let mut divider_x = None;
        col.columns(&[2.0, 1.0], GUTTER, |cols| {
            divider_x = Some(cols[0].x() + cols[0].width() + GUTTER / 2.0);
            let (left, right) = cols.split_at_mut(1);
            main_sections(doc, palette, &mut left[0]);
            side_sections(doc, palette, &mut right[0]);
        });
        let bottom = col.y();
        if let Some(x) = divider_x {
            if bottom > top {
                col.push(fill(Rect::new(x, top, 1.0, bottom - top), DIVIDER));
            }
        }

        page(ID, mode, Color::WHITE, bottom, PAGE_PADDING, col.into_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Personal;

    #[test]
    fn connect_lists_only_present_links() {
        let doc = ResumeDocument {
            personal: Personal {
                github: "github.com/jane".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let tree = Elegant.render(&doc, &Palette::default(), RenderMode::Export);
        assert_eq!(tree.sections(), vec![SectionKind::Contact]);
        let contacts = tree.texts_with_role(Role::Contact);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].source, "• GitHub: github.com/jane");
    }

    #[test]
    fn summary_is_quoted() {
        let doc = ResumeDocument {
            personal: Personal {
                summary: "Builds things.".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let tree = Elegant.render(&doc, &Palette::default(), RenderMode::Export);
        assert!(tree.text_content().contains(&"\"Builds things.\""));
    }
}
