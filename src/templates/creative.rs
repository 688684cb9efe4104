use super::{date_range, join_present, page, Category, Template, TemplateDescriptor};
use crate::model::{has_section, names, present, visible, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::{fill, ChipStyle, Column, Decoration, Insets};
use crate::rendering::{
    Align, FontFamily, Node, NodeKind, PageGeometry, PageTree, RenderMode, Rect, Role,
    SectionKind, TextStyle,
};

pub const ID: &str = "premium-creative";

const SIDE: f32 = 40.0;
const BAND_PAD: f32 = 32.0;
/// How far the contact card rides up into the header band.
const CARD_OVERLAP: f32 = 24.0;
const INK: Color = Color::hex(0x1f2937);
const GREY: Color = Color::hex(0x6b7280);
const CARD_EDGE: Color = Color::hex(0xe5e7eb);

pub struct Creative;

fn sans(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Sans, size, INK)
}

fn heading(col: &mut Column, text: &str, palette: &Palette, gap: f32) {
    col.text(text, sans(14.0).bold().color(palette.primary_color), Role::Heading);
    col.gap(gap);
}

fn header(doc: &ResumeDocument, palette: &Palette, width: f32) -> (Vec<Node>, f32) {
    let p = &doc.personal;
    let mut band = Column::new(SIDE, BAND_PAD, width - 2.0 * SIDE);
    band.text(
        &p.full_name,
        sans(28.0).bold().color(Color::WHITE).spacing(-0.5).line_height(1.2),
        Role::Name,
    );
    band.text(
        &p.designation,
        sans(14.0).color(palette.primary_color.mix(Color::WHITE, 0.9)),
        Role::Designation,
    );
    let band_bottom = band.y() + BAND_PAD + CARD_OVERLAP;
    let mut nodes = vec![fill(Rect::new(0.0, 0.0, width, band_bottom), palette.primary_color)];
    nodes.extend(band.into_nodes());
    (nodes, band_bottom)
}

fn contact_card(doc: &ResumeDocument, col: &mut Column) {
    let p = &doc.personal;
    let items: Vec<&str> = [
        p.email.as_str(),
        p.phone_number.as_str(),
        p.location.as_str(),
        p.linkedin.as_str(),
        p.website.as_str(),
    ]
    .into_iter()
    .filter_map(present)
    .collect();
    if items.is_empty() {
        return;
    }
    col.nest(
        NodeKind::Container,
        Insets::all(16.0),
        Some(Decoration::Card {
            fill: Some(Color::WHITE),
            stroke: Some(CARD_EDGE),
            radius: 8.0,
        }),
        |c| {
            let weights = vec![1.0; items.len()];
            c.columns(&weights, 8.0, |cells| {
                for (cell, item) in cells.iter_mut().zip(&items) {
                    cell.text(item, sans(9.0).align(Align::Center), Role::Contact);
                }
            });
        },
    );
}

fn left_column(doc: &ResumeDocument, palette: &Palette, col: &mut Column) {
    let p = &doc.personal;

    if present(&p.summary).is_some() {
        col.section(SectionKind::Summary, "About Me", |c| {
            heading(c, "About Me", palette, 8.0);
            c.text(&p.summary, sans(10.5).color(GREY).line_height(1.5), Role::Body);
        });
        col.gap(24.0);
    }

    if has_section(&doc.experience) {
        col.section(SectionKind::Experience, "Work Experience", |c| {
            heading(c, "Work Experience", palette, 16.0);
            for exp in visible(&doc.experience) {
                c.nest(
                    NodeKind::Item,
                    Insets::left(16.0),
                    Some(Decoration::LeftBar {
                        color: palette.secondary_color,
                        width: 3.0,
                    }),
                    |c| {
                        c.text(&exp.role, sans(12.0).bold(), Role::Body);
                        let meta = join_present(
                            [
                                exp.company.as_str(),
                                date_range(&exp.start_date, &exp.end_date, " - ").as_str(),
                            ],
                            "  •  ",
                        );
                        c.text(&meta, sans(10.0).color(palette.primary_color), Role::Meta);
                        c.gap(4.0);
                        c.text(&exp.description, sans(10.5), Role::Body);
                    },
                );
                c.gap(24.0);
            }
        });
    }

    if has_section(&doc.projects) {
        col.section(SectionKind::Projects, "Recent Projects", |c| {
            heading(c, "Recent Projects", palette, 16.0);
            for proj in visible(&doc.projects) {
                c.item(|c| {
                    c.text(&proj.title, sans(11.0).bold(), Role::Body);
                    c.gap(4.0);
                    c.text(&proj.description, sans(10.0), Role::Body);
                    let links =
                        join_present([proj.live_demo.as_str(), proj.github.as_str()], "  •  ");
                    c.text(&links, sans(9.0).color(palette.primary_color), Role::Meta);
                });
                c.gap(16.0);
            }
        });
    }
}

fn right_column(doc: &ResumeDocument, palette: &Palette, col: &mut Column) {
    if has_section(&doc.skills) {
        col.section(SectionKind::Skills, "Skills", |c| {
            heading(c, "Skills", palette, 12.0);
            let chips = ChipStyle {
                text: sans(9.0).bold().color(palette.primary_color),
                fill: None,
                stroke: Some(palette.primary_color),
                radius: 12.0,
                pad_x: 8.0,
                pad_y: 3.0,
                gap: 4.0,
            };
            c.chips(&names(&doc.skills), &chips, Role::Label);
        });
        col.gap(32.0);
    }

    if has_section(&doc.education) {
        col.section(SectionKind::Education, "Education", |c| {
            heading(c, "Education", palette, 12.0);
            for edu in visible(&doc.education) {
                c.nest(
                    NodeKind::Item,
                    Insets::all(12.0),
                    Some(Decoration::Card {
                        fill: Some(palette.secondary_color),
                        stroke: None,
                        radius: 8.0,
                    }),
                    |c| {
                        c.text(&edu.institution, sans(10.5).bold(), Role::Body);
                        c.text(&edu.degree, sans(9.5), Role::Body);
                        c.text(&edu.year, sans(9.0).color(GREY), Role::Meta);
                    },
                );
                c.gap(12.0);
            }
        });
        col.gap(20.0);
    }

    if has_section(&doc.certifications) {
        col.section(SectionKind::Certifications, "Certifications", |c| {
            heading(c, "Certifications", palette, 12.0);
            for cert in visible(&doc.certifications) {
                c.item(|c| {
                    c.text(&cert.title, sans(10.0).bold(), Role::Body);
                    let meta = join_present([cert.issuer.as_str(), cert.year.as_str()], " · ");
                    c.text(&meta, sans(9.0).color(GREY), Role::Meta);
                });
                c.gap(8.0);
            }
        });
        col.gap(24.0);
    }

    if has_section(&doc.languages) {
        col.section(SectionKind::Languages, "Languages", |c| {
            heading(c, "Languages", palette, 12.0);
            c.text(&names(&doc.languages).join(", "), sans(10.0), Role::Body);
        });
        col.gap(32.0);
    }

    if has_section(&doc.interests) {
        col.section(SectionKind::Interests, "Interests", |c| {
            heading(c, "Interests", palette, 12.0);
            c.text(&names(&doc.interests).join(", "), sans(10.0), Role::Body);
        });
    }
}

impl Template for Creative {
    fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: ID,
            display_name: "Creative",
            category: Category::Premium,
            is_premium: true,
            description: "Bold header and unique geometry. Stand out in creative fields.",
        }
    }

    fn render(&self, doc: &ResumeDocument, palette: &Palette, mode: RenderMode) -> PageTree {
        let width = PageGeometry::A4.width_px();
        let (mut children, band_bottom) = header(doc, palette, width);

        let mut body = Column::new(SIDE, band_bottom - CARD_OVERLAP, width - 2.0 * SIDE);
        contact_card(doc, &mut body);
        body.advance_to(band_bottom);
        body.gap(24.0);
        body.columns(&[7.0, 5.0], 32.0, |cols| {
            let (left, right) = cols.split_at_mut(1);
            left_column(doc, palette, &mut left[0]);
            right_column(doc, palette, &mut right[0]);
        });

        let bottom = body.y();
        children.extend(body.into_nodes());
        page(ID, mode, Color::WHITE, bottom, SIDE, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Education, Personal};

    #[test]
    fn contact_card_holds_one_cell_per_present_item() {
        let doc = ResumeDocument {
            personal: Personal {
                email: "jane@example.com".into(),
                location: "Berlin".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let tree = Creative.render(&doc, &Palette::default(), RenderMode::Export);
        let contacts: Vec<&str> = tree
            .texts_with_role(Role::Contact)
            .iter()
            .map(|t| t.source.as_str())
            .collect();
        assert_eq!(contacts, vec!["jane@example.com", "Berlin"]);
    }

    #[test]
    fn education_cards_are_tinted_with_secondary() {
        let palette = crate::palette::resolve("purple");
        let doc = ResumeDocument {
            education: vec![Education {
                institution: "RISD".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let tree = Creative.render(&doc, &palette, RenderMode::Export);
        let mut tinted = 0;
        tree.walk(&mut |n| {
            if let NodeKind::Rect { fill: Some(c), .. } = &n.kind {
                if *c == palette.secondary_color {
                    tinted += 1;
                }
            }
        });
        assert_eq!(tinted, 1);
    }
}
