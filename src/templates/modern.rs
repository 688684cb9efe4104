use super::{date_range, initial, join_present, page, Category, Template, TemplateDescriptor};
use crate::model::{has_section, names, present, visible, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::{
    ellipse, full_height_band, layout_text, ChipStyle, Column, Decoration, Insets,
};
use crate::rendering::{
    Align, FontFamily, NodeKind, PageGeometry, PageTree, RenderMode, Rect, Role, SectionKind,
    TextStyle,
};

pub const ID: &str = "premium-modern";

const SIDEBAR_SHARE: f32 = 0.30;
const SIDEBAR_PAD: f32 = 24.0;
const MAIN_PAD: f32 = 32.0;
const AVATAR: f32 = 80.0;
const GREY: Color = Color::hex(0x555555);
const INK: Color = Color::hex(0x222222);

/// Accent sidebar carrying identity, contacts and the short lists; the main
/// column carries the narrative sections.
pub struct Modern;

fn sans(size: f32, color: Color) -> TextStyle {
    TextStyle::new(FontFamily::Sans, size, color)
}

fn side_heading(col: &mut Column, text: &str, palette: &Palette) {
    col.text(text, sans(10.0, Color::WHITE).bold(), Role::Heading);
    col.gap(8.0)
        .rule(palette.primary_color.mix(Color::WHITE, 0.3), 1.0)
        .gap(16.0);
}

fn main_heading(col: &mut Column, text: &str, palette: &Palette, gap: f32) {
    col.text(text, sans(12.0, palette.primary_color).bold(), Role::Heading);
    col.gap(gap);
}

fn sidebar(doc: &ResumeDocument, palette: &Palette, col: &mut Column) {
    let p = &doc.personal;
    let light = |alpha: f32| palette.primary_color.mix(Color::WHITE, alpha);

    if let Some(letter) = initial(&p.full_name) {
        let x = col.x() + (col.width() - AVATAR) / 2.0;
        let rect = Rect::new(x, col.y(), AVATAR, AVATAR);
        col.push(ellipse(rect, light(0.2)));
        let style = sans(24.0, Color::WHITE).align(Align::Center).line_height(1.0);
        let text_y = rect.y + (AVATAR - style.line_height_px()) / 2.0;
        if let Some(node) = layout_text(&letter, style, Role::Label, rect.x, text_y, AVATAR) {
            col.push(node);
        }
        col.gap(AVATAR + 16.0);
    }
    let named = col.text(
        &p.full_name,
        sans(16.0, Color::WHITE).bold().line_height(1.2).align(Align::Center),
        Role::Name,
    );
    if named {
        col.gap(8.0);
    }
    let titled = col.text(
        &p.designation,
        sans(10.0, light(0.9)).align(Align::Center),
        Role::Designation,
    );
    if named || titled {
        col.gap(32.0);
    }

    let mut contacts = [
        p.email.as_str(),
        p.phone_number.as_str(),
        p.location.as_str(),
        p.website.as_str(),
        p.linkedin.as_str(),
        p.github.as_str(),
    ]
    .into_iter()
    .filter_map(present)
    .peekable();
    if contacts.peek().is_some() {
        for contact in contacts {
            col.text(contact, sans(9.0, Color::WHITE), Role::Contact);
            col.gap(8.0);
        }
        col.gap(24.0);
    }

    if has_section(&doc.skills) {
        col.section(SectionKind::Skills, "Skills", |c| {
            side_heading(c, "SKILLS", palette);
            let chips = ChipStyle {
                text: sans(8.0, Color::WHITE),
                fill: Some(light(0.2)),
                stroke: None,
                radius: 12.0,
                pad_x: 8.0,
                pad_y: 3.0,
                gap: 4.0,
            };
            c.chips(&names(&doc.skills), &chips, Role::Label);
        });
        col.gap(24.0);
    }

    if has_section(&doc.languages) {
        col.section(SectionKind::Languages, "Languages", |c| {
            side_heading(c, "LANGUAGES", palette);
            for name in names(&doc.languages) {
                c.text(&format!("• {}", name), sans(9.0, Color::WHITE), Role::Body);
            }
        });
        col.gap(24.0);
    }

    if has_section(&doc.interests) {
        col.section(SectionKind::Interests, "Interests", |c| {
            side_heading(c, "INTERESTS", palette);
            c.text(&names(&doc.interests).join(", "), sans(9.0, Color::WHITE), Role::Body);
        });
    }
}

fn main_column(doc: &ResumeDocument, palette: &Palette, col: &mut Column) {
    let p = &doc.personal;

    if present(&p.summary).is_some() {
        col.section(SectionKind::Summary, "Profile", |c| {
            main_heading(c, "PROFILE", palette, 8.0);
            c.text(&p.summary, sans(10.0, GREY).line_height(1.5), Role::Body);
        });
        col.gap(32.0);
    }

    if has_section(&doc.experience) {
        col.section(SectionKind::Experience, "Experience", |c| {
            main_heading(c, "EXPERIENCE", palette, 16.0);
            for exp in visible(&doc.experience) {
                c.nest(
                    NodeKind::Item,
                    Insets::left(16.0),
                    Some(Decoration::LeftBar {
                        color: palette.secondary_color,
                        width: 2.0,
                    }),
                    |c| {
                        c.text(&exp.role, sans(11.0, INK).bold(), Role::Body);
                        let meta = join_present(
                            [
                                exp.company.as_str(),
                                date_range(&exp.start_date, &exp.end_date, " - ").as_str(),
                            ],
                            " | ",
                        );
                        c.text(&meta, sans(9.0, GREY), Role::Meta);
                        c.gap(4.0);
                        c.text(&exp.description, sans(10.0, INK), Role::Body);
                    },
                );
                c.gap(24.0);
            }
        });
        col.gap(8.0);
    }

    if has_section(&doc.projects) {
        col.section(SectionKind::Projects, "Projects", |c| {
            main_heading(c, "PROJECTS", palette, 16.0);
            for proj in visible(&doc.projects) {
                c.item(|c| {
                    c.text(&proj.title, sans(10.5, INK).bold(), Role::Body);
                    c.text(&proj.description, sans(10.0, INK), Role::Body);
                    let links =
                        join_present([proj.live_demo.as_str(), proj.github.as_str()], " | ");
                    c.text(&links, sans(9.0, palette.primary_color), Role::Meta);
                });
                c.gap(16.0);
            }
        });
        col.gap(16.0);
    }

    if has_section(&doc.education) {
        col.section(SectionKind::Education, "Education", |c| {
            main_heading(c, "EDUCATION", palette, 16.0);
            for edu in visible(&doc.education) {
                c.item(|c| {
                    c.text(&edu.institution, sans(10.0, INK).bold(), Role::Body);
                    let detail = join_present([edu.degree.as_str(), edu.year.as_str()], ", ");
                    c.text(&detail, sans(9.0, GREY), Role::Meta);
                });
                c.gap(16.0);
            }
        });
        col.gap(16.0);
    }

    if has_section(&doc.certifications) {
        col.section(SectionKind::Certifications, "Certifications", |c| {
            main_heading(c, "CERTIFICATIONS", palette, 16.0);
            for cert in visible(&doc.certifications) {
                let line = join_present(
                    [cert.title.as_str(), cert.issuer.as_str(), cert.year.as_str()],
                    " - ",
                );
                c.text(&format!("• {}", line), sans(9.0, INK), Role::Body);
                c.gap(4.0);
            }
        });
    }
}

impl Template for Modern {
    fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: ID,
            display_name: "Modern",
            category: Category::Premium,
            is_premium: true,
            description: "Sleek sidebar design with a professional color accent.",
        }
    }

    fn render(&self, doc: &ResumeDocument, palette: &Palette, mode: RenderMode) -> PageTree {
        let width = PageGeometry::A4.width_px();
        let side_w = width * SIDEBAR_SHARE;

        let mut side = Column::new(SIDEBAR_PAD, SIDEBAR_PAD, side_w - 2.0 * SIDEBAR_PAD);
        sidebar(doc, palette, &mut side);
        let mut main = Column::new(side_w + MAIN_PAD, MAIN_PAD, width - side_w - 2.0 * MAIN_PAD);
        main_column(doc, palette, &mut main);

        let bottom = (side.y() + SIDEBAR_PAD).max(main.y() + MAIN_PAD);
        let mut children = vec![full_height_band(0.0, 0.0, side_w, palette.primary_color)];
        children.extend(side.into_nodes());
        children.extend(main.into_nodes());
        page(ID, mode, Color::WHITE, bottom, 0.0, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Personal;

    #[test]
    fn avatar_shows_initial_only_when_named() {
        let blank = Modern.render(
            &ResumeDocument::default(),
            &Palette::default(),
            RenderMode::Export,
        );
        assert!(blank.texts_with_role(Role::Label).is_empty());

        let doc = ResumeDocument {
            personal: Personal {
                full_name: "jane doe".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let tree = Modern.render(&doc, &Palette::default(), RenderMode::Export);
        assert_eq!(tree.texts_with_role(Role::Label)[0].source, "J");
    }

    #[test]
    fn sidebar_band_uses_primary_color() {
        let palette = crate::palette::resolve("emerald");
        let tree = Modern.render(&ResumeDocument::default(), &palette, RenderMode::Export);
        match &tree.children[0].kind {
            NodeKind::Rect {
                fill,
                extend_to_bottom,
                ..
            } => {
                assert_eq!(*fill, Some(palette.primary_color));
                assert!(*extend_to_bottom);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
