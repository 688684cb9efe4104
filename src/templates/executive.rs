use super::{date_range, join_present, page, two_up, Block, Category, Template, TemplateDescriptor};
use crate::model::{has_section, names, present, visible, Named, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::{fill, Column};
use crate::rendering::{
    Align, FontFamily, PageGeometry, PageTree, RenderMode, Rect, Role, SectionKind, TextStyle,
};

pub const ID: &str = "premium-executive";

const TOP_BAR: f32 = 10.0;
const SIDE: f32 = 48.0;
const INK: Color = Color::hex(0x1f2937);
const SUBDUED: Color = Color::hex(0x4b5563);
const HAIRLINE: Color = Color::hex(0xe5e7eb);

/// Traditional and centered; experience runs full width above a two-column
/// footer.
pub struct Executive;

fn serif(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Serif, size, INK)
}

fn heading(col: &mut Column, text: &str, palette: &Palette, gap: f32) {
    col.text(
        text,
        serif(11.0).bold().uppercase().color(palette.text_color),
        Role::Heading,
    );
    col.gap(4.0).rule(HAIRLINE, 2.0).gap(gap);
}

fn education<'a>(doc: &'a ResumeDocument, palette: &'a Palette) -> Block<'a> {
    Box::new(move |c: &mut Column| {
        c.section(SectionKind::Education, "Education", |c| {
            heading(c, "Education", palette, 8.0);
            for edu in visible(&doc.education) {
                c.item(|c| {
                    c.text(&edu.institution, serif(10.5).bold(), Role::Body);
                    let detail = join_present([edu.degree.as_str(), edu.year.as_str()], ", ");
                    c.text(&detail, serif(10.0), Role::Body);
                });
                c.gap(8.0);
            }
        });
    })
}

fn competencies<'a>(doc: &'a ResumeDocument, palette: &'a Palette) -> Block<'a> {
    Box::new(move |c: &mut Column| {
        c.section(SectionKind::Skills, "Core Competencies", |c| {
            heading(c, "Core Competencies", palette, 8.0);
            c.text(&names(&doc.skills).join(" • "), serif(10.0).line_height(1.6), Role::Body);
        });
    })
}

fn certifications<'a>(doc: &'a ResumeDocument, palette: &'a Palette) -> Block<'a> {
    Box::new(move |c: &mut Column| {
        c.section(SectionKind::Certifications, "Certifications", |c| {
            heading(c, "Certifications", palette, 8.0);
            for cert in visible(&doc.certifications) {
                c.item(|c| {
                    c.text(&cert.title, serif(10.5).bold(), Role::Body);
                    let detail = join_present([cert.issuer.as_str(), cert.year.as_str()], ", ");
                    c.text(&detail, serif(10.0), Role::Body);
                });
                c.gap(8.0);
            }
        });
    })
}

fn named_list<'a>(
    kind: SectionKind,
    title: &'static str,
    entries: &'a [Named],
    palette: &'a Palette,
) -> Block<'a> {
    Box::new(move |c: &mut Column| {
        c.section(kind, title, |c| {
            heading(c, title, palette, 8.0);
            c.text(&names(entries).join(", "), serif(10.0), Role::Body);
        });
    })
}

impl Template for Executive {
    fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: ID,
            display_name: "Executive",
            category: Category::Premium,
            is_premium: true,
            description: "Authoritative and traditional. Perfect for senior roles.",
        }
    }

    fn render(&self, doc: &ResumeDocument, palette: &Palette, mode: RenderMode) -> PageTree {
        let p = &doc.personal;
        let width = PageGeometry::A4.width_px();
        let mut children = vec![fill(Rect::new(0.0, 0.0, width, TOP_BAR), palette.primary_color)];

        let mut head = Column::new(SIDE, TOP_BAR + 24.0, width - 2.0 * SIDE);
        let centered = |size: f32| serif(size).align(Align::Center);
        let named = head.text(
            &p.full_name,
            centered(24.0).bold().uppercase().spacing(2.0).line_height(1.2),
            Role::Name,
        );
        let titled = head.text(
            &p.designation,
            centered(12.0).color(palette.text_color),
            Role::Designation,
        );
        let contacts = join_present(
            [
                p.email.as_str(),
                p.phone_number.as_str(),
                p.location.as_str(),
                p.linkedin.as_str(),
            ],
            "   ·   ",
        );
        if (named || titled) && !contacts.is_empty() {
            head.gap(12.0);
        }
        let contacted = head.text(&contacts, centered(10.0), Role::Contact);
        let header_bottom = if named || titled || contacted {
            head.gap(24.0);
            let y = head.y();
            children.extend(head.into_nodes());
            children.push(fill(Rect::new(0.0, y, width, 1.0), palette.secondary_color));
            y + 1.0
        } else {
            TOP_BAR
        };

        let mut col = Column::new(SIDE, header_bottom + SIDE, width - 2.0 * SIDE);

        if present(&p.summary).is_some() {
            col.section(SectionKind::Summary, "Executive Profile", |c| {
                heading(c, "Executive Profile", palette, 8.0);
                c.text(&p.summary, serif(10.5).line_height(1.5), Role::Body);
            });
            col.gap(32.0);
        }

        if has_section(&doc.experience) {
            col.section(SectionKind::Experience, "Professional Experience", |c| {
                heading(c, "Professional Experience", palette, 16.0);
                for exp in visible(&doc.experience) {
                    c.item(|c| {
                        c.columns(&[9.0, 3.0], 0.0, |cols| {
                            cols[0].text(&exp.company, serif(12.0).bold(), Role::Body);
                            cols[0].text(
                                &exp.role,
                                serif(10.5).italic().color(SUBDUED),
                                Role::Meta,
                            );
                            cols[1].text(
                                &date_range(&exp.start_date, &exp.end_date, " – "),
                                serif(10.0).bold().align(Align::Right),
                                Role::Meta,
                            );
                        });
                        c.gap(4.0);
                        c.text(&exp.description, serif(10.5), Role::Body);
                    });
                    c.gap(24.0);
                }
            });
            col.gap(8.0);
        }

        if has_section(&doc.projects) {
            col.section(SectionKind::Projects, "Key Initiatives", |c| {
                heading(c, "Key Initiatives", palette, 16.0);
                for proj in visible(&doc.projects) {
                    c.item(|c| {
                        c.text(&proj.title, serif(11.0).bold(), Role::Body);
                        c.text(&proj.description, serif(10.5), Role::Body);
                    });
                    c.gap(16.0);
                }
            });
            col.gap(16.0);
        }

        let mut footer: Vec<Block<'_>> = Vec::new();
        if has_section(&doc.education) {
            footer.push(education(doc, palette));
        }
        if has_section(&doc.skills) {
            footer.push(competencies(doc, palette));
        }
        if has_section(&doc.certifications) {
            footer.push(certifications(doc, palette));
        }
        if has_section(&doc.languages) {
            footer.push(named_list(SectionKind::Languages, "Languages", &doc.languages, palette));
        }
        if has_section(&doc.interests) {
            footer.push(named_list(SectionKind::Interests, "Interests", &doc.interests, palette));
        }
        two_up(&mut col, 40.0, 24.0, footer);

        let bottom = col.y();
        children.extend(col.into_nodes());
        page(ID, mode, Color::WHITE, bottom, SIDE, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Experience;

    #[test]
    fn dates_are_right_aligned_beside_company() {
        let doc = ResumeDocument {
            experience: vec![Experience {
                company: "Globex".into(),
                start_date: "2019".into(),
                end_date: "Present".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let tree = Executive.render(&doc, &Palette::default(), RenderMode::Export);
        let company = tree
            .texts()
            .into_iter()
            .find(|t| t.source == "Globex")
            .unwrap();
        let dates = tree
            .texts()
            .into_iter()
            .find(|t| t.source == "2019 – Present")
            .unwrap();
        assert_eq!(company.lines[0].y, dates.lines[0].y);
        let right_edge = dates.lines[0].x + dates.lines[0].width;
        assert!((right_edge - (PageGeometry::A4.width_px() - SIDE)).abs() < 0.5);
    }

    #[test]
    fn experience_heading_omitted_without_entries() {
        let tree = Executive.render(
            &ResumeDocument::default(),
            &Palette::default(),
            RenderMode::Export,
        );
        assert!(!tree.has_section(SectionKind::Experience));
    }
}
