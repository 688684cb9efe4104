use super::{
    date_range, join_present, page, two_up, wrapped, Block, Category, Template,
    TemplateDescriptor, PAGE_PADDING,
};
use crate::model::{has_section, names, present, visible, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::Column;
use crate::rendering::{
    FontFamily, PageGeometry, PageTree, RenderMode, Role, SectionKind, TextStyle,
};

pub const ID: &str = "ats-minimal";

const INK: Color = Color::hex(0x333333);
const GREY: Color = Color::hex(0x666666);

pub struct AtsMinimal;

fn sans(size: f32) -> TextStyle {
    TextStyle::new(FontFamily::Sans, size, INK)
}

fn heading(col: &mut Column, text: &str) {
    col.text(text, sans(10.0).bold().uppercase().spacing(1.0), Role::Heading);
    col.gap(4.0).rule(INK, 1.0).gap(8.0);
}

fn skills(doc: &ResumeDocument) -> Block<'_> {
    Box::new(move |c: &mut Column| {
        c.section(SectionKind::Skills, "Skills", |c| {
            heading(c, "Skills");
            c.text(&names(&doc.skills).join(", "), sans(10.0), Role::Body);
        });
    })
}

fn certifications(doc: &ResumeDocument) -> Block<'_> {
    Box::new(move |c: &mut Column| {
        c.section(SectionKind::Certifications, "Certifications", |c| {
            heading(c, "Certifications");
            for cert in visible(&doc.certifications) {
                let line = join_present([cert.title.as_str(), cert.issuer.as_str()], ", ");
                c.text(&format!("• {}", line), sans(10.0), Role::Body);
            }
        });
    })
}

fn languages(doc: &ResumeDocument) -> Block<'_> {
    Box::new(move |c: &mut Column| {
        c.section(SectionKind::Languages, "Languages", |c| {
            heading(c, "Languages");
            c.text(&names(&doc.languages).join(", "), sans(10.0), Role::Body);
        });
    })
}

fn interests(doc: &ResumeDocument) -> Block<'_> {
    Box::new(move |c: &mut Column| {
        c.section(SectionKind::Interests, "Interests", |c| {
            heading(c, "Interests");
            c.text(&names(&doc.interests).join(", "), sans(10.0), Role::Body);
        });
    })
}

impl Template for AtsMinimal {
    fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: ID,
            display_name: "ATS Minimal",
            category: Category::AtsFriendly,
            is_premium: false,
            description: "Minimalist layout with clear hierarchy. High readability.",
        }
    }

    fn render(&self, doc: &ResumeDocument, _palette: &Palette, mode: RenderMode) -> PageTree {
        let p = &doc.personal;
        let width = PageGeometry::A4.width_px();
        let mut col = Column::new(PAGE_PADDING, PAGE_PADDING, width - 2.0 * PAGE_PADDING);

        let named = col.text(
            &p.full_name,
            sans(24.0).bold().color(Color::BLACK).line_height(1.2),
            Role::Name,
        );
        let contacts = join_present(
            [
                p.email.as_str(),
                p.phone_number.as_str(),
                p.location.as_str(),
                p.linkedin.as_str(),
                p.github.as_str(),
                p.website.as_str(),
            ],
            "  |  ",
        );
        if named && !contacts.is_empty() {
            col.gap(8.0);
        }
        let contacted = col.text(&contacts, sans(10.0), Role::Contact);
        if named || contacted {
            col.gap(32.0);
        }

        if present(&p.summary).is_some() {
            col.section(SectionKind::Summary, "Summary", |c| {
                heading(c, "Summary");
                c.text(&p.summary, sans(10.0), Role::Body);
            });
            col.gap(24.0);
        }

        if has_section(&doc.experience) {
            col.section(SectionKind::Experience, "Experience", |c| {
                heading(c, "Experience");
                for exp in visible(&doc.experience) {
                    c.item(|c| {
                        c.split_row(
                            (&exp.role, sans(11.0).bold(), Role::Body),
                            (
                                &date_range(&exp.start_date, &exp.end_date, " - "),
                                sans(10.0).color(GREY),
                                Role::Meta,
                            ),
                        );
                        c.gap(4.0);
                        c.text(&exp.company, sans(10.0).bold(), Role::Meta);
                        c.gap(4.0);
                        c.text(&exp.description, sans(10.0), Role::Body);
                    });
                    c.gap(16.0);
                }
            });
            col.gap(16.0);
        }

        if has_section(&doc.education) {
            col.section(SectionKind::Education, "Education", |c| {
                heading(c, "Education");
                for edu in visible(&doc.education) {
                    c.item(|c| {
                        c.text(&edu.institution, sans(10.0).bold(), Role::Body);
                        let detail = join_present(
                            [edu.degree.as_str(), wrapped("(", &edu.year, ")").as_str()],
                            " ",
                        );
                        c.text(&detail, sans(10.0), Role::Body);
                    });
                    c.gap(8.0);
                }
            });
            col.gap(16.0);
        }

        if has_section(&doc.projects) {
            col.section(SectionKind::Projects, "Projects", |c| {
                heading(c, "Projects");
                for proj in visible(&doc.projects) {
                    c.item(|c| {
                        c.text(&proj.title, sans(10.0).bold(), Role::Body);
                        c.text(&proj.description, sans(10.0), Role::Body);
                    });
                    c.gap(12.0);
                }
            });
            col.gap(12.0);
        }

        let mut footer: Vec<Block<'_>> = Vec::new();
        if has_section(&doc.skills) {
            footer.push(skills(doc));
        }
        if has_section(&doc.certifications) {
            footer.push(certifications(doc));
        }
        if has_section(&doc.languages) {
            footer.push(languages(doc));
        }
        if has_section(&doc.interests) {
            footer.push(interests(doc));
        }
        two_up(&mut col, 32.0, 24.0, footer);

        let bottom = col.y();
        page(ID, mode, Color::WHITE, bottom, PAGE_PADDING, col.into_nodes())
    }
}
