//! The built-in template set.
//!
//! Every template is an independent unit struct implementing [`Template`]. They
//! share the render contract and a handful of string helpers, nothing else:
//! each owns its typography, palette use and section order.

mod ats_classic;
mod ats_minimal;
mod creative;
mod elegant;
mod executive;
mod modern;
mod tech;

pub use ats_classic::AtsClassic;
pub use ats_minimal::AtsMinimal;
pub use creative::Creative;
pub use elegant::Elegant;
pub use executive::Executive;
pub use modern::Modern;
pub use tech::Tech;

use crate::model::{present, ResumeDocument};
use crate::palette::{Color, Palette};
use crate::rendering::layout::Column;
use crate::rendering::{Node, PageTree, RenderMode, MM_TO_PX};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "ats-friendly")]
    AtsFriendly,
    #[serde(rename = "premium")]
    Premium,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Category::AtsFriendly => "ats-friendly",
            Category::Premium => "premium",
        })
    }
}

/// Selection metadata for a template; `id` is the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    pub is_premium: bool,
    pub description: &'static str,
}

/// The render contract every layout satisfies.
///
/// `render` must be pure: the same document, palette and mode always give a
/// structurally identical tree. It must also tolerate any document, including
/// a wholly empty one.
pub trait Template: Send + Sync {
    fn descriptor(&self) -> TemplateDescriptor;

    fn render(&self, doc: &ResumeDocument, palette: &Palette, mode: RenderMode) -> PageTree;

    fn id(&self) -> &'static str {
        self.descriptor().id
    }
}

/// The standard page padding used by single-flow layouts.
pub(crate) const PAGE_PADDING: f32 = 15.0 * MM_TO_PX;

pub(crate) const MUTED: Color = Color::hex(0x666666);

/// Joins the non-blank items with `sep`, trimming each; never leaves a
/// leading, trailing or doubled separator.
pub fn join_present<'a>(items: impl IntoIterator<Item = &'a str>, sep: &str) -> String {
    items
        .into_iter()
        .filter_map(present)
        .collect::<Vec<_>>()
        .join(sep)
}

/// "start – end", "start", "end" or "" depending on which side is present.
pub fn date_range(start: &str, end: &str, dash: &str) -> String {
    join_present([start, end], dash)
}

/// `label` followed by `value`, or nothing when the value is blank.
pub(crate) fn labelled(label: &str, value: &str) -> String {
    present(value)
        .map(|v| format!("{}{}", label, v))
        .unwrap_or_default()
}

/// `value` wrapped in `open`/`close`, or nothing when it is blank.
pub(crate) fn wrapped(open: &str, value: &str, close: &str) -> String {
    present(value)
        .map(|v| format!("{}{}{}", open, v, close))
        .unwrap_or_default()
}

/// Prefixes every non-blank line with a bullet.
pub(crate) fn bulleted(text: &str) -> String {
    text.lines()
        .filter_map(present)
        .map(|l| format!("• {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First letter of the name, uppercased.
pub(crate) fn initial(name: &str) -> Option<String> {
    present(name)
        .and_then(|n| n.chars().next())
        .map(|c| c.to_uppercase().collect())
}

/// A block laid out into one cell of a two-up grid.
pub(crate) type Block<'a> = Box<dyn FnOnce(&mut Column) + 'a>;

/// Lays out blocks two per row, skipping empty slots so a missing section
/// never leaves a hole.
pub(crate) fn two_up(col: &mut Column, gutter: f32, row_gap: f32, blocks: Vec<Block<'_>>) {
    let mut blocks = blocks.into_iter().peekable();
    let mut first_row = true;
    while blocks.peek().is_some() {
        if !first_row {
            col.gap(row_gap);
        }
        first_row = false;
        let left = blocks.next();
        let right = blocks.next();
        col.columns(&[1.0, 1.0], gutter, |cols| {
            if let Some(build) = left {
                build(&mut cols[0]);
            }
            if let Some(build) = right {
                build(&mut cols[1]);
            }
        });
    }
}

/// Wraps laid-out nodes into a page tree whose height is the lowest content
/// edge plus `bottom_padding`.
pub(crate) fn page(
    id: &str,
    mode: RenderMode,
    background: Color,
    bottom: f32,
    bottom_padding: f32,
    children: Vec<Node>,
) -> PageTree {
    let height = if children.is_empty() {
        0.0
    } else {
        bottom + bottom_padding
    };
    PageTree::new(id, mode, background, height, children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_present_skips_blanks() {
        assert_eq!(join_present(["a@b.c", "", "Berlin"], " | "), "a@b.c | Berlin");
        assert_eq!(join_present(["", "  ", ""], " | "), "");
        assert_eq!(join_present([" x "], ", "), "x");
    }

    #[test]
    fn date_range_variants() {
        assert_eq!(date_range("2020", "2022", " – "), "2020 – 2022");
        assert_eq!(date_range("2020", "", " – "), "2020");
        assert_eq!(date_range("", "2022", " – "), "2022");
        assert_eq!(date_range(" ", "", " – "), "");
    }

    #[test]
    fn small_helpers() {
        assert_eq!(labelled("GitHub: ", "gh/x"), "GitHub: gh/x");
        assert_eq!(labelled("GitHub: ", " "), "");
        assert_eq!(wrapped("(", "2019", ")"), "(2019)");
        assert_eq!(bulleted("one\n\ntwo"), "• one\n• two");
        assert_eq!(initial(" jane"), Some("J".to_string()));
        assert_eq!(initial(""), None);
    }

    #[test]
    fn two_up_fills_rows_in_order() {
        use crate::rendering::{FontFamily, Role, TextStyle};
        let style = TextStyle::new(FontFamily::Sans, 10.0, Color::BLACK);
        let mut col = Column::new(0.0, 0.0, 400.0);
        let blocks: Vec<Block<'static>> = ["a", "b", "c"]
            .into_iter()
            .map(|s| -> Block<'static> {
                Box::new(move |c: &mut Column| {
                    c.text(s, style, Role::Body);
                })
            })
            .collect();
        two_up(&mut col, 20.0, 10.0, blocks);
        let nodes = col.into_nodes();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[1].rect.x > nodes[0].rect.x);
        assert_eq!(nodes[2].rect.x, 0.0);
        assert!(nodes[2].rect.y > nodes[0].rect.y);
    }
}
