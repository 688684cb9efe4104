//! Template registry: identifier → layout, with fallback to the default
//! template and containment of faults raised while rendering.

use crate::error::RenderFault;
use crate::model::ResumeDocument;
use crate::palette::Palette;
use crate::rendering::{PageTree, RenderMode};
use crate::templates::{
    AtsClassic, AtsMinimal, Creative, Elegant, Executive, Modern, Tech, Template,
    TemplateDescriptor,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

/// Template used for unknown identifiers and as the fault fallback.
pub const DEFAULT_TEMPLATE: &str = "premium-modern";

/// An immutable identifier → template table.
pub struct Registry {
    templates: Vec<Box<dyn Template>>,
    default_index: usize,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("templates", &self.ids())
            .field("default", &self.default_id())
            .finish()
    }
}

impl Registry {
    /// Build a registry from an explicit list.
    ///
    /// If `default_id` names none of the templates, the first one becomes the
    /// default. Later duplicates of an id are unreachable through
    /// [`Registry::get_renderer`].
    pub fn new(templates: Vec<Box<dyn Template>>, default_id: &str) -> Self {
        let default_index = templates
            .iter()
            .position(|t| t.id() == default_id)
            .unwrap_or(0);
        Registry {
            templates,
            default_index,
        }
    }

    /// The process-wide table of built-in templates.
    pub fn builtin() -> &'static Registry {
        static BUILTIN: OnceLock<Registry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Registry::new(
                vec![
                    Box::new(AtsClassic),
                    Box::new(AtsMinimal),
                    Box::new(Modern),
                    Box::new(Elegant),
                    Box::new(Creative),
                    Box::new(Tech),
                    Box::new(Executive),
                ],
                DEFAULT_TEMPLATE,
            )
        })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.id()).collect()
    }

    pub fn default_id(&self) -> Option<&'static str> {
        self.default_renderer().map(|t| t.id())
    }

    fn default_renderer(&self) -> Option<&dyn Template> {
        self.templates.get(self.default_index).map(|t| t.as_ref())
    }

    /// Exact lookup, without fallback.
    pub fn find(&self, id: &str) -> Option<&dyn Template> {
        let id = id.trim();
        self.templates
            .iter()
            .find(|t| t.id() == id)
            .map(|t| t.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Look up a template, falling back to the default for unknown ids.
    ///
    /// Returns `None` only for an empty registry.
    pub fn get_renderer(&self, id: &str) -> Option<&dyn Template> {
        match self.find(id) {
            Some(t) => Some(t),
            None => {
                log::warn!(
                    "unknown template `{}`, falling back to `{}`",
                    id,
                    self.default_id().unwrap_or("<none>")
                );
                self.default_renderer()
            }
        }
    }

    /// Descriptors in registry order.
    pub fn list_templates(&self) -> Vec<TemplateDescriptor> {
        self.templates.iter().map(|t| t.descriptor()).collect()
    }

    /// Render `doc` with the template named `id`.
    ///
    /// Never fails. A panic inside the chosen template is caught and the
    /// default template renders instead; if that faults too (or the registry
    /// is empty) the result is a blank page.
    pub fn render(
        &self,
        doc: &ResumeDocument,
        id: &str,
        palette: &Palette,
        mode: RenderMode,
    ) -> PageTree {
        let Some(template) = self.get_renderer(id) else {
            return PageTree::blank(id.trim(), mode);
        };

        match render_contained(template, doc, palette, mode) {
            Ok(tree) => tree,
            Err(fault) => {
                log::error!("{}", fault);
                let fallback = self
                    .default_renderer()
                    .filter(|d| d.id() != template.id());
                match fallback.map(|d| render_contained(d, doc, palette, mode)) {
                    Some(Ok(tree)) => tree,
                    Some(Err(fault)) => {
                        log::error!("{}", fault);
                        PageTree::blank(template.id(), mode)
                    }
                    None => PageTree::blank(template.id(), mode),
                }
            }
        }
    }
}

fn render_contained(
    template: &dyn Template,
    doc: &ResumeDocument,
    palette: &Palette,
    mode: RenderMode,
) -> Result<PageTree, RenderFault> {
    panic::catch_unwind(AssertUnwindSafe(|| template.render(doc, palette, mode))).map_err(
        |payload| RenderFault {
            template_id: template.id().to_string(),
            message: panic_message(payload.as_ref()),
        },
    )
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Personal;
    use crate::templates::Category;

    struct Faulty(&'static str);

    impl Template for Faulty {
        fn descriptor(&self) -> TemplateDescriptor {
            TemplateDescriptor {
                id: self.0,
                display_name: "Faulty",
                category: Category::AtsFriendly,
                is_premium: false,
                description: "always panics",
            }
        }

        fn render(&self, _: &ResumeDocument, _: &Palette, _: RenderMode) -> PageTree {
            panic!("boom")
        }
    }

    fn named(name: &str) -> ResumeDocument {
        ResumeDocument {
            personal: Personal {
                full_name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn builtin_holds_seven_templates_in_order() {
        let reg = Registry::builtin();
        assert_eq!(
            reg.ids(),
            vec![
                "ats-classic",
                "ats-minimal",
                "premium-modern",
                "premium-elegant",
                "premium-creative",
                "premium-tech",
                "premium-executive",
            ]
        );
        assert_eq!(reg.default_id(), Some(DEFAULT_TEMPLATE));
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        let reg = Registry::builtin();
        let renderer = reg.get_renderer("no-such-template").unwrap();
        assert_eq!(renderer.id(), DEFAULT_TEMPLATE);
        assert_eq!(reg.get_renderer(" ats-classic ").unwrap().id(), "ats-classic");
    }

    #[test]
    fn faulting_template_is_replaced_by_default() {
        let reg = Registry::new(
            vec![Box::new(Faulty("faulty")), Box::new(Modern)],
            DEFAULT_TEMPLATE,
        );
        let tree = reg.render(&named("Jane"), "faulty", &Palette::default(), RenderMode::Export);
        assert_eq!(tree.template_id, DEFAULT_TEMPLATE);
        assert!(tree.text_content().contains(&"Jane"));
    }

    #[test]
    fn faulting_default_yields_blank_page() {
        let reg = Registry::new(vec![Box::new(Faulty("faulty"))], "faulty");
        let tree = reg.render(
            &named("Jane"),
            "faulty",
            &Palette::default(),
            RenderMode::Interactive,
        );
        assert!(tree.children.is_empty());
        assert_eq!(tree.mode, RenderMode::Interactive);
    }

    #[test]
    fn empty_registry_renders_blank() {
        let reg = Registry::new(Vec::new(), DEFAULT_TEMPLATE);
        assert!(reg.get_renderer("anything").is_none());
        let tree = reg.render(&named("Jane"), "anything", &Palette::default(), RenderMode::Export);
        assert!(tree.children.is_empty());
    }
}
