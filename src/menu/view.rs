use std::fmt;

use super::MenuMarkup;
use crate::*;

/// Everything the menu controller needs to read or change on screen.
///
/// `Level` identifies one submenu level (a "children" entry of the list).
pub trait MenuView {
    type Level: Copy + PartialEq + fmt::Debug;

    fn is_open(&self) -> bool;

    /// Flips the open state of the nav and its overlay together.
    fn toggle(&mut self) -> Result<()>;

    fn level_label(&self, level: Self::Level) -> Result<String>;

    /// Marks the level's submenu active and plays the slide-in animation.
    fn show_level(&mut self, level: Self::Level) -> Result<()>;

    fn slide_out_level(&mut self, level: Self::Level) -> Result<()>;

    /// Final step of a back transition, once the slide-out has played.
    fn hide_level(&mut self, level: Self::Level) -> Result<()>;

    /// Shows `label` in the header and marks the header active.
    fn set_title(&mut self, label: &str) -> Result<()>;

    fn clear_title(&mut self) -> Result<()>;

    /// Returns every level to its resting state and clears the header.
    fn reset(&mut self) -> Result<()>;
}

/// Nodes of one mounted menu, resolved once at mount time.
#[derive(Debug, Clone)]
pub(crate) struct MenuNodes {
    pub(crate) container: NodeId,
    pub(crate) nav: NodeId,
    pub(crate) overlay: NodeId,
    pub(crate) section: NodeId,
    pub(crate) back: NodeId,
    pub(crate) close: NodeId,
    pub(crate) trigger: NodeId,
    pub(crate) header: NodeId,
    pub(crate) title: NodeId,
    pub(crate) outbound: Vec<NodeId>,
}

impl MenuNodes {
    pub(crate) fn resolve(dom: &Dom, container: NodeId, markup: &MenuMarkup) -> Result<Self> {
        let widget = format!("menu ({})", markup.container);
        let require = |root: NodeId, selector: &str| -> Result<NodeId> {
            dom.query_selector_from(root, selector)?
                .ok_or_else(|| Error::MissingElement {
                    widget: widget.clone(),
                    selector: selector.to_string(),
                })
        };

        let nav = require(container, &markup.nav)?;
        let nodes = Self {
            container,
            nav,
            overlay: require(container, &markup.overlay)?,
            section: require(container, &markup.section)?,
            back: require(container, &markup.back)?,
            close: require(container, &markup.close)?,
            trigger: require(container, &markup.trigger)?,
            header: require(nav, &markup.header)?,
            title: require(nav, &markup.title)?,
            outbound: match &markup.outbound {
                Some(selector) => dom.query_selector_all_from(container, selector)?,
                None => Vec::new(),
            },
        };

        for level in dom.query_selector_all_from(container, &markup.children)? {
            require(level, &markup.submenu)?;
        }
        Ok(nodes)
    }

    /// The nav carries the active class while the menu is shown.
    pub(crate) fn is_open(&self, dom: &Dom, markup: &MenuMarkup) -> bool {
        dom.element(self.nav)
            .is_some_and(|nav| has_class(nav, &markup.active_class))
    }
}

/// [`MenuView`] over a mounted menu in the page DOM.
pub(crate) struct DomMenuView<'a> {
    dom: &'a mut Dom,
    nodes: &'a MenuNodes,
    markup: &'a MenuMarkup,
}

impl<'a> DomMenuView<'a> {
    pub(crate) fn new(dom: &'a mut Dom, nodes: &'a MenuNodes, markup: &'a MenuMarkup) -> Self {
        Self { dom, nodes, markup }
    }

    fn submenu(&self, level: NodeId) -> Result<NodeId> {
        self.dom
            .query_selector_from(level, &self.markup.submenu)?
            .ok_or_else(|| Error::MissingElement {
                widget: format!("menu ({})", self.markup.container),
                selector: self.markup.submenu.clone(),
            })
    }

    fn rest_submenu(&mut self, submenu: NodeId) -> Result<()> {
        self.dom.class_remove(submenu, &self.markup.active_class)?;
        if self.markup.clear_animation_on_reset {
            self.dom.style_remove(submenu, "animation")?;
        }
        Ok(())
    }
}

impl MenuView for DomMenuView<'_> {
    type Level = NodeId;

    fn is_open(&self) -> bool {
        self.nodes.is_open(&*self.dom, self.markup)
    }

    fn toggle(&mut self) -> Result<()> {
        self.dom
            .class_toggle(self.nodes.nav, &self.markup.active_class)?;
        self.dom
            .class_toggle(self.nodes.overlay, &self.markup.active_class)?;
        Ok(())
    }

    fn level_label(&self, level: NodeId) -> Result<String> {
        if let Some(icon) = self.dom.query_selector_from(level, "i")? {
            let label = self
                .dom
                .parent(icon)
                .and_then(|holder| self.dom.first_child_text(holder))
                .unwrap_or_default();
            return Ok(label.trim().to_string());
        }

        let fallback = self
            .dom
            .children(level)
            .iter()
            .copied()
            .find(|child| self.dom.element(*child).is_some())
            .map(|child| self.dom.text_content(child))
            .unwrap_or_default();
        Ok(fallback.trim().to_string())
    }

    fn show_level(&mut self, level: NodeId) -> Result<()> {
        let submenu = self.submenu(level)?;
        self.dom.class_add(submenu, &self.markup.active_class)?;
        self.dom
            .style_set(submenu, "animation", &self.markup.slide_in)
    }

    fn slide_out_level(&mut self, level: NodeId) -> Result<()> {
        let submenu = self.submenu(level)?;
        self.dom
            .style_set(submenu, "animation", &self.markup.slide_out)
    }

    fn hide_level(&mut self, level: NodeId) -> Result<()> {
        let submenu = self.submenu(level)?;
        self.rest_submenu(submenu)
    }

    fn set_title(&mut self, label: &str) -> Result<()> {
        self.dom.set_text_content(self.nodes.title, label)?;
        self.dom
            .class_add(self.nodes.header, &self.markup.active_class)
    }

    fn clear_title(&mut self) -> Result<()> {
        self.dom
            .class_remove(self.nodes.header, &self.markup.active_class)?;
        self.dom.set_text_content(self.nodes.title, "")
    }

    fn reset(&mut self) -> Result<()> {
        self.clear_title()?;
        let submenus = self
            .dom
            .query_selector_all_from(self.nodes.container, &self.markup.submenu)?;
        for submenu in submenus {
            self.rest_submenu(submenu)?;
        }
        Ok(())
    }
}
