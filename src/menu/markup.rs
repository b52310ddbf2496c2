use crate::config::{Breakpoint, validate_selector};
use crate::{Error, Result};

/// Class-name convention a drill-down menu is written in.
///
/// Selectors are resolved inside the menu container, except `header` and
/// `title` which live inside the nav, and `submenu` which is looked up
/// inside each children element.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuMarkup {
    pub container: String,
    pub nav: String,
    pub overlay: String,
    pub section: String,
    pub children: String,
    pub submenu: String,
    pub back: String,
    pub close: String,
    pub trigger: String,
    pub header: String,
    pub title: String,
    /// Links that leave the site; clicking one closes the menu.
    pub outbound: Option<String>,
    pub breakpoint: Breakpoint,
    /// Whether an overlay click closes with the delayed reset or only
    /// toggles the open state.
    pub overlay_resets: bool,
    /// Whether reset and hide strip the inline animation from submenus.
    pub clear_animation_on_reset: bool,
    pub active_class: String,
    pub slide_in: String,
    pub slide_out: String,
}

impl MenuMarkup {
    pub fn bem() -> Self {
        Self {
            container: ".menu".into(),
            nav: ".menu__nav".into(),
            overlay: ".menu__overlay".into(),
            section: ".menu__list".into(),
            children: ".menu__children".into(),
            submenu: ".menu__subs".into(),
            back: ".menu__back".into(),
            close: ".menu__close".into(),
            trigger: ".menu__trigger".into(),
            header: ".menu__header".into(),
            title: ".menu__title".into(),
            outbound: Some(".menu__link > a[target=\"_blank\"]".into()),
            breakpoint: Breakpoint::Rem(62.0),
            overlay_resets: true,
            clear_animation_on_reset: true,
            active_class: "active".into(),
            slide_in: "slideLeft 0.5s ease forwards".into(),
            slide_out: "slideRight 0.5s ease forwards".into(),
        }
    }

    pub fn bem_legacy() -> Self {
        Self {
            container: ".menu__container".into(),
            section: ".menu__section".into(),
            back: ".menu__arrow".into(),
            outbound: None,
            breakpoint: Breakpoint::Px(992.0),
            ..Self::bem()
        }
    }

    pub fn dashed() -> Self {
        Self {
            container: ".menu-container".into(),
            nav: ".menu".into(),
            overlay: ".menu-overlay".into(),
            section: ".menu-section".into(),
            children: ".menu-children".into(),
            submenu: ".menu-subs".into(),
            back: ".menu-arrow".into(),
            close: ".menu-close".into(),
            trigger: ".menu-trigger".into(),
            header: ".menu-header".into(),
            title: ".menu-title".into(),
            outbound: None,
            breakpoint: Breakpoint::Px(992.0),
            overlay_resets: false,
            clear_animation_on_reset: false,
            ..Self::bem()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let selectors = [
            ("container", &self.container),
            ("nav", &self.nav),
            ("overlay", &self.overlay),
            ("section", &self.section),
            ("children", &self.children),
            ("submenu", &self.submenu),
            ("back", &self.back),
            ("close", &self.close),
            ("trigger", &self.trigger),
            ("header", &self.header),
            ("title", &self.title),
        ];
        for (field, selector) in selectors {
            validate_selector(field, selector)?;
        }
        if let Some(outbound) = &self.outbound {
            validate_selector("outbound", outbound)?;
        }
        if self.active_class.trim().is_empty()
            || self.active_class.contains(char::is_whitespace)
        {
            return Err(Error::Config(format!(
                "active_class must be a single class name: {:?}",
                self.active_class
            )));
        }
        Ok(())
    }
}
