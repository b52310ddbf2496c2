use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::*;
use crate::menu::MenuMarkup;

/// Width at which a menu stops being a mobile overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Breakpoint {
    Px(f64),
    Rem(f64),
}

impl Breakpoint {
    /// Resolves the breakpoint to CSS pixels.
    pub fn resolve(self, root_font_size: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Rem(rem) => rem * root_font_size,
        }
    }
}

impl FromStr for Breakpoint {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        let (number, ctor): (&str, fn(f64) -> Breakpoint) =
            if let Some(number) = value.strip_suffix("rem") {
                (number, Breakpoint::Rem)
            } else if let Some(number) = value.strip_suffix("px") {
                (number, Breakpoint::Px)
            } else {
                return Err(Error::Config(format!(
                    "breakpoint must end in px or rem: {value}"
                )));
            };
        let number = number
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Config(format!("invalid breakpoint: {value}")))?;
        if !number.is_finite() || number <= 0.0 {
            return Err(Error::Config(format!(
                "breakpoint must be positive: {value}"
            )));
        }
        Ok(ctor(number))
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{}px", format_float(*px)),
            Self::Rem(rem) => write!(f, "{}rem", format_float(*rem)),
        }
    }
}

impl TryFrom<String> for Breakpoint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Breakpoint> for String {
    fn from(value: Breakpoint) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuPreset {
    #[default]
    Bem,
    BemLegacy,
    Dashed,
    Custom,
}

/// One menu convention to mount. Fields left unset keep the preset's value;
/// a `custom` menu starts from the `bem` convention and must name its
/// container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub preset: MenuPreset,
    pub container: Option<String>,
    pub nav: Option<String>,
    pub overlay: Option<String>,
    pub section: Option<String>,
    pub children: Option<String>,
    pub submenu: Option<String>,
    pub back: Option<String>,
    pub close: Option<String>,
    pub trigger: Option<String>,
    pub header: Option<String>,
    pub title: Option<String>,
    pub outbound: Option<String>,
    pub breakpoint: Option<Breakpoint>,
    pub overlay_resets: Option<bool>,
    pub clear_animation_on_reset: Option<bool>,
    pub active_class: Option<String>,
}

impl MenuConfig {
    pub fn preset(preset: MenuPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    /// Builds the markup convention this entry describes.
    pub fn markup(&self) -> Result<MenuMarkup> {
        let mut markup = match self.preset {
            MenuPreset::Bem | MenuPreset::Custom => MenuMarkup::bem(),
            MenuPreset::BemLegacy => MenuMarkup::bem_legacy(),
            MenuPreset::Dashed => MenuMarkup::dashed(),
        };
        if self.preset == MenuPreset::Custom && self.container.is_none() {
            return Err(Error::Config(
                "custom menu requires a container selector".into(),
            ));
        }

        let overrides = [
            (&self.container, &mut markup.container),
            (&self.nav, &mut markup.nav),
            (&self.overlay, &mut markup.overlay),
            (&self.section, &mut markup.section),
            (&self.children, &mut markup.children),
            (&self.submenu, &mut markup.submenu),
            (&self.back, &mut markup.back),
            (&self.close, &mut markup.close),
            (&self.trigger, &mut markup.trigger),
            (&self.header, &mut markup.header),
            (&self.title, &mut markup.title),
            (&self.active_class, &mut markup.active_class),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        if let Some(outbound) = &self.outbound {
            markup.outbound = if outbound.trim().is_empty() {
                None
            } else {
                Some(outbound.clone())
            };
        }
        if let Some(breakpoint) = self.breakpoint {
            markup.breakpoint = breakpoint;
        }
        if let Some(overlay_resets) = self.overlay_resets {
            markup.overlay_resets = overlay_resets;
        }
        if let Some(clear) = self.clear_animation_on_reset {
            markup.clear_animation_on_reset = clear;
        }

        markup.validate()?;
        Ok(markup)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub enabled: bool,
    pub anchor_selector: String,
    pub icon_selector: String,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anchor_selector: "#mdbook a.nav-chapters".to_string(),
            icon_selector: "i.fa".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 667.0,
        }
    }
}

/// Settings for a [`Page`](crate::Page) and the widgets it mounts.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// transition_ms = 250
///
/// [viewport]
/// width = 1024
///
/// [[menus]]
/// preset = "dashed"
/// breakpoint = "60rem"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub transition_ms: i64,
    pub timer_step_limit: usize,
    pub root_font_size: f64,
    pub viewport: ViewportConfig,
    pub navigator: NavigatorConfig,
    pub menus: Vec<MenuConfig>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            transition_ms: 300,
            timer_step_limit: 10_000,
            root_font_size: 16.0,
            viewport: ViewportConfig::default(),
            navigator: NavigatorConfig::default(),
            // Mount order matters: the bem container shares `.menu` with the
            // dashed nav, so the dashed convention claims its subtree first.
            menus: vec![
                MenuConfig::preset(MenuPreset::Dashed),
                MenuConfig::preset(MenuPreset::BemLegacy),
                MenuConfig::preset(MenuPreset::Bem),
            ],
        }
    }
}

impl WidgetConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded widget config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.transition_ms < 0 {
            return Err(Error::Config(format!(
                "transition_ms must not be negative: {}",
                self.transition_ms
            )));
        }
        if self.timer_step_limit == 0 {
            return Err(Error::Config("timer_step_limit must be at least 1".into()));
        }
        if !(self.root_font_size.is_finite() && self.root_font_size > 0.0) {
            return Err(Error::Config(format!(
                "root_font_size must be positive: {}",
                self.root_font_size
            )));
        }
        let ViewportConfig { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(Error::Config(format!(
                "viewport must be non-negative: {width}x{height}"
            )));
        }
        if self.navigator.enabled {
            validate_selector("navigator.anchor_selector", &self.navigator.anchor_selector)?;
            validate_selector("navigator.icon_selector", &self.navigator.icon_selector)?;
        }
        for menu in &self.menus {
            menu.markup()?;
        }
        Ok(())
    }

    pub(crate) fn markups(&self) -> Result<Vec<MenuMarkup>> {
        self.menus.iter().map(MenuConfig::markup).collect()
    }
}

pub(crate) fn validate_selector(field: &str, selector: &str) -> Result<()> {
    if selector.trim().is_empty() {
        return Err(Error::Config(format!("{field} must not be empty")));
    }
    parse_selector_list(selector)
        .map(|_| ())
        .map_err(|err| Error::Config(format!("{field}: {err}")))
}
