//! Floating chapter-navigation icons.
//!
//! Each chapter anchor (a tall link running down the side of the page) holds
//! an icon that should stay vertically centred in the visible part of the
//! anchor. [`centered_offset`] is the positioning rule; the navigator binding
//! applies it to every anchor on load, scroll and resize.

use super::*;
use crate::config::NavigatorConfig;
use crate::runtime_state::Viewport;

/// Inputs of the positioning rule, all in CSS pixels.
///
/// `anchor_top` is viewport relative, so it goes negative once the anchor
/// has scrolled above the top of the window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorGeometry {
    pub anchor_top: f64,
    pub anchor_height: f64,
    pub icon_height: f64,
    pub viewport_height: f64,
}

/// Offset of the icon from the top of its anchor.
///
/// Starts from the anchor's midpoint and clamps against the viewport: an
/// icon that would fall below the window is pulled up to its bottom edge,
/// one that would rise above it is pushed down to its top edge, but never
/// past either end of the anchor.
///
/// ```
/// use nav_widgets::{AnchorGeometry, centered_offset};
///
/// let offset = centered_offset(AnchorGeometry {
///     anchor_top: 0.0,
///     anchor_height: 400.0,
///     icon_height: 20.0,
///     viewport_height: 800.0,
/// });
/// assert_eq!(offset, 190.0);
/// ```
pub fn centered_offset(geometry: AnchorGeometry) -> f64 {
    let AnchorGeometry {
        anchor_top,
        anchor_height,
        icon_height,
        viewport_height,
    } = geometry;

    let mut offset = anchor_height / 2.0 - icon_height / 2.0;
    if offset + anchor_top > viewport_height - icon_height {
        offset = (viewport_height - anchor_top - icon_height).max(0.0);
    } else if offset + anchor_top < 0.0 {
        offset = anchor_top.abs().min(anchor_height - icon_height);
    }
    offset
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NavAnchor {
    anchor: NodeId,
    icon: NodeId,
}

/// The navigator bound to the anchors of one document.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChapterNavigator {
    anchors: Vec<NavAnchor>,
}

impl ChapterNavigator {
    pub(crate) fn mount(dom: &Dom, config: &NavigatorConfig) -> Result<Self> {
        let mut anchors = Vec::new();
        for anchor in dom.query_selector_all(&config.anchor_selector)? {
            let icon = dom
                .query_selector_from(anchor, &config.icon_selector)?
                .ok_or_else(|| Error::MissingElement {
                    widget: format!("chapter navigator ({})", config.anchor_selector),
                    selector: config.icon_selector.clone(),
                })?;
            anchors.push(NavAnchor { anchor, icon });
        }
        tracing::debug!(anchors = anchors.len(), "mounted chapter navigator");
        Ok(Self { anchors })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub(crate) fn reposition_all(&self, dom: &mut Dom, viewport: &Viewport) -> Result<()> {
        for anchor in &self.anchors {
            self.reposition(dom, anchor, viewport)?;
        }
        Ok(())
    }

    fn reposition(&self, dom: &mut Dom, anchor: &NavAnchor, viewport: &Viewport) -> Result<f64> {
        let anchor_box = dom.layout_box(anchor.anchor);
        let geometry = AnchorGeometry {
            anchor_top: dom.client_top(anchor.anchor, viewport.scroll_y),
            anchor_height: anchor_box.height,
            icon_height: dom.layout_box(anchor.icon).height,
            viewport_height: viewport.height,
        };
        let offset = centered_offset(geometry);
        let px = format_float(offset);
        tracing::trace!(?geometry, offset, "repositioned chapter icon");

        dom.style_set(anchor.icon, "transform", &format!("translateY({px}px)"))?;
        dom.style_set(anchor.icon, "top", &format!("{px}px"))?;
        dom.style_set(anchor.icon, "visibility", "visible")?;
        Ok(offset)
    }
}
