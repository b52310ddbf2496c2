use crate::escape_html;

#[derive(Debug, Clone, PartialEq)]
enum ItemKind {
    Label(String),
    Link(String, String),
    LinkBlank(String, String),
    Html(String),
    Submenu(String, Submenu),
}

/// One entry of a menu list.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    kind: ItemKind,
    description: Option<String>,
}

impl Item {
    fn with_kind(kind: ItemKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::Label(text.into()))
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::Link(text.into(), href.into()))
    }

    /// A link that opens in a new tab. Clicking it closes the menu.
    pub fn link_blank(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::LinkBlank(text.into(), href.into()))
    }

    /// Raw markup, inserted without escaping.
    pub fn html(raw: impl Into<String>) -> Self {
        Self::with_kind(ItemKind::Html(raw.into()))
    }

    pub fn submenu(text: impl Into<String>, submenu: Submenu) -> Self {
        Self::with_kind(ItemKind::Submenu(text.into(), submenu))
    }

    /// Rendered as the `title` attribute of the item's label.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    fn render_into(&self, out: &mut String) {
        let title = self
            .description
            .as_deref()
            .map(|text| format!(" title=\"{}\"", escape_html(text)))
            .unwrap_or_default();

        match &self.kind {
            ItemKind::Label(text) => {
                out.push_str("<li class=\"menu__label\"><span");
                out.push_str(&title);
                out.push('>');
                out.push_str(&escape_html(text));
                out.push_str("</span></li>");
            }
            ItemKind::Link(text, href) | ItemKind::LinkBlank(text, href) => {
                out.push_str("<li class=\"menu__link\"><a href=\"");
                out.push_str(&escape_html(href));
                out.push('"');
                out.push_str(&title);
                if matches!(self.kind, ItemKind::LinkBlank(..)) {
                    out.push_str(" target=\"_blank\"");
                }
                out.push('>');
                out.push_str(&escape_html(text));
                out.push_str("</a></li>");
            }
            ItemKind::Html(raw) => {
                out.push_str("<li class=\"menu__html\">");
                out.push_str(raw);
                out.push_str("</li>");
            }
            ItemKind::Submenu(text, submenu) => {
                out.push_str("<li class=\"menu__children\"><a href=\"#\"");
                out.push_str(&title);
                out.push('>');
                out.push_str(&escape_html(text));
                out.push_str("<i class=\"menu__icon bi-chevron-down\"></i></a>");
                out.push_str("<div class=\"menu__subs\">");
                submenu.render_into(out);
                out.push_str("</div></li>");
            }
        }
    }
}

/// Items shown one level down, optionally headed by a title.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Submenu {
    id: Option<String>,
    title: Option<String>,
    items: Vec<Item>,
}

impl Submenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn render_into(&self, out: &mut String) {
        out.push_str("<div");
        push_id(out, self.id.as_deref());
        out.push_str(" class=\"menu__submenu\">");
        if let Some(title) = &self.title {
            out.push_str("<h4 class=\"menu__submenu-title\">");
            out.push_str(&escape_html(title));
            out.push_str("</h4>");
        }
        out.push_str("<ul>");
        for item in &self.items {
            item.render_into(out);
        }
        out.push_str("</ul></div>");
    }
}

/// Builder for the markup a drill-down menu binds to, in the `bem`
/// convention.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Menu {
    id: Option<String>,
    items: Vec<Item>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn add_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<div");
        push_id(&mut out, self.id.as_deref());
        out.push_str(" class=\"menu\"><div class=\"menu__wrapper\"><div class=\"menu__panel\">");
        out.push_str("<div class=\"menu__overlay\"></div>");
        out.push_str("<nav class=\"menu__nav\"><div class=\"menu__header\">");
        out.push_str("<button type=\"button\" class=\"menu__back\"><i class=\"bi-chevron-left\"></i></button>");
        out.push_str("<div class=\"menu__title\"></div>");
        out.push_str("<button type=\"button\" class=\"menu__close\"><i class=\"bi-x\"></i></button>");
        out.push_str("</div><ul class=\"menu__list\">");
        for item in &self.items {
            item.render_into(&mut out);
        }
        out.push_str("</ul></nav></div>");
        out.push_str("<button type=\"button\" class=\"menu__trigger\"><span></span><span></span><span></span></button>");
        out.push_str("</div></div>");
        out
    }
}

fn push_id(out: &mut String, id: Option<&str>) {
    if let Some(id) = id {
        out.push_str(" id=\"");
        out.push_str(&escape_html(id));
        out.push('"');
    }
}
