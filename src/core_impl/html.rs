use super::*;

const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("copy", '©'),
    ("hellip", '…'),
    ("laquo", '«'),
    ("raquo", '»'),
    ("larr", '←'),
    ("rarr", '→'),
    ("middot", '·'),
];

/// Parses an HTML document or fragment into a fresh [`Dom`].
///
/// Whitespace-only text is kept. Comments and declarations are dropped,
/// stray end tags are ignored, and `<li>`/`<p>` close implicitly the way
/// browsers close them.
pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut reader = HtmlReader { src: html, pos: 0 };
    let mut builder = TreeBuilder::new();

    while let Some(token) = reader.next_token()? {
        match token {
            Token::Text(text) => builder.text(text),
            Token::Start(tag) => {
                let raw_text = !tag.self_closing && is_raw_text_tag(&tag.name);
                let name = tag.name.clone();
                let node = builder.start(tag);
                if raw_text {
                    let body = reader.raw_text(&name)?;
                    if !body.is_empty() {
                        builder.dom.create_text(node, body.to_string());
                    }
                }
            }
            Token::End(name) => builder.end(&name),
        }
    }
    Ok(builder.dom)
}

struct StartTag {
    name: String,
    attrs: HashMap<String, String>,
    self_closing: bool,
}

enum Token<'a> {
    Text(&'a str),
    Start(StartTag),
    End(String),
}

struct HtmlReader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> HtmlReader<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches(|ch: char| ch.is_ascii_whitespace()).len();
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|ch: char| !keep(ch)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Ok(None);
            }
            if let Some(comment) = rest.strip_prefix("<!--") {
                let end = comment
                    .find("-->")
                    .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
                self.pos += "<!--".len() + end + "-->".len();
                continue;
            }
            if rest.starts_with("</") {
                return Ok(Some(Token::End(self.end_tag()?)));
            }
            if rest.starts_with("<!") {
                self.skip_declaration()?;
                continue;
            }
            if rest.starts_with('<') {
                return Ok(Some(Token::Start(self.start_tag()?)));
            }

            let text = self.take_while(|ch| ch != '<');
            return Ok(Some(Token::Text(text)));
        }
    }

    fn skip_declaration(&mut self) -> Result<()> {
        let mut quote = None;
        for (offset, ch) in self.rest().char_indices().skip(2) {
            match (quote, ch) {
                (Some(open), ch) if ch == open => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '>') => {
                    self.pos += offset + 1;
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(Error::HtmlParse("unclosed declaration tag".into()))
    }

    fn start_tag(&mut self) -> Result<StartTag> {
        self.pos += 1;
        self.skip_whitespace();
        let name = self.take_while(is_tag_name_char).to_ascii_lowercase();
        if name.is_empty() {
            return Err(Error::HtmlParse("empty tag name".into()));
        }

        let mut attrs = HashMap::new();
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            let self_closing = if rest.starts_with('>') {
                self.pos += 1;
                false
            } else if rest.starts_with("/>") {
                self.pos += 2;
                true
            } else if let Some(junk) = rest.chars().next() {
                let attr_name = self.take_while(is_attr_name_char).to_ascii_lowercase();
                if attr_name.is_empty() {
                    self.pos += junk.len_utf8();
                    continue;
                }
                self.skip_whitespace();
                let value = if self.rest().starts_with('=') {
                    self.pos += 1;
                    self.skip_whitespace();
                    self.attr_value()?
                } else {
                    String::new()
                };
                // The first occurrence of an attribute wins.
                attrs.entry(attr_name).or_insert(value);
                continue;
            } else {
                return Err(Error::HtmlParse(format!("unclosed start tag <{name}>")));
            };

            return Ok(StartTag {
                name,
                attrs,
                self_closing,
            });
        }
    }

    fn attr_value(&mut self) -> Result<String> {
        let rest = self.rest();
        let raw = match rest.chars().next() {
            None => return Err(Error::HtmlParse("missing attribute value".into())),
            Some(quote @ ('"' | '\'')) => {
                let len = rest[1..].find(quote).ok_or_else(|| {
                    Error::HtmlParse("unclosed quoted attribute value".into())
                })?;
                self.pos += len + 2;
                &rest[1..=len]
            }
            Some(_) => {
                let len = rest
                    .char_indices()
                    .find(|&(at, ch)| {
                        ch.is_ascii_whitespace() || ch == '>' || rest[at..].starts_with("/>")
                    })
                    .map_or(rest.len(), |(at, _)| at);
                self.pos += len;
                &rest[..len]
            }
        };
        Ok(decode_entities(raw))
    }

    fn end_tag(&mut self) -> Result<String> {
        self.pos += 2;
        self.skip_whitespace();
        let name = self.take_while(is_tag_name_char).to_ascii_lowercase();
        let close = self
            .rest()
            .find('>')
            .ok_or_else(|| Error::HtmlParse(format!("unclosed end tag </{name}")))?;
        self.pos += close + 1;
        Ok(name)
    }

    /// Body of a raw text element up to its end tag, which is consumed.
    fn raw_text(&mut self, tag: &str) -> Result<&'a str> {
        let rest = self.rest();
        let mut from = 0;
        while let Some(found) = rest[from..].find("</") {
            let at = from + found;
            let after = rest[at + 2..].trim_start_matches(|ch: char| ch.is_ascii_whitespace());
            let closes = after
                .get(..tag.len())
                .is_some_and(|name| name.eq_ignore_ascii_case(tag))
                && !after[tag.len()..].starts_with(|ch: char| ch.is_ascii_alphanumeric());
            if closes {
                self.pos += at;
                self.end_tag()?;
                return Ok(&rest[..at]);
            }
            from = at + 2;
        }
        Err(Error::HtmlParse(format!("unclosed <{tag}>")))
    }
}

struct TreeBuilder {
    dom: Dom,
    /// Open elements, outermost first. Index 0 is the document.
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        let dom = Dom::new();
        let open = vec![dom.root];
        Self { dom, open }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.dom.root)
    }

    fn text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        if !decoded.is_empty() {
            let parent = self.current();
            self.dom.create_text(parent, decoded);
        }
    }

    fn start(&mut self, tag: StartTag) -> NodeId {
        let implied = match tag.name.as_str() {
            "li" => self.innermost("li", &["ul", "ol", "menu"]),
            name if closes_paragraph(name) => self.innermost("p", &[]),
            _ => None,
        };
        if let Some(index) = implied {
            self.open.truncate(index);
        }

        let stays_open =
            !tag.self_closing && !is_void_tag(&tag.name) && !is_raw_text_tag(&tag.name);
        let parent = self.current();
        let node = self.dom.create_element(parent, tag.name, tag.attrs);
        if stays_open {
            self.open.push(node);
        }
        node
    }

    fn end(&mut self, name: &str) {
        if let Some(index) = self.innermost(name, &[]) {
            self.open.truncate(index);
        }
    }

    /// Stack index of the innermost open `tag`, not looking past any
    /// element named in `scope`.
    fn innermost(&self, tag: &str, scope: &[&str]) -> Option<usize> {
        for (index, node) in self.open.iter().enumerate().skip(1).rev() {
            let Some(name) = self.dom.tag_name(*node) else {
                continue;
            };
            if name == tag {
                return Some(index);
            }
            if scope.contains(&name) {
                return None;
            }
        }
        None
    }
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match entity_at(rest) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes the reference `text` starts with, returning it and its length.
fn entity_at(text: &str) -> Option<(char, usize)> {
    let end = text.find(';')?;
    let body = &text[1..end];
    if body.is_empty() || body.contains(|ch: char| ch == '&' || ch.is_whitespace()) {
        return None;
    }
    let ch = match body.strip_prefix('#') {
        Some(number) => {
            let code = match number.strip_prefix(|ch: char| ch == 'x' || ch == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)?
        }
        None => NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == body)
            .map(|(_, ch)| *ch)?,
    };
    Some((ch, end + 1))
}

fn closes_paragraph(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "div"
            | "footer"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "section"
            | "ul"
    )
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_tag_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn is_attr_name_char(ch: char) -> bool {
    is_tag_name_char(ch) || ch == ':'
}
