use super::*;

/// `[name]` or `[name=value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrTest {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

/// Conditions on a single element, such as `a.nav-chapters[target=_blank]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrTest>,
    /// Each entry is the selector list of one `:not(...)`.
    pub(crate) negations: Vec<Vec<ComplexSelector>>,
}

impl Compound {
    /// The id when the compound is nothing but `#id`.
    pub(crate) fn bare_id(&self) -> Option<&str> {
        let only_id = self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.negations.is_empty();
        if only_id { self.id.as_deref() } else { None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relation {
    /// Whitespace: any ancestor.
    Ancestor,
    /// `>`: the direct parent.
    Parent,
}

/// Compounds joined by combinators, stored from the subject outwards:
/// `nav > a i` is subject `i`, then `(Ancestor, a)`, then `(Parent, nav)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ComplexSelector {
    pub(crate) subject: Compound,
    pub(crate) ancestors: Vec<(Relation, Compound)>,
}

/// Parses a comma-separated selector list.
pub(crate) fn parse_selector_list(source: &str) -> Result<Vec<ComplexSelector>> {
    let mut parser = SelectorParser {
        source,
        rest: source,
    };
    let list = parser.list()?;
    parser.skip_whitespace();
    if !parser.rest.is_empty() {
        return Err(parser.unsupported());
    }
    Ok(list)
}

struct SelectorParser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> SelectorParser<'a> {
    fn unsupported(&self) -> Error {
        Error::UnsupportedSelector(self.source.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, ch: char) -> bool {
        match self.rest.strip_prefix(ch) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, ch: char) -> Result<()> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.unsupported())
        }
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let trimmed = self.rest.trim_start();
        let skipped = trimmed.len() != self.rest.len();
        self.rest = trimmed;
        skipped
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> Option<&'a str> {
        let len = self
            .rest
            .find(|ch: char| !keep(ch))
            .unwrap_or(self.rest.len());
        if len == 0 {
            return None;
        }
        let (taken, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(taken)
    }

    fn ident(&mut self) -> Result<String> {
        self.take_while(is_ident_char)
            .map(str::to_string)
            .ok_or_else(|| self.unsupported())
    }

    fn list(&mut self) -> Result<Vec<ComplexSelector>> {
        let mut list = vec![self.complex()?];
        while self.eat(',') {
            list.push(self.complex()?);
        }
        Ok(list)
    }

    fn complex(&mut self) -> Result<ComplexSelector> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut relations = Vec::new();
        loop {
            let spaced = self.skip_whitespace();
            let relation = if self.eat('>') {
                self.skip_whitespace();
                Relation::Parent
            } else if spaced && self.peek().is_some_and(starts_compound) {
                Relation::Ancestor
            } else {
                break;
            };
            relations.push(relation);
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().ok_or_else(|| self.unsupported())?;
        let mut ancestors = Vec::with_capacity(relations.len());
        while let (Some(relation), Some(compound)) = (relations.pop(), compounds.pop()) {
            ancestors.push((relation, compound));
        }
        Ok(ComplexSelector { subject, ancestors })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut any = self.eat('*');
        if !any && self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?);
            any = true;
        }

        loop {
            if self.eat('#') {
                let id = self.ident()?;
                if compound.id.replace(id).is_some() {
                    return Err(self.unsupported());
                }
            } else if self.eat('.') {
                compound.classes.push(self.ident()?);
            } else if self.eat('[') {
                compound.attrs.push(self.attr_test()?);
            } else if self.eat(':') {
                compound.negations.push(self.negation()?);
            } else {
                break;
            }
            any = true;
        }

        if any {
            Ok(compound)
        } else {
            Err(self.unsupported())
        }
    }

    fn attr_test(&mut self) -> Result<AttrTest> {
        self.skip_whitespace();
        let name = self
            .take_while(|ch| is_ident_char(ch) || ch == ':')
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| self.unsupported())?;
        self.skip_whitespace();
        if self.eat(']') {
            return Ok(AttrTest { name, value: None });
        }

        self.expect('=')?;
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.rest = &self.rest[1..];
                let end = self.rest.find(quote).ok_or_else(|| self.unsupported())?;
                let value = self.rest[..end].to_string();
                self.rest = &self.rest[end + 1..];
                value
            }
            _ => self
                .take_while(|ch| !ch.is_whitespace() && ch != ']')
                .map(str::to_string)
                .ok_or_else(|| self.unsupported())?,
        };
        self.skip_whitespace();
        self.expect(']')?;
        Ok(AttrTest {
            name,
            value: Some(value),
        })
    }

    fn negation(&mut self) -> Result<Vec<ComplexSelector>> {
        self.rest = self
            .rest
            .strip_prefix("not(")
            .ok_or_else(|| self.unsupported())?;
        let inner = self.list()?;
        self.skip_whitespace();
        self.expect(')')?;
        Ok(inner)
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn starts_compound(ch: char) -> bool {
    is_ident_char(ch) || matches!(ch, '*' | '#' | '.' | '[' | ':')
}
