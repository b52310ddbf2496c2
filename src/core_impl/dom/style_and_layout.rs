use super::*;

impl Dom {
    pub(crate) fn style_get(&self, node_id: NodeId, name: &str) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::NotAnElement("style".into()))?;
        let name = name.to_ascii_lowercase();
        let decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        Ok(decls
            .into_iter()
            .find(|(prop, _)| prop == &name)
            .map(|(_, value)| value)
            .unwrap_or_default())
    }

    pub(crate) fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("style".into()))?;

        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == &name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }

        // An emptied declaration block keeps the attribute, like CSSStyleDeclaration.
        element
            .attrs
            .insert("style".to_string(), serialize_style_declarations(&decls));
        Ok(())
    }

    pub(crate) fn style_remove(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::NotAnElement("style".into()));
        }
        if self.attr(node_id, "style").is_none() {
            return Ok(());
        }
        self.style_set(node_id, name, "")
    }

    pub(crate) fn layout_box(&self, node_id: NodeId) -> LayoutBox {
        self.layout.get(&node_id).copied().unwrap_or_default()
    }

    pub(crate) fn set_layout_box(&mut self, node_id: NodeId, layout: LayoutBox) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::NotAnElement("layout".into()));
        }
        self.layout.insert(node_id, layout);
        Ok(())
    }

    /// Viewport-relative top, as `getBoundingClientRect().top` reports it.
    pub(crate) fn client_top(&self, node_id: NodeId, scroll_y: f64) -> f64 {
        self.layout_box(node_id).top - scroll_y
    }
}
