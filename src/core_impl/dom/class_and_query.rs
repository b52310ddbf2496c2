use super::*;

impl Dom {
    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::NotAnElement("classList".into()))?;
        Ok(has_class(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("classList".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("classList".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        let has = self.class_contains(node_id, class_name)?;
        if has {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.query_selector_from(self.root, selector)
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = parse_selector_list(selector)?;
        if let [only] = list.as_slice() {
            if let (Some(id), true) = (only.subject.bare_id(), only.ancestors.is_empty()) {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }
        Ok(self.select_descendants(self.root, &list))
    }

    pub(crate) fn query_selector_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>> {
        let list = parse_selector_list(selector)?;
        Ok(self.select_descendants(root, &list).into_iter().next())
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let list = parse_selector_list(selector)?;
        Ok(self.select_descendants(root, &list))
    }

    /// Matching elements under `root` in document order, `root` excluded.
    fn select_descendants(&self, root: NodeId, list: &[ComplexSelector]) -> Vec<NodeId> {
        let mut matched = Vec::new();
        let mut pending: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node_id) = pending.pop() {
            if self.matches_list(node_id, list) {
                matched.push(node_id);
            }
            pending.extend(self.children(node_id).iter().rev().copied());
        }
        matched
    }

    /// Nearest element from `node_id` upwards, itself included.
    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = parse_selector_list(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if self.matches_list(current, &list) {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }
}
