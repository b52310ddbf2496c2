use super::*;

impl Dom {
    pub(crate) fn matches_compound(&self, node_id: NodeId, compound: &Compound) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        compound
            .tag
            .as_ref()
            .is_none_or(|tag| element.tag_name.eq_ignore_ascii_case(tag))
            && compound
                .id
                .as_ref()
                .is_none_or(|id| element.attrs.get("id") == Some(id))
            && compound
                .classes
                .iter()
                .all(|class_name| has_class(element, class_name))
            && compound.attrs.iter().all(|test| {
                element
                    .attrs
                    .get(&test.name)
                    .is_some_and(|actual| test.value.as_ref().is_none_or(|value| actual == value))
            })
            && !compound
                .negations
                .iter()
                .flatten()
                .any(|inner| self.matches_complex(node_id, inner))
    }

    pub(crate) fn matches_complex(&self, node_id: NodeId, selector: &ComplexSelector) -> bool {
        self.matches_compound(node_id, &selector.subject)
            && self.matches_ancestors(node_id, &selector.ancestors)
    }

    pub(crate) fn matches_list(&self, node_id: NodeId, list: &[ComplexSelector]) -> bool {
        list.iter()
            .any(|selector| self.matches_complex(node_id, selector))
    }

    // Tries every matching ancestor, so `div > p span` is not fooled by the
    // nearest `p` having the wrong parent.
    fn matches_ancestors(&self, node_id: NodeId, rest: &[(Relation, Compound)]) -> bool {
        let Some(((relation, compound), outer)) = rest.split_first() else {
            return true;
        };
        match relation {
            Relation::Parent => self.parent(node_id).is_some_and(|parent| {
                self.matches_compound(parent, compound) && self.matches_ancestors(parent, outer)
            }),
            Relation::Ancestor => {
                let mut cursor = self.parent(node_id);
                while let Some(ancestor) = cursor {
                    if self.matches_compound(ancestor, compound)
                        && self.matches_ancestors(ancestor, outer)
                    {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
        }
    }
}
