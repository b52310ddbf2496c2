use std::collections::VecDeque;

/// Open submenu levels, most recently opened first.
///
/// The front is the level currently shown; an empty stack means the menu
/// sits at its root list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack<L> {
    levels: VecDeque<L>,
}

impl<L> Default for NavigationStack<L> {
    fn default() -> Self {
        Self {
            levels: VecDeque::new(),
        }
    }
}

impl<L> NavigationStack<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_front(&mut self, level: L) {
        self.levels.push_front(level);
    }

    pub fn pop_front(&mut self) -> Option<L> {
        self.levels.pop_front()
    }

    pub fn top(&self) -> Option<&L> {
        self.levels.front()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.levels.iter()
    }
}

impl<L: PartialEq> NavigationStack<L> {
    pub fn contains(&self, level: &L) -> bool {
        self.levels.contains(level)
    }
}
