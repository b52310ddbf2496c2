use super::{MenuView, NavigationStack};
use crate::Result;
use crate::runtime_state::{TimerId, Timers};

/// Deferred work a menu hands to its scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTask<L> {
    /// Finish a close: clear the header and every submenu.
    Reset,
    /// Finish a back transition on the given level.
    HideLevel(L),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPhase {
    Closed,
    OpenRoot,
    /// Open with this many submenu levels stacked.
    OpenLevel(usize),
}

/// Drill-down state machine for one menu instance.
///
/// The controller owns the navigation stack and the ids of its deferred
/// cleanups. All screen changes go through a [`MenuView`]; deferred work is
/// scheduled through [`Timers`] and handed back via
/// [`run_task`](Self::run_task) when it comes due.
#[derive(Debug, Clone)]
pub struct MenuController<L> {
    stack: NavigationStack<L>,
    transition_ms: i64,
    pending_reset: Option<TimerId>,
    pending_hides: Vec<(TimerId, L)>,
}

impl<L: Copy + PartialEq + std::fmt::Debug> MenuController<L> {
    pub fn new(transition_ms: i64) -> Self {
        Self {
            stack: NavigationStack::new(),
            transition_ms: transition_ms.max(0),
            pending_reset: None,
            pending_hides: Vec::new(),
        }
    }

    pub fn stack(&self) -> &NavigationStack<L> {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn transition_ms(&self) -> i64 {
        self.transition_ms
    }

    pub fn has_pending_reset(&self) -> bool {
        self.pending_reset.is_some()
    }

    pub fn pending_hide_count(&self) -> usize {
        self.pending_hides.len()
    }

    /// Phase for a menu whose nav is `open` on screen.
    pub fn phase(&self, open: bool) -> MenuPhase {
        if !open {
            MenuPhase::Closed
        } else if self.stack.is_empty() {
            MenuPhase::OpenRoot
        } else {
            MenuPhase::OpenLevel(self.stack.depth())
        }
    }

    /// Trigger button: flips the menu open or closed.
    ///
    /// Closing through the trigger keeps the levels for the next open. A
    /// reset still pending from an earlier close is applied before opening.
    pub fn trigger<V, T>(&mut self, view: &mut V, timers: &mut T) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        if view.is_open() {
            view.toggle()?;
            tracing::debug!(depth = self.stack.depth(), "menu hidden by trigger");
            return Ok(true);
        }
        if let Some(id) = self.pending_reset.take() {
            timers.clear_timeout(id);
            self.apply_reset(view, timers)?;
        }
        view.toggle()?;
        tracing::debug!("menu opened");
        Ok(true)
    }

    /// Click inside the root list that resolved to `level`.
    ///
    /// Ignored while the menu is closed and when `level` is already shown.
    pub fn child_click<V, T>(&mut self, level: L, view: &mut V, timers: &mut T) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        if !view.is_open() || self.stack.top() == Some(&level) {
            return Ok(false);
        }

        if let Some(pos) = self.pending_hides.iter().position(|(_, l)| *l == level) {
            let (id, _) = self.pending_hides.remove(pos);
            timers.clear_timeout(id);
        }

        self.stack.push_front(level);
        view.show_level(level)?;
        let label = view.level_label(level)?;
        view.set_title(&label)?;
        tracing::debug!(depth = self.stack.depth(), ?level, "menu level opened");
        Ok(true)
    }

    /// Back button: leaves the current level.
    pub fn back<V, T>(&mut self, view: &mut V, timers: &mut T) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        let Some(level) = self.stack.pop_front() else {
            tracing::warn!("menu back ignored at root level");
            return Ok(false);
        };

        view.slide_out_level(level)?;
        self.pending_hides.retain(|(id, _)| timers.is_pending(*id));
        let id = timers.set_timeout(self.transition_ms, MenuTask::HideLevel(level));
        self.pending_hides.push((id, level));

        match self.stack.top().copied() {
            Some(top) => {
                let label = view.level_label(top)?;
                view.set_title(&label)?;
            }
            None => view.clear_title()?,
        }
        tracing::debug!(depth = self.stack.depth(), ?level, "menu level closed");
        Ok(true)
    }

    /// Close button, and anything else that dismisses the menu for good.
    ///
    /// The menu hides at once; the levels stay stacked until the reset runs
    /// after the transition. Does nothing if the menu is already closed.
    pub fn close<V, T>(&mut self, view: &mut V, timers: &mut T) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        if self.pending_reset.is_some() || !view.is_open() {
            return Ok(false);
        }
        view.toggle()?;
        self.pending_reset = Some(timers.set_timeout(self.transition_ms, MenuTask::Reset));
        tracing::debug!("menu closed");
        Ok(true)
    }

    pub fn outbound<V, T>(&mut self, view: &mut V, timers: &mut T) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        self.close(view, timers)
    }

    /// Overlay click. Without `resets` the menu only hides and keeps its
    /// levels for the next open.
    pub fn overlay<V, T>(&mut self, resets: bool, view: &mut V, timers: &mut T) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        if resets {
            return self.close(view, timers);
        }
        if !view.is_open() {
            return Ok(false);
        }
        view.toggle()?;
        tracing::debug!("menu hidden by overlay");
        Ok(true)
    }

    /// Window resize. Widening to the breakpoint closes an open menu.
    pub fn resize<V, T>(
        &mut self,
        width: f64,
        breakpoint_px: f64,
        view: &mut V,
        timers: &mut T,
    ) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        if width < breakpoint_px {
            return Ok(false);
        }
        self.close(view, timers)
    }

    /// Runs a task previously scheduled by this controller. Tasks that were
    /// superseded are dropped.
    pub fn run_task<V, T>(
        &mut self,
        id: TimerId,
        task: MenuTask<L>,
        view: &mut V,
        timers: &mut T,
    ) -> Result<bool>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        match task {
            MenuTask::Reset => {
                if self.pending_reset != Some(id) {
                    return Ok(false);
                }
                self.pending_reset = None;
                self.apply_reset(view, timers)?;
            }
            MenuTask::HideLevel(level) => {
                let Some(pos) = self.pending_hides.iter().position(|(pending, _)| *pending == id)
                else {
                    return Ok(false);
                };
                self.pending_hides.remove(pos);
                view.hide_level(level)?;
            }
        }
        Ok(true)
    }

    fn apply_reset<V, T>(&mut self, view: &mut V, timers: &mut T) -> Result<()>
    where
        V: MenuView<Level = L>,
        T: Timers<MenuTask<L>>,
    {
        for (id, _) in self.pending_hides.drain(..) {
            timers.clear_timeout(id);
        }
        self.stack.clear();
        view.reset()?;
        tracing::debug!("menu reset");
        Ok(())
    }
}
