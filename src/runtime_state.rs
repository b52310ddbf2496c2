use super::*;
use std::collections::VecDeque;

/// Handle of a scheduled one-shot task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due_at: i64,
    pub order: i64,
}

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    id: TimerId,
    due_at: i64,
    order: i64,
    payload: T,
}

/// Something that can defer work by a number of milliseconds.
///
/// Widgets schedule their transition cleanups through this trait so they
/// can run against the page's clock or a bare [`Scheduler`] in tests.
pub trait Timers<T> {
    fn set_timeout(&mut self, delay_ms: i64, task: T) -> TimerId;

    /// Returns whether the timer was still pending.
    fn clear_timeout(&mut self, id: TimerId) -> bool;

    fn is_pending(&self, id: TimerId) -> bool;
}

/// Deterministic clock plus a queue of one-shot tasks.
///
/// Tasks are ordered by `(due_at, order)`, where `order` is the insertion
/// sequence, so tasks due at the same instant run first-in first-out.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    task_queue: Vec<ScheduledTask<T>>,
    now_ms: i64,
    timer_step_limit: usize,
    next_timer_id: u64,
    next_task_order: i64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn timer_step_limit(&self) -> usize {
        self.timer_step_limit
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Timer(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn schedule(&mut self, delay_ms: i64, payload: T) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        let due_at = self.now_ms.saturating_add(delay_ms.max(0));
        self.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            payload,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.task_queue.len();
        self.task_queue.retain(|task| task.id != id);
        self.task_queue.len() != before
    }

    pub fn clear_all(&mut self) -> usize {
        let cleared = self.task_queue.len();
        self.task_queue.clear();
        cleared
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.task_queue.iter().any(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.task_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_queue.is_empty()
    }

    pub fn pending(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    /// Moves the clock to `target_ms` without running anything.
    pub fn set_now(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.now_ms {
            return Err(Error::Timer(format!(
                "clock cannot move backwards (target={target_ms}, now_ms={})",
                self.now_ms
            )));
        }
        self.now_ms = target_ms;
        Ok(())
    }

    /// Pops the next task due at or before `limit`, moving the clock up to
    /// its due time. Returns `None` once nothing else is due by `limit`.
    pub fn pop_due_until(&mut self, limit: i64) -> Option<(TimerId, T)> {
        let idx = self.next_task_index(Some(limit))?;
        let task = self.task_queue.remove(idx);
        if task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        Some((task.id, task.payload))
    }

    /// Pops the next task that is already due.
    pub fn pop_due(&mut self) -> Option<(TimerId, T)> {
        self.pop_due_until(self.now_ms)
    }

    /// Pops the next task regardless of its due time, jumping the clock
    /// forward when needed.
    pub fn pop_next(&mut self) -> Option<(TimerId, T)> {
        let idx = self.next_task_index(None)?;
        let task = self.task_queue.remove(idx);
        if task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        Some((task.id, task.payload))
    }

    /// Whether a task is waiting, due by `due_limit` when one is given.
    pub fn has_task(&self, due_limit: Option<i64>) -> bool {
        self.next_task_index(due_limit).is_some()
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    pub(crate) fn step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());

        let next_task_desc = self
            .next_task_index(due_limit)
            .and_then(|idx| self.task_queue.get(idx))
            .map(|task| {
                format!(
                    "id={},due_at={},order={}",
                    task.id, task.due_at, task.order
                )
            })
            .unwrap_or_else(|| "none".into());

        Error::Timer(format!(
            "timer queue exceeded max task steps: limit={}, steps={steps}, now_ms={}, due_limit={}, pending_tasks={}, next_task={}",
            self.timer_step_limit,
            self.now_ms,
            due_limit_desc,
            self.task_queue.len(),
            next_task_desc
        ))
    }
}

impl<T> Timers<T> for Scheduler<T> {
    fn set_timeout(&mut self, delay_ms: i64, task: T) -> TimerId {
        self.schedule(delay_ms, task)
    }

    fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.cancel(id)
    }

    fn is_pending(&self, id: TimerId) -> bool {
        Scheduler::is_pending(self, id)
    }
}

/// Window geometry as the widgets observe it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
    pub root_font_size: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 667.0,
            scroll_y: 0.0,
            root_font_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuBinding {
    Trigger,
    Section,
    Back,
    Close,
    Overlay,
    OutboundLink,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Listener {
    Menu { menu: usize, binding: MenuBinding },
    Navigator,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
    window: HashMap<String, Vec<Listener>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    pub(crate) fn add_window(&mut self, event: &str, listener: Listener) {
        self.window
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn get_window(&self, event: &str) -> Vec<Listener> {
        self.window.get(event).cloned().unwrap_or_default()
    }
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

impl TraceState {
    pub(crate) fn event_line(&mut self, line: impl FnOnce() -> String) {
        if self.enabled && self.events {
            self.line(line());
        }
    }

    pub(crate) fn timer_line(&mut self, line: impl FnOnce() -> String) {
        if self.enabled && self.timers {
            self.line(line());
        }
    }

    pub(crate) fn line(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        tracing::debug!(target: "nav_widgets::trace", "{line}");
        while self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }
}
