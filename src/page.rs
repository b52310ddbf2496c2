use super::*;
use crate::core_impl::parse_html;
use crate::menu::{DomMenuView, MenuNodes};
use crate::positioner::ChapterNavigator;
use crate::runtime_state::{Listener, ListenerStore, MenuBinding, TraceState, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTask {
    Menu { menu: usize, task: MenuTask<NodeId> },
}

#[derive(Debug, Clone)]
struct MountedMenu {
    markup: MenuMarkup,
    nodes: MenuNodes,
    controller: MenuController<NodeId>,
}

/// Schedules one menu's tasks on the page clock.
struct MenuTimers<'a> {
    scheduler: &'a mut Scheduler<PageTask>,
    trace: &'a mut TraceState,
    menu: usize,
}

impl Timers<MenuTask<NodeId>> for MenuTimers<'_> {
    fn set_timeout(&mut self, delay_ms: i64, task: MenuTask<NodeId>) -> TimerId {
        let id = self.scheduler.schedule(
            delay_ms,
            PageTask::Menu {
                menu: self.menu,
                task,
            },
        );
        let due_at = self.scheduler.now_ms().saturating_add(delay_ms.max(0));
        self.trace.timer_line(|| {
            format!(
                "[timer] schedule id={id} due_at={due_at} delay_ms={delay_ms} menu={} task={task:?}",
                self.menu
            )
        });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) -> bool {
        let cleared = self.scheduler.cancel(id);
        if cleared {
            self.trace
                .timer_line(|| format!("[timer] clear id={id} menu={}", self.menu));
        }
        cleared
    }

    fn is_pending(&self, id: TimerId) -> bool {
        self.scheduler.is_pending(id)
    }
}

/// A parsed document with every widget it contains mounted and running.
///
/// Nothing happens on its own: actions (`click`, `scroll_to`, `resize`)
/// run listeners synchronously and deferred transitions wait until the
/// clock is advanced.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    config: WidgetConfig,
    viewport: Viewport,
    scheduler: Scheduler<PageTask>,
    listeners: ListenerStore,
    menus: Vec<MountedMenu>,
    navigator: ChapterNavigator,
    trace: TraceState,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, WidgetConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: WidgetConfig) -> Result<Self> {
        config.validate()?;
        let dom = parse_html(html)?;
        let mut scheduler = Scheduler::new();
        scheduler.set_timer_step_limit(config.timer_step_limit)?;
        let viewport = Viewport {
            width: config.viewport.width,
            height: config.viewport.height,
            scroll_y: 0.0,
            root_font_size: config.root_font_size,
        };

        let mut page = Self {
            dom,
            config,
            viewport,
            scheduler,
            listeners: ListenerStore::default(),
            menus: Vec::new(),
            navigator: ChapterNavigator::default(),
            trace: TraceState::default(),
        };
        page.mount_menus()?;
        page.mount_navigator()?;
        tracing::debug!(
            menus = page.menus.len(),
            navigator = !page.navigator.is_empty(),
            "page mounted"
        );
        Ok(page)
    }

    fn mount_menus(&mut self) -> Result<()> {
        let mut claimed: Vec<NodeId> = Vec::new();
        for markup in self.config.markups()? {
            for container in self.dom.query_selector_all(&markup.container)? {
                let overlaps = claimed.iter().any(|other| {
                    *other == container
                        || self.dom.is_descendant_of(container, *other)
                        || self.dom.is_descendant_of(*other, container)
                });
                if overlaps {
                    tracing::debug!(container = %markup.container, "skipped nested menu container");
                    continue;
                }

                let nodes = MenuNodes::resolve(&self.dom, container, &markup)?;
                let menu = self.menus.len();
                let bind = |binding| Listener::Menu { menu, binding };
                self.listeners
                    .add(nodes.trigger, "click", bind(MenuBinding::Trigger));
                self.listeners
                    .add(nodes.section, "click", bind(MenuBinding::Section));
                self.listeners
                    .add(nodes.back, "click", bind(MenuBinding::Back));
                self.listeners
                    .add(nodes.close, "click", bind(MenuBinding::Close));
                self.listeners
                    .add(nodes.overlay, "click", bind(MenuBinding::Overlay));
                for link in &nodes.outbound {
                    self.listeners
                        .add(*link, "click", bind(MenuBinding::OutboundLink));
                }
                self.listeners
                    .add_window("resize", bind(MenuBinding::Resize));

                claimed.push(container);
                self.menus.push(MountedMenu {
                    markup: markup.clone(),
                    nodes,
                    controller: MenuController::new(self.config.transition_ms),
                });
            }
        }
        Ok(())
    }

    fn mount_navigator(&mut self) -> Result<()> {
        if !self.config.navigator.enabled {
            return Ok(());
        }
        self.navigator = ChapterNavigator::mount(&self.dom, &self.config.navigator)?;
        if self.navigator.is_empty() {
            return Ok(());
        }
        self.listeners.add_window("scroll", Listener::Navigator);
        self.listeners.add_window("resize", Listener::Navigator);
        self.navigator.reposition_all(&mut self.dom, &self.viewport)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace.logs).into()
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace.timers = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace.log_limit = max_entries;
        while self.trace.logs.len() > self.trace.log_limit {
            self.trace.logs.pop_front();
        }
        Ok(())
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        self.scheduler.set_timer_step_limit(max_steps)
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if let Some(focusable) = self.dom.closest(target, "a, button")? {
            self.dom.active_element = Some(focusable);
        }
        self.dispatch_click(target)
    }

    fn dispatch_click(&mut self, target: NodeId) -> Result<()> {
        let mut path = vec![target];
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        let label = self.node_label(target);
        let mut ran = 0usize;
        for current in path {
            for listener in self.listeners.get(current, "click") {
                ran += 1;
                self.run_click_listener(listener, target, current)?;
            }
        }
        self.trace
            .event_line(|| format!("[event] click target={label} listeners={ran}"));
        Ok(())
    }

    fn run_click_listener(
        &mut self,
        listener: Listener,
        target: NodeId,
        current: NodeId,
    ) -> Result<()> {
        let Listener::Menu { menu, binding } = listener else {
            return Ok(());
        };
        match binding {
            MenuBinding::Trigger => {
                self.with_menu(menu, "trigger", |controller, view, timers| {
                    controller.trigger(view, timers)
                })?;
            }
            MenuBinding::Section => {
                let Some(level) = self.resolve_level(menu, target)? else {
                    return Ok(());
                };
                self.with_menu(menu, "child_click", |controller, view, timers| {
                    controller.child_click(level, view, timers)
                })?;
            }
            MenuBinding::Back => {
                self.with_menu(menu, "back", |controller, view, timers| {
                    controller.back(view, timers)
                })?;
            }
            MenuBinding::Close => {
                self.with_menu(menu, "close", |controller, view, timers| {
                    controller.close(view, timers)
                })?;
            }
            MenuBinding::Overlay => {
                let resets = self.mounted_menu(menu)?.markup.overlay_resets;
                self.with_menu(menu, "overlay", |controller, view, timers| {
                    controller.overlay(resets, view, timers)
                })?;
            }
            MenuBinding::OutboundLink => {
                self.with_menu(menu, "outbound", |controller, view, timers| {
                    controller.outbound(view, timers)
                })?;
                if self.dom.active_element == Some(current) {
                    self.dom.active_element = None;
                }
            }
            MenuBinding::Resize => {}
        }
        Ok(())
    }

    /// Children element a click inside the root list landed in.
    fn resolve_level(&self, menu: usize, target: NodeId) -> Result<Option<NodeId>> {
        let mounted = self.mounted_menu(menu)?;
        let section = mounted.nodes.section;
        Ok(self
            .dom
            .closest(target, &mounted.markup.children)?
            .filter(|level| self.dom.is_descendant_of(*level, section)))
    }

    fn with_menu<F>(&mut self, index: usize, action: &str, f: F) -> Result<bool>
    where
        F: FnOnce(
            &mut MenuController<NodeId>,
            &mut DomMenuView<'_>,
            &mut MenuTimers<'_>,
        ) -> Result<bool>,
    {
        let Self {
            dom,
            menus,
            scheduler,
            trace,
            ..
        } = self;
        let MountedMenu {
            markup,
            nodes,
            controller,
        } = menus
            .get_mut(index)
            .ok_or_else(|| Error::SelectorNotFound(format!("menu index {index}")))?;

        let mut view = DomMenuView::new(dom, nodes, markup);
        let mut timers = MenuTimers {
            scheduler,
            trace: &mut *trace,
            menu: index,
        };
        let handled = f(&mut *controller, &mut view, &mut timers)?;
        let depth = controller.depth();
        trace.event_line(|| {
            format!("[menu] index={index} action={action} handled={handled} depth={depth}")
        });
        Ok(handled)
    }

    pub fn scroll_to(&mut self, scroll_y: f64) -> Result<()> {
        self.viewport.scroll_y = scroll_y;
        self.dispatch_window("scroll")
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(Error::Config(format!(
                "viewport must be non-negative: {width}x{height}"
            )));
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.dispatch_window("resize")
    }

    fn dispatch_window(&mut self, event: &str) -> Result<()> {
        let listeners = self.listeners.get_window(event);
        for listener in &listeners {
            match *listener {
                Listener::Navigator => {
                    self.navigator.reposition_all(&mut self.dom, &self.viewport)?;
                }
                Listener::Menu {
                    menu,
                    binding: MenuBinding::Resize,
                } => {
                    let width = self.viewport.width;
                    let breakpoint = self
                        .mounted_menu(menu)?
                        .markup
                        .breakpoint
                        .resolve(self.viewport.root_font_size);
                    self.with_menu(menu, "resize", |controller, view, timers| {
                        controller.resize(width, breakpoint, view, timers)
                    })?;
                }
                Listener::Menu { .. } => {}
            }
        }
        let viewport = self.viewport;
        self.trace.event_line(|| {
            format!(
                "[event] {event} width={} height={} scroll_y={} listeners={}",
                format_float(viewport.width),
                format_float(viewport.height),
                format_float(viewport.scroll_y),
                listeners.len()
            )
        });
        Ok(())
    }

    pub fn set_layout_box(&mut self, selector: &str, layout: LayoutBox) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_layout_box(target, layout)
    }

    /// Changes the root font size that `rem` breakpoints resolve against.
    pub fn set_root_font_size(&mut self, px: f64) -> Result<()> {
        if !(px.is_finite() && px > 0.0) {
            return Err(Error::Config(format!("root font size must be positive: {px}")));
        }
        self.viewport.root_font_size = px;
        Ok(())
    }

    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms()
    }

    pub fn clear_timer(&mut self, timer_id: TimerId) -> bool {
        let existed = self.scheduler.cancel(timer_id);
        self.trace
            .timer_line(|| format!("[timer] clear id={timer_id} existed={existed}"));
        existed
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.scheduler.clear_all();
        self.trace
            .timer_line(|| format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.scheduler.pending()
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Timer(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms();
        let target = from.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(target))?;
        self.scheduler.set_now(target)?;
        self.trace.timer_line(|| {
            format!("[timer] advance delta_ms={delta_ms} from={from} to={target} ran_due={ran}")
        });
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let from = self.scheduler.now_ms();
        if target_ms < from {
            return Err(Error::Timer(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={from})"
            )));
        }
        let ran = self.run_timer_queue(Some(target_ms))?;
        self.scheduler.set_now(target_ms)?;
        self.trace.timer_line(|| {
            format!("[timer] advance_to from={from} to={target_ms} ran_due={ran}")
        });
        Ok(())
    }

    /// Runs every pending task, jumping the clock forward as needed.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms();
        let ran = self.run_timer_queue(None)?;
        let to = self.scheduler.now_ms();
        self.trace
            .timer_line(|| format!("[timer] flush from={from} to={to} ran={ran}"));
        Ok(())
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some((id, task)) = self.scheduler.pop_next() else {
            self.trace.timer_line(|| "[timer] run_next none".into());
            return Ok(false);
        };
        self.execute_timer_task(id, task)?;
        Ok(true)
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let now = self.scheduler.now_ms();
        let ran = self.run_timer_queue(Some(now))?;
        self.trace
            .timer_line(|| format!("[timer] run_due now_ms={now} ran={ran}"));
        Ok(ran)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while self.scheduler.has_task(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit() {
                return Err(self.scheduler.step_limit_error(steps, due_limit));
            }
            let next = match due_limit {
                Some(limit) => self.scheduler.pop_due_until(limit),
                None => self.scheduler.pop_next(),
            };
            let Some((id, task)) = next else {
                break;
            };
            self.execute_timer_task(id, task)?;
        }
        Ok(steps)
    }

    fn execute_timer_task(&mut self, id: TimerId, task: PageTask) -> Result<()> {
        let now = self.scheduler.now_ms();
        self.trace
            .timer_line(|| format!("[timer] run id={id} now_ms={now} task={task:?}"));
        match task {
            PageTask::Menu { menu, task } => {
                self.with_menu(menu, "timer", |controller, view, timers| {
                    controller.run_task(id, task, view, timers)
                })?;
            }
        }
        Ok(())
    }

    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    pub fn menu_depth(&self, index: usize) -> Result<usize> {
        Ok(self.mounted_menu(index)?.controller.depth())
    }

    pub fn menu_phase(&self, index: usize) -> Result<MenuPhase> {
        let menu = self.mounted_menu(index)?;
        let open = menu.nodes.is_open(&self.dom, &menu.markup);
        Ok(menu.controller.phase(open))
    }

    fn mounted_menu(&self, index: usize) -> Result<&MountedMenu> {
        self.menus
            .get(index)
            .ok_or_else(|| Error::SelectorNotFound(format!("menu index {index}")))
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.class_contains(target, class_name)
    }

    /// Inline style property of the first match, empty when unset.
    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.style_get(target, property)
    }

    pub fn is_focused(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.active_element == Some(target))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        if actual != expected {
            let describe = |present: bool| {
                if present {
                    format!("class {class_name}")
                } else {
                    format!("no class {class_name}")
                }
            };
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: describe(expected),
                actual: describe(actual),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_get(target, property)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected}"),
                actual: format!("{property}: {actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn node_label(&self, node_id: NodeId) -> String {
        let Some(element) = self.dom.element(node_id) else {
            return "#text".into();
        };
        let mut label = element.tag_name.clone();
        if let Some(id) = element.attrs.get("id") {
            label.push('#');
            label.push_str(id);
        }
        for class in class_tokens(element.attrs.get("class").map(String::as_str)) {
            label.push('.');
            label.push_str(&class);
        }
        label
    }
}
