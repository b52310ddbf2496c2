use nav_widgets::{Item, Menu, MenuPhase, Page, Submenu};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};

const MENU_PROPTEST_REGRESSION_FILE: &str = "tests/proptest-regressions/menu_property_test.txt";
const DEFAULT_MENU_PROPTEST_CASES: u32 = 128;

const LEVEL_LINKS: [&str; 3] = ["#docs-link", "#guides-link", "#tutorials-link"];
const LEVEL_SUBS: [&str; 3] = [
    "#docs > .menu__subs",
    "#guides > .menu__subs",
    "#tutorials > .menu__subs",
];
const LEVEL_LABELS: [&str; 3] = ["Docs", "Guides", "Tutorials"];

#[derive(Clone, Debug)]
enum MenuAction {
    Trigger,
    /// Click the link of the next level down, or the current one at the bottom.
    Drill,
    ReclickCurrent,
    Back,
    Close,
    Overlay,
    Outbound,
    Resize(u16),
    Advance(u16),
}

const TRANSITION_MS: i64 = 300;

/// What a user would expect to see, tracked alongside the page.
#[derive(Debug, Default)]
struct Expected {
    open: bool,
    depth: usize,
    now_ms: i64,
    reset_due: Option<i64>,
}

impl Expected {
    fn apply(&mut self, action: &MenuAction) {
        match action {
            MenuAction::Trigger => {
                if self.open {
                    self.open = false;
                } else {
                    if self.reset_due.take().is_some() {
                        self.depth = 0;
                    }
                    self.open = true;
                }
            }
            MenuAction::Drill => {
                if self.open && self.depth < LEVEL_LINKS.len() {
                    self.depth += 1;
                }
            }
            MenuAction::ReclickCurrent => {}
            MenuAction::Back => self.depth = self.depth.saturating_sub(1),
            MenuAction::Close | MenuAction::Overlay | MenuAction::Outbound => self.dismiss(),
            MenuAction::Resize(width) => {
                if f64::from(*width) >= 992.0 {
                    self.dismiss();
                }
            }
            MenuAction::Advance(ms) => {
                self.now_ms += i64::from(*ms);
                if self.reset_due.is_some_and(|due| due <= self.now_ms) {
                    self.finish_reset();
                }
            }
        }
    }

    /// Hides an open menu; the levels stay until the transition ends.
    fn dismiss(&mut self) {
        if self.open {
            self.open = false;
            self.reset_due = Some(self.now_ms + TRANSITION_MS);
        }
    }

    fn finish_reset(&mut self) {
        self.reset_due = None;
        self.depth = 0;
    }

    fn title(&self) -> &'static str {
        match self.depth {
            0 => "",
            depth => LEVEL_LABELS[depth - 1],
        }
    }

    fn phase(&self) -> MenuPhase {
        match (self.open, self.depth) {
            (false, _) => MenuPhase::Closed,
            (true, 0) => MenuPhase::OpenRoot,
            (true, depth) => MenuPhase::OpenLevel(depth),
        }
    }
}

fn menu_proptest_cases() -> u32 {
    std::env::var("NAV_WIDGETS_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MENU_PROPTEST_CASES)
}

fn menu_html() -> String {
    let tutorials = Submenu::new().add_item(Item::link("First steps", "/first-steps"));
    let guides = Submenu::new().add_item(Item::submenu("Tutorials", tutorials));
    let docs = Submenu::new().add_item(Item::submenu("Guides", guides));
    let mut html = Menu::new()
        .add_item(Item::link("Home", "/"))
        .add_item(Item::submenu("Docs", docs))
        .add_item(Item::link_blank("Repository", "https://example.com/repo"))
        .render();
    for (id, label) in [("docs", "Docs"), ("guides", "Guides"), ("tutorials", "Tutorials")] {
        html = html.replacen(
            &format!("<li class=\"menu__children\"><a href=\"#\">{label}"),
            &format!("<li id=\"{id}\" class=\"menu__children\"><a id=\"{id}-link\" href=\"#\">{label}"),
            1,
        );
    }
    html
}

fn menu_action_strategy() -> BoxedStrategy<MenuAction> {
    prop_oneof![
        4 => Just(MenuAction::Trigger),
        5 => Just(MenuAction::Drill),
        1 => Just(MenuAction::ReclickCurrent),
        3 => Just(MenuAction::Back),
        2 => Just(MenuAction::Close),
        1 => Just(MenuAction::Overlay),
        1 => Just(MenuAction::Outbound),
        1 => (320u16..=1_400).prop_map(MenuAction::Resize),
        3 => (0u16..=400).prop_map(MenuAction::Advance),
    ]
    .boxed()
}

fn menu_action_sequence_strategy() -> BoxedStrategy<Vec<MenuAction>> {
    vec(menu_action_strategy(), 1..=32).boxed()
}

fn run_action(page: &mut Page, expected: &Expected, action: &MenuAction) -> nav_widgets::Result<()> {
    match action {
        MenuAction::Trigger => page.click(".menu__trigger"),
        MenuAction::Drill => {
            let next = expected.depth.min(LEVEL_LINKS.len() - 1);
            page.click(LEVEL_LINKS[next])
        }
        MenuAction::ReclickCurrent => match expected.depth {
            0 => page.click(".menu__title"),
            depth => page.click(LEVEL_LINKS[depth - 1]),
        },
        MenuAction::Back => page.click(".menu__back"),
        MenuAction::Close => page.click(".menu__close"),
        MenuAction::Overlay => page.click(".menu__overlay"),
        MenuAction::Outbound => page.click(".menu__link > a[target=\"_blank\"]"),
        MenuAction::Resize(width) => page.resize(f64::from(*width), 700.0),
        MenuAction::Advance(ms) => page.advance_time(i64::from(*ms)),
    }
}

fn assert_menu_tracks_expectations(actions: &[MenuAction]) -> TestCaseResult {
    let fail = |err: nav_widgets::Error| TestCaseError::fail(format!("{err:?}"));
    let mut page = Page::from_html(&menu_html()).map_err(fail)?;
    let mut expected = Expected::default();

    for (step, action) in actions.iter().enumerate() {
        let before = page.menu_depth(0).map_err(fail)?;
        if let Err(error) = run_action(&mut page, &expected, action) {
            prop_assert!(
                false,
                "action returned error at step {step}: {action:?}, error={error:?}, actions={actions:?}"
            );
        }
        expected.apply(action);

        let depth = page.menu_depth(0).map_err(fail)?;
        prop_assert!(
            depth.abs_diff(before) <= 1 || depth == 0,
            "depth jumped from {before} to {depth} at step {step}: {action:?}"
        );
        prop_assert_eq!(depth, expected.depth, "depth after step {}: {:?}", step, action);
        prop_assert_eq!(
            page.menu_phase(0).map_err(fail)?,
            expected.phase(),
            "phase after step {}: {:?}",
            step,
            action
        );
        prop_assert_eq!(
            page.text(".menu__title").map_err(fail)?,
            expected.title(),
            "title after step {}: {:?}",
            step,
            action
        );
        prop_assert_eq!(
            page.has_class(".menu__header", "active").map_err(fail)?,
            expected.depth > 0
        );
    }

    page.flush().map_err(fail)?;
    if expected.reset_due.is_some() {
        expected.finish_reset();
    }
    prop_assert!(page.pending_timers().is_empty());
    prop_assert_eq!(page.menu_depth(0).map_err(fail)?, expected.depth);
    for (index, subs) in LEVEL_SUBS.iter().enumerate() {
        let shown = index < expected.depth;
        prop_assert_eq!(
            page.has_class(subs, "active").map_err(fail)?,
            shown,
            "{} after flush, actions={:?}",
            subs,
            actions
        );
    }
    prop_assert_eq!(page.text(".menu__title").map_err(fail)?, expected.title());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: menu_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(MENU_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn random_menu_sessions_follow_the_drill_down_rules(actions in menu_action_sequence_strategy()) {
        assert_menu_tracks_expectations(&actions)?;
    }
}
