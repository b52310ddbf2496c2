use super::*;

mod dom_selector;

pub(super) const BEM_MENU_HTML: &str = r##"
    <header>
      <div id="site-menu" class="menu">
        <div class="menu__wrapper">
          <div class="menu__panel">
            <div class="menu__overlay"></div>
            <nav class="menu__nav">
              <div class="menu__header">
                <button type="button" class="menu__back"><i class="bi-chevron-left"></i></button>
                <div class="menu__title"></div>
                <button type="button" class="menu__close"><i class="bi-x"></i></button>
              </div>
              <ul class="menu__list">
                <li class="menu__link"><a id="home" href="/">Home</a></li>
                <li id="docs" class="menu__children">
                  <a id="docs-link" href="#">
                    Docs
                    <i class="menu__icon bi-chevron-down"></i>
                  </a>
                  <div class="menu__subs">
                    <div class="menu__submenu">
                      <ul>
                        <li id="guides" class="menu__children">
                          <a id="guides-link" href="#">Guides<i class="menu__icon"></i></a>
                          <div class="menu__subs">
                            <div class="menu__submenu">
                              <ul>
                                <li id="tutorials" class="menu__children">
                                  <a id="tutorials-link" href="#">Tutorials<i class="menu__icon"></i></a>
                                  <div class="menu__subs">
                                    <div class="menu__submenu"><ul>
                                      <li class="menu__link"><a id="first-steps" href="/first-steps">First steps</a></li>
                                    </ul></div>
                                  </div>
                                </li>
                              </ul>
                            </div>
                          </div>
                        </li>
                        <li class="menu__link"><a id="api" href="/api">API</a></li>
                      </ul>
                    </div>
                  </div>
                </li>
                <li class="menu__link"><a id="repo" href="https://example.com/repo" target="_blank">Repository</a></li>
              </ul>
            </nav>
          </div>
          <button type="button" class="menu__trigger"><span></span></button>
        </div>
      </div>
    </header>
    "##;

#[test]
fn rendered_menu_drills_down_and_back() -> Result<()> {
    let menu = Menu::new().with_id("main").add_item(Item::submenu(
        "Docs",
        Submenu::new()
            .with_title("Documentation")
            .add_item(Item::link("Guide", "/guide"))
            .add_item(Item::label("Reference")),
    ));

    let mut page = Page::from_html(&menu.render())?;
    assert_eq!(page.menu_count(), 1);
    page.click("#main .menu__trigger")?;
    page.click("#main .menu__children > a")?;
    page.assert_text("#main .menu__title", "Docs")?;
    page.assert_class("#main .menu__subs", "active", true)?;
    assert_eq!(page.menu_depth(0)?, 1);

    page.click("#main .menu__back")?;
    page.assert_text("#main .menu__title", "")?;
    page.advance_time(300)?;
    page.assert_class("#main .menu__subs", "active", false)?;
    page.assert_style("#main .menu__subs", "animation", "")?;
    Ok(())
}

#[test]
fn assertion_failure_reports_selector_and_snippet() -> Result<()> {
    let page = Page::from_html(BEM_MENU_HTML)?;
    let err = match page.assert_text(".menu__title", "Docs") {
        Ok(()) => panic!("title should start empty"),
        Err(err) => err,
    };
    match err {
        Error::AssertionFailed {
            selector,
            expected,
            actual,
            dom_snippet,
        } => {
            assert_eq!(selector, ".menu__title");
            assert_eq!(expected, "Docs");
            assert_eq!(actual, "");
            assert_eq!(dom_snippet, "<div class=\"menu__title\"></div>");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_click_target_is_selector_not_found() -> Result<()> {
    let mut page = Page::from_html(BEM_MENU_HTML)?;
    assert_eq!(
        page.click("#nope"),
        Err(Error::SelectorNotFound("#nope".into()))
    );
    Ok(())
}

#[test]
fn error_messages_name_the_problem() {
    let err = Error::MissingElement {
        widget: "menu (.menu)".into(),
        selector: ".menu__back".into(),
    };
    assert_eq!(
        err.to_string(),
        "menu (.menu) is missing required element .menu__back"
    );
    assert_eq!(
        Error::NotAnElement("style".into()).to_string(),
        "style target is not an element"
    );
}

#[test]
fn format_float_drops_trailing_zeros() {
    assert_eq!(format_float(12.0), "12");
    assert_eq!(format_float(12.5), "12.5");
    assert_eq!(format_float(-0.0), "0");
    assert_eq!(format_float(1.0 / 3.0), "0.333333");
}
