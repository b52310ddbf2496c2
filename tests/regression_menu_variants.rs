use nav_widgets::{Error, MenuPhase, Page, Result, WidgetConfig};

const LEGACY_MENU_HTML: &str = r##"
<div id="legacy" class="menu__container">
  <div class="menu__content">
    <div class="menu__main">
      <div class="menu__overlay"></div>
      <nav class="menu__nav">
        <div class="menu__header">
          <button type="button" class="menu__arrow"><i class="bi-chevron-left"></i></button>
          <div class="menu__title"></div>
          <button type="button" class="menu__close"><i class="bi-x"></i></button>
        </div>
        <ul class="menu__section">
          <li id="products" class="menu__children">
            <a id="products-link" href="#">Products<i class="menu__icon bi-chevron-down"></i></a>
            <div class="menu__subs">
              <div class="menu__submenu">
                <ul>
                  <li class="menu__link"><a id="external" href="https://example.com" target="_blank">External</a></li>
                </ul>
              </div>
            </div>
          </li>
        </ul>
      </nav>
    </div>
    <button type="button" class="menu__trigger"><span></span><span></span><span></span></button>
  </div>
</div>
"##;

const DASHED_MENU_HTML: &str = r##"
<div id="dashed" class="menu-container">
  <div class="menu-overlay"></div>
  <nav class="menu">
    <div class="menu-header">
      <button class="menu-arrow"><i class="fa fa-angle-left"></i></button>
      <div class="menu-title"></div>
      <button class="menu-close">&times;</button>
    </div>
    <ul class="menu-section">
      <li id="shop" class="menu-children">
        <a id="shop-link" href="#">Shop <i class="fa fa-angle-right"></i></a>
        <div class="menu-subs">
          <ul>
            <li id="shoes" class="menu-children">
              <a id="shoes-link" href="#">Shoes <i class="fa fa-angle-right"></i></a>
              <div class="menu-subs"><ul><li><a href="/boots">Boots</a></li></ul></div>
            </li>
          </ul>
        </div>
      </li>
    </ul>
  </nav>
  <button class="menu-trigger">Menu</button>
</div>
"##;

#[test]
fn legacy_menu_uses_the_arrow_as_back_button() -> Result<()> {
    let mut page = Page::from_html(LEGACY_MENU_HTML)?;
    assert_eq!(page.menu_count(), 1);

    page.click("#legacy .menu__trigger")?;
    page.click("#products-link")?;
    page.assert_text("#legacy .menu__title", "Products")?;

    page.click("#legacy .menu__arrow")?;
    assert_eq!(page.menu_phase(0)?, MenuPhase::OpenRoot);
    page.assert_text("#legacy .menu__title", "")?;
    page.advance_time(300)?;
    page.assert_class("#products > .menu__subs", "active", false)?;
    page.assert_style("#products > .menu__subs", "animation", "")?;
    Ok(())
}

#[test]
fn legacy_menu_ignores_blank_target_links() -> Result<()> {
    let mut page = Page::from_html(LEGACY_MENU_HTML)?;
    page.click("#legacy .menu__trigger")?;
    page.click("#products-link")?;
    page.click("#external")?;
    assert_eq!(page.menu_phase(0)?, MenuPhase::OpenLevel(1));
    assert!(page.is_focused("#external")?);
    Ok(())
}

#[test]
fn legacy_breakpoint_is_fixed_in_pixels() -> Result<()> {
    let mut page = Page::from_html(LEGACY_MENU_HTML)?;
    page.set_root_font_size(10.0)?;
    page.click("#legacy .menu__trigger")?;
    page.resize(900.0, 600.0)?;
    assert_eq!(page.menu_phase(0)?, MenuPhase::OpenRoot);
    page.resize(992.0, 600.0)?;
    assert_eq!(page.menu_phase(0)?, MenuPhase::Closed);
    Ok(())
}

#[test]
fn dashed_overlay_only_hides_the_menu() -> Result<()> {
    let mut page = Page::from_html(DASHED_MENU_HTML)?;
    page.click(".menu-trigger")?;
    page.click("#shop-link")?;
    page.click(".menu-overlay")?;

    assert_eq!(page.menu_phase(0)?, MenuPhase::Closed);
    assert!(page.pending_timers().is_empty());
    page.assert_text(".menu-title", "Shop")?;

    page.click(".menu-trigger")?;
    assert_eq!(page.menu_phase(0)?, MenuPhase::OpenLevel(1));
    page.assert_class("#shop > .menu-subs", "active", true)?;
    Ok(())
}

#[test]
fn dashed_close_leaves_the_inline_animation() -> Result<()> {
    let mut page = Page::from_html(DASHED_MENU_HTML)?;
    page.click(".menu-trigger")?;
    page.click("#shop-link")?;
    page.click("#shoes-link")?;
    page.assert_text(".menu-title", "Shoes")?;
    page.click(".menu-close")?;
    page.advance_time(300)?;

    page.assert_class(".menu-header", "active", false)?;
    page.assert_text(".menu-title", "")?;
    page.assert_class("#shop > .menu-subs", "active", false)?;
    page.assert_class("#shoes > .menu-subs", "active", false)?;
    page.assert_style(
        "#shoes > .menu-subs",
        "animation",
        "slideLeft 0.5s ease forwards",
    )?;
    Ok(())
}

#[test]
fn dashed_back_keeps_the_slide_out_animation() -> Result<()> {
    let mut page = Page::from_html(DASHED_MENU_HTML)?;
    page.click(".menu-trigger")?;
    page.click("#shop-link")?;
    page.click("#shoes-link")?;
    page.click(".menu-arrow")?;
    page.assert_text(".menu-title", "Shop")?;
    page.advance_time(300)?;
    page.assert_class("#shoes > .menu-subs", "active", false)?;
    page.assert_style(
        "#shoes > .menu-subs",
        "animation",
        "slideRight 0.5s ease forwards",
    )?;
    Ok(())
}

#[test]
fn every_convention_mounts_side_by_side() -> Result<()> {
    let bem = nav_widgets::Menu::new()
        .with_id("bem")
        .add_item(nav_widgets::Item::submenu("Docs", nav_widgets::Submenu::new()));
    let html = format!("{DASHED_MENU_HTML}{LEGACY_MENU_HTML}{}", bem.render());
    let mut page = Page::from_html(&html)?;
    assert_eq!(page.menu_count(), 3);

    page.click("#legacy .menu__trigger")?;
    page.click("#bem .menu__trigger")?;
    page.click("#bem .menu__children > a")?;
    page.resize(1200.0, 800.0)?;
    for index in 0..3 {
        assert_eq!(page.menu_phase(index)?, MenuPhase::Closed);
    }
    page.flush()?;
    page.assert_text("#bem .menu__title", "")?;
    Ok(())
}

#[test]
fn restricting_conventions_through_config() -> Result<()> {
    let config = WidgetConfig::from_toml_str(
        r#"
        [[menus]]
        preset = "bem_legacy"
        "#,
    )?;
    let html = format!("{DASHED_MENU_HTML}{LEGACY_MENU_HTML}");
    let page = Page::from_html_with_config(&html, config)?;
    assert_eq!(page.menu_count(), 1);
    assert!(matches!(page.menu_phase(1), Err(Error::SelectorNotFound(_))));
    Ok(())
}
