use super::*;
use crate::core_impl::parse_html;

#[test]
fn query_selector_supports_descendant_child_and_attribute_steps() -> Result<()> {
    let dom = parse_html(
        r#"
        <div id="mdbook">
          <nav class="nav-wrapper">
            <a class="nav-chapters previous" href="/a"><i class="fa fa-angle-left"></i></a>
            <a class="nav-chapters next" href="/b" target="_blank"><i class="fa"></i></a>
          </nav>
        </div>
        <a class="nav-chapters" href="/outside"></a>
        "#,
    )?;

    assert_eq!(dom.query_selector_all("#mdbook a.nav-chapters")?.len(), 2);
    assert_eq!(dom.query_selector_all("a.nav-chapters")?.len(), 3);
    assert_eq!(dom.query_selector_all("nav > a[target=\"_blank\"]")?.len(), 1);
    assert_eq!(dom.query_selector_all("a:not(.next) i.fa")?.len(), 1);
    assert_eq!(dom.query_selector_all("i.fa-angle-left, a.next")?.len(), 2);
    Ok(())
}

#[test]
fn query_selector_from_stays_inside_the_subtree() -> Result<()> {
    let dom = parse_html(
        r#"<div id="a"><i id="in"></i></div><div id="b"><i id="out"></i></div>"#,
    )?;
    let a = dom.by_id("a").ok_or_else(|| Error::SelectorNotFound("#a".into()))?;
    let found = dom.query_selector_from(a, "i")?;
    assert_eq!(found, dom.by_id("in"));
    assert_eq!(dom.query_selector_from(a, "#out")?, None);
    Ok(())
}

#[test]
fn closest_walks_up_from_the_node_itself() -> Result<()> {
    let dom = parse_html(
        r#"<ul class="list"><li class="item"><a id="link"><span id="txt">x</span></a></li></ul>"#,
    )?;
    let span = dom.by_id("txt").ok_or_else(|| Error::SelectorNotFound("#txt".into()))?;
    let link = dom.by_id("link").ok_or_else(|| Error::SelectorNotFound("#link".into()))?;
    let item = dom.closest(span, ".item")?;
    assert_eq!(item.and_then(|node| dom.tag_name(node)), Some("li"));
    assert_eq!(dom.closest(link, "a")?, Some(link));
    assert_eq!(dom.closest(span, ".missing")?, None);
    Ok(())
}

#[test]
fn unsupported_selector_is_rejected() -> Result<()> {
    let dom = parse_html("<p></p>")?;
    for selector in [
        "p >",
        "",
        "p, ",
        "p + p",
        "p ~ p",
        "a[href^=\"/x\"]",
        "li:first-child",
        "p:not(.a",
    ] {
        assert!(
            matches!(
                dom.query_selector(selector),
                Err(Error::UnsupportedSelector(_))
            ),
            "{selector:?} should be rejected"
        );
    }
    Ok(())
}

#[test]
fn child_combinator_is_checked_against_every_ancestor() -> Result<()> {
    let dom = parse_html(r#"<div><ul><li><ul><li><span id="deep"></span></ul></ul></div>"#)?;
    let deep = dom.by_id("deep").into_iter().collect::<Vec<_>>();
    // The nearest `ul` sits in an `li`, the outer one in the div.
    assert_eq!(dom.query_selector_all("div > ul span")?, deep);
    assert!(dom.query_selector_all("main > ul span")?.is_empty());
    Ok(())
}

#[test]
fn attribute_values_may_be_bare_or_quoted() -> Result<()> {
    let dom = parse_html(
        r#"<a id="x" target=_blank data-note="a, b"></a><a id="y" target></a>"#,
    )?;
    assert_eq!(dom.query_selector_all("a[target=_blank]")?.len(), 1);
    assert_eq!(dom.query_selector_all("a[ target = '_blank' ]")?.len(), 1);
    let x = dom.by_id("x").into_iter().collect::<Vec<_>>();
    let y = dom.by_id("y").into_iter().collect::<Vec<_>>();
    assert_eq!(dom.query_selector_all("a[data-note=\"a, b\"]")?, x);
    assert_eq!(dom.query_selector_all("[target]")?.len(), 2);
    assert_eq!(dom.query_selector_all("*:not([target=_blank])")?, y);
    Ok(())
}

#[test]
fn class_list_operations_keep_other_tokens() -> Result<()> {
    let mut dom = parse_html(r#"<nav id="n" class="menu__nav wide"></nav>"#)?;
    let nav = dom.by_id("n").ok_or_else(|| Error::SelectorNotFound("#n".into()))?;

    assert!(dom.class_toggle(nav, "active")?);
    assert_eq!(dom.attr(nav, "class").as_deref(), Some("menu__nav wide active"));
    assert!(!dom.class_toggle(nav, "active")?);
    dom.class_add(nav, "active")?;
    dom.class_add(nav, "active")?;
    dom.class_remove(nav, "wide")?;
    assert_eq!(dom.attr(nav, "class").as_deref(), Some("menu__nav active"));
    Ok(())
}

#[test]
fn inline_style_set_and_remove_round_trip_through_the_attribute() -> Result<()> {
    let mut dom = parse_html(r#"<i id="icon" style="color: red"></i>"#)?;
    let icon = dom.by_id("icon").ok_or_else(|| Error::SelectorNotFound("#icon".into()))?;

    dom.style_set(icon, "animation", "slideLeft 0.5s ease forwards")?;
    assert_eq!(
        dom.attr(icon, "style").as_deref(),
        Some("color: red; animation: slideLeft 0.5s ease forwards;")
    );
    assert_eq!(dom.style_get(icon, "ANIMATION")?, "slideLeft 0.5s ease forwards");

    dom.style_remove(icon, "animation")?;
    dom.style_remove(icon, "color")?;
    assert_eq!(dom.attr(icon, "style").as_deref(), Some(""));
    assert_eq!(dom.style_get(icon, "color")?, "");
    Ok(())
}

#[test]
fn first_child_text_reads_only_the_leading_node() -> Result<()> {
    let dom = parse_html(r#"<a id="a"> Docs <i>icon</i> tail</a>"#)?;
    let a = dom.by_id("a").ok_or_else(|| Error::SelectorNotFound("#a".into()))?;
    assert_eq!(dom.first_child_text(a).as_deref(), Some(" Docs "));
    assert_eq!(dom.text_content(a), " Docs icon tail");
    Ok(())
}

#[test]
fn set_text_content_replaces_children_and_escapes_on_dump() -> Result<()> {
    let mut dom = parse_html(r#"<div id="t"><b>old</b></div>"#)?;
    let title = dom.by_id("t").ok_or_else(|| Error::SelectorNotFound("#t".into()))?;
    dom.set_text_content(title, "R&D <beta>")?;
    assert_eq!(dom.dump_node(title), "<div id=\"t\">R&amp;D &lt;beta&gt;</div>");
    dom.set_text_content(title, "")?;
    assert_eq!(dom.children(title).len(), 0);
    Ok(())
}

#[test]
fn parser_decodes_entities_and_closes_optional_list_items() -> Result<()> {
    let dom = parse_html("<ul><li id=\"one\">A &amp; B<li id=\"two\">C</ul>")?;
    let one = dom.by_id("one").ok_or_else(|| Error::SelectorNotFound("#one".into()))?;
    let two = dom.by_id("two").ok_or_else(|| Error::SelectorNotFound("#two".into()))?;
    assert_eq!(dom.text_content(one), "A & B");
    assert_eq!(dom.parent(one), dom.parent(two));
    Ok(())
}

#[test]
fn parser_reports_unclosed_comment() {
    assert!(matches!(
        parse_html("<div><!-- open"),
        Err(Error::HtmlParse(_))
    ));
}

#[test]
fn parser_skips_declarations_and_keeps_raw_text_verbatim() -> Result<()> {
    let dom = parse_html(
        "<!DOCTYPE html><div id=\"d\"><script id=\"s\">if (a < b) { x = '</div>'; }</script><br/><img src=x></div>",
    )?;
    let script = dom.by_id("s").ok_or_else(|| Error::SelectorNotFound("#s".into()))?;
    let div = dom.by_id("d").ok_or_else(|| Error::SelectorNotFound("#d".into()))?;
    assert_eq!(dom.text_content(script), "if (a < b) { x = '</div>'; }");
    assert_eq!(dom.children(div).len(), 3);
    assert_eq!(dom.attr(div, "ID").as_deref(), Some("d"));
    Ok(())
}
