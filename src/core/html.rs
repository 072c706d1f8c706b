// src/core/html.rs
// Document-order helpers on top of `scraper`. The activity page puts labels
// and values in sibling subtrees, so "next <strong> after X" has to walk the
// whole tree in order rather than X's children.
use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;

pub fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel).next()
}

pub fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => doc.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// Text of the whole subtree, whitespace-collapsed.
pub fn full_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// The element's single string: its only child when that child is text, or
/// the single string of its only child element, recursively. Anything with
/// more or fewer children has none. `<span><b>Pace</b></span>` → "Pace",
/// `<span>Pace <i>?</i></span>` → None.
pub fn sole_string(el: ElementRef<'_>) -> Option<String> {
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    match only.value().as_text() {
        Some(t) => Some(s!(&**t)),
        None => sole_string(ElementRef::wrap(only)?),
    }
}

pub fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Every element in document (pre-)order.
pub fn elements_in_order(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect()
}

/// First `<name>` that opens after `anchor` opens. Includes anchor's own
/// descendants, like a forward scan through the markup would.
pub fn next_element_named<'a>(doc: &'a Html, anchor: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    let order = elements_in_order(doc);
    let pos = order.iter().position(|e| e.id() == anchor.id())?;
    order[pos + 1..]
        .iter()
        .find(|e| e.value().name().eq_ignore_ascii_case(name))
        .copied()
}

/// Last `<name>` that opens before `anchor` opens.
pub fn prev_element_named<'a>(doc: &'a Html, anchor: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    let order = elements_in_order(doc);
    let pos = order.iter().position(|e| e.id() == anchor.id())?;
    order[..pos]
        .iter()
        .rev()
        .find(|e| e.value().name().eq_ignore_ascii_case(name))
        .copied()
}
