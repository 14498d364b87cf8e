//! Page-level accessibility touches: skip link, keyboard focus styling,
//! ARIA attributes, reduced motion.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::animation;
use crate::config::{self, CONFIG};

const TRANSITION_VARS: [&str; 3] = ["--transition-fast", "--transition-normal", "--transition-slow"];

/// Width ratio of the bar to its parent, in whole percent.
pub fn bar_percent(bar_width: i32, parent_width: i32) -> i32 {
    if parent_width <= 0 {
        return 0;
    }
    (f64::from(bar_width) / f64::from(parent_width) * 100.0).round() as i32
}

fn add_skip_link(doc: &Document) -> Result<(), JsValue> {
    let body = match doc.body() {
        Some(b) => b,
        None => return Ok(()),
    };
    let link = doc.create_element("a")?;
    link.set_attribute("href", "#main-content")?;
    link.set_class_name("skip-link");
    link.set_text_content(Some("Aller au contenu principal"));
    body.insert_before(&link, body.first_child().as_ref())?;
    Ok(())
}

fn track_keyboard_navigation(doc: &Document) -> Result<(), JsValue> {
    let body = match doc.body() {
        Some(b) => b,
        None => return Ok(()),
    };
    let on_key = body.clone();
    let keydown = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        if evt.key() == "Tab" {
            on_key.class_list().add_1("keyboard-navigation").ok();
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();

    let mousedown = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        body.class_list().remove_1("keyboard-navigation").ok();
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
    mousedown.forget();
    Ok(())
}

fn add_aria_labels(doc: &Document) -> Result<(), JsValue> {
    if let Some(bar) = doc.query_selector(CONFIG.selectors.progress_bar)? {
        let bar: HtmlElement = bar.dyn_into()?;
        let parent_width = bar
            .parent_element()
            .and_then(|p| p.dyn_into::<HtmlElement>().ok())
            .map(|p| p.offset_width())
            .unwrap_or(0);
        let percent = bar_percent(bar.offset_width(), parent_width);
        bar.set_attribute("role", "progressbar")?;
        bar.set_attribute("aria-valuenow", &percent.to_string())?;
        bar.set_attribute("aria-label", &format!("Progression: {percent}%"))?;
    }
    let options = doc.query_selector_all(&config::answer_selector())?;
    for i in 0..options.length() {
        if let Some(node) = options.item(i) {
            let el: web_sys::Element = node.dyn_into()?;
            el.set_attribute("aria-describedby", &format!("option-{}", i + 1))?;
        }
    }
    Ok(())
}

fn handle_reduced_motion(win: &Window, doc: &Document) -> Result<(), JsValue> {
    let reduced = win
        .match_media("(prefers-reduced-motion: reduce)")?
        .map(|mq| mq.matches())
        .unwrap_or(false);
    animation::set_reduced_motion(reduced);
    if !reduced {
        return Ok(());
    }
    if let Some(root) = doc.document_element().and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
        for var in TRANSITION_VARS {
            root.style().set_property(var, "0s")?;
        }
    }
    Ok(())
}

pub fn install(win: &Window, doc: &Document) -> Result<(), JsValue> {
    add_skip_link(doc)?;
    track_keyboard_navigation(doc)?;
    add_aria_labels(doc)?;
    handle_reduced_motion(win, doc)?;
    Ok(())
}
