//! Transient notification overlays.
//!
//! A notification is a `div.notification.notification-<kind>` appended to
//! `<body>`, removed after its duration or when its close button is clicked.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, window};

use crate::config::CONFIG;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn class_suffix(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
            NotificationKind::Warning => "⚠️",
            NotificationKind::Info => "ℹ️",
        }
    }
}

/// Escapes text for interpolation into element markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn markup(message: &str, kind: NotificationKind) -> String {
    format!(
        "<div class=\"notification-content\">\
         <span class=\"notification-icon\">{}</span>\
         <span class=\"notification-message\">{}</span>\
         <button class=\"notification-close\">&times;</button>\
         </div>",
        kind.icon(),
        escape_html(message)
    )
}

/// Removes `el` after `delay_ms`.
pub fn remove_later(el: &Element, delay_ms: i32) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let target = el.clone();
    let cb = Closure::once_into_js(move || target.remove());
    win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms)?;
    Ok(())
}

/// Removes `el` when its first `selector` descendant is clicked.
pub fn close_on_click(el: &Element, selector: &str) -> Result<(), JsValue> {
    if let Some(button) = el.query_selector(selector)? {
        let target = el.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            target.remove();
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        // Freed with the page; the element itself is short-lived.
        closure.forget();
    }
    Ok(())
}

fn build(doc: &Document, message: &str, kind: NotificationKind) -> Result<Element, JsValue> {
    let el = doc.create_element("div")?;
    el.set_class_name(&format!("notification notification-{}", kind.class_suffix()));
    el.set_inner_html(&markup(message, kind));
    Ok(el)
}

pub fn show_for(message: &str, kind: NotificationKind, duration_ms: i32) -> Result<(), JsValue> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let el = build(&doc, message, kind)?;
    body.append_child(&el)?;
    remove_later(&el, duration_ms)?;
    close_on_click(&el, ".notification-close")?;
    Ok(())
}

/// Shows `message` for the default duration. Failures are only logged:
/// a notification must never take the page down with it.
pub fn show(message: &str, kind: NotificationKind) {
    if let Err(e) = show_for(message, kind, CONFIG.notification.duration_ms) {
        crate::diag::warn(&format!("notification not shown: {e:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_per_kind() {
        assert_eq!(NotificationKind::Success.icon(), "✅");
        assert_eq!(NotificationKind::Error.class_suffix(), "error");
    }

    #[test]
    fn markup_escapes_message() {
        let html = markup("<b>5 > 3</b>", NotificationKind::Info);
        assert!(html.contains("&lt;b&gt;5 &gt; 3&lt;/b&gt;"));
        assert!(html.contains("ℹ️"));
        assert!(html.contains("notification-close"));
    }
}
