//! Answer feedback shown after the server graded a submission.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::animation;
use crate::config::CONFIG;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

impl FeedbackKind {
    /// The server marks right answers with `✔️` or "Bonne réponse".
    pub fn classify(text: &str) -> Self {
        if text.contains("✔️") || text.contains("Bonne") {
            FeedbackKind::Success
        } else {
            FeedbackKind::Error
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            FeedbackKind::Success => "success",
            FeedbackKind::Error => "error",
        }
    }
}

/// Styles the `.feedback` element, shakes wrong answers, and after the
/// auto-advance delay draws attention to the next-question link.
pub fn install(win: &Window, doc: &Document) -> Result<(), JsValue> {
    let el = match doc.query_selector(CONFIG.selectors.feedback)? {
        Some(e) => e.dyn_into::<HtmlElement>()?,
        None => return Ok(()),
    };
    let kind = FeedbackKind::classify(&el.text_content().unwrap_or_default());
    el.class_list().add_1(kind.class_name())?;
    if kind == FeedbackKind::Error {
        animation::shake(&el);
    }
    animation::fade_in(&el, CONFIG.animation.feedback_fade_ms);

    let doc_later = doc.clone();
    let cb = Closure::once_into_js(move || {
        let next = doc_later
            .query_selector(CONFIG.selectors.next_button)
            .ok()
            .flatten()
            .and_then(|n| n.dyn_into::<HtmlElement>().ok());
        if let Some(next) = next {
            next.style().set_property("opacity", "1").ok();
            animation::pulse(&next, CONFIG.animation.next_button_pulse_ms);
        }
    });
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        CONFIG.quiz.auto_advance_delay_ms,
    )?;
    Ok(())
}
