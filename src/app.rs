//! Page bootstrap: wires every enhancement once the DOM is ready and tears
//! the quiz controller down when the page goes away.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlButtonElement, HtmlElement, Window, window};

use crate::accessibility;
use crate::config::CONFIG;
use crate::diag;
use crate::notification::{self, NotificationKind};
use crate::progress;
use crate::quiz::{QuizController, feedback};
use crate::storage::Storage;
use crate::theme;

thread_local! {
    static STORAGE: Rc<Storage> = Rc::new(Storage::browser());
    static QUIZ: RefCell<Option<QuizController>> = const { RefCell::new(None) };
}

/// Shared page storage, so the in-memory fallback survives between calls.
pub fn storage() -> Rc<Storage> {
    STORAGE.with(Rc::clone)
}

pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    install_error_handlers(&win)?;

    if doc.ready_state() == "loading" {
        let (w, d) = (win.clone(), doc.clone());
        let cb = Closure::once_into_js(move || initialize(&w, &d));
        doc.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref())?;
    } else {
        initialize(&win, &doc);
    }
    Ok(())
}

/// Logs a failed feature and carries on with the rest.
fn run(feature: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        diag::error(&format!("{feature}: {e:?}"));
    }
}

fn initialize(win: &Window, doc: &Document) {
    diag::info("🌍 Escape Game SVT - Initializing...");
    let storage = storage();

    run("theme", theme::install(doc, storage.clone()));
    run("accessibility", accessibility::install(win, doc));
    run(
        "quiz",
        QuizController::attach(win, doc).map(|quiz| QUIZ.with(|q| *q.borrow_mut() = quiz)),
    );
    run("progress", progress::install(doc, &storage));
    run("feedback", feedback::install(win, doc));
    run("loading states", add_loading_states(doc));
    run("teardown", install_teardown(win));

    diag::info("✅ Escape Game SVT - Ready!");
}

fn install_teardown(win: &Window) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        // Dropping the controller clears its interval and listeners.
        let controller = QUIZ.with(|q| q.borrow_mut().take());
        drop(controller);
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Whether clicking `el` leaves the page (submit button or link).
fn navigates(el: &HtmlElement) -> bool {
    match el.dyn_ref::<HtmlButtonElement>() {
        Some(btn) => btn.type_() == "submit",
        None => el.has_attribute("href"),
    }
}

fn add_loading_states(doc: &Document) -> Result<(), JsValue> {
    let nodes = doc.query_selector_all(CONFIG.selectors.loading_targets)?;
    for i in 0..nodes.length() {
        let el = match nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            Some(e) => e,
            None => continue,
        };
        let target = el.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            if !navigates(&target) {
                return;
            }
            let style = target.style();
            style.set_property("opacity", "0.7").ok();
            style.set_property("pointer-events", "none").ok();
            if let Some(doc) = target.owner_document() {
                if let Ok(spinner) = doc.create_element("span") {
                    spinner.set_class_name("spinner");
                    spinner.set_text_content(Some("⏳"));
                    target.append_child(&spinner).ok();
                }
            }
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn install_error_handlers(win: &Window) -> Result<(), JsValue> {
    let on_error = Closure::wrap(Box::new(move |evt: web_sys::ErrorEvent| {
        diag::error(&format!("JavaScript error: {}", evt.message()));
        notification::show(CONFIG.notification.generic_error, NotificationKind::Error);
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())?;
    on_error.forget();

    let on_rejection = Closure::wrap(Box::new(move |evt: web_sys::PromiseRejectionEvent| {
        diag::error(&format!("Unhandled promise rejection: {:?}", evt.reason()));
        notification::show(CONFIG.notification.generic_error, NotificationKind::Error);
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback("unhandledrejection", on_rejection.as_ref().unchecked_ref())?;
    on_rejection.forget();
    Ok(())
}
