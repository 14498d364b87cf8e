//! Quiz controller: countdown, answer selection, single-submit guard and
//! keyboard shortcuts for the question page.
//!
//! `QuizState` holds all decisions and is plain data, so it is tested
//! natively. `QuizController` owns the DOM side: it is built once per page
//! from the elements probed at construction, and dropping it clears the
//! interval and removes every listener it added.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, EventTarget, HtmlButtonElement, HtmlElement, HtmlFormElement,
    HtmlInputElement, KeyboardEvent, Window,
};

use crate::animation;
use crate::config::{self, CONFIG};
use crate::diag;
use crate::notification::{self, NotificationKind};

pub mod feedback;
pub mod guard;
pub mod keyboard;
pub mod selection;
pub mod timer;

pub use guard::{SubmissionGuard, SubmitSource};
pub use keyboard::Shortcut;
pub use selection::{AnswerSelection, SelectionChange};
pub use timer::{Countdown, Tick, TimeWarning, format_time};

// --- State --------------------------------------------------------------------

/// What the controller must render after a timer tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Display { text: String, warning: TimeWarning },
    /// Time ran out. `auto_submit` is true only if no submission happened yet.
    TimeUp { auto_submit: bool },
    Idle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizState {
    countdown: Option<Countdown>,
    selection: AnswerSelection,
    guard: SubmissionGuard,
}

impl QuizState {
    pub fn new(option_count: usize, countdown: Option<Countdown>) -> Self {
        Self {
            countdown,
            selection: AnswerSelection::new(option_count),
            guard: SubmissionGuard::new(),
        }
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn submit_enabled(&self) -> bool {
        !self.guard.is_submitted() && self.selection.submit_enabled()
    }

    pub fn is_answered(&self) -> bool {
        self.guard.is_submitted()
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    /// Selection is frozen once the answer went out.
    pub fn select(&mut self, index: usize) -> Option<SelectionChange> {
        if self.guard.is_submitted() {
            return None;
        }
        self.selection.select(index)
    }

    /// Takes the guard. The first caller gets `true` and the countdown stops.
    pub fn submit(&mut self, source: SubmitSource) -> bool {
        let proceed = self.guard.try_submit(source);
        if proceed {
            self.stop_timer();
        }
        proceed
    }

    pub fn tick(&mut self) -> TimerEvent {
        let tick = match self.countdown.as_mut() {
            Some(c) => c.tick(),
            None => Tick::Idle,
        };
        match tick {
            Tick::Running { remaining, warning } => TimerEvent::Display {
                text: format_time(remaining),
                warning,
            },
            Tick::Expired => TimerEvent::TimeUp {
                auto_submit: self.guard.try_submit(SubmitSource::Timer),
            },
            Tick::Idle => TimerEvent::Idle,
        }
    }

    /// A zero-second countdown expires without ticking.
    pub fn start(&mut self) -> TimerEvent {
        match &self.countdown {
            Some(c) if c.is_expired() => TimerEvent::TimeUp {
                auto_submit: self.guard.try_submit(SubmitSource::Timer),
            },
            _ => TimerEvent::Idle,
        }
    }

    /// Idempotent.
    pub fn stop_timer(&mut self) -> bool {
        self.countdown.as_mut().is_some_and(Countdown::stop)
    }
}

// --- DOM capabilities -----------------------------------------------------------

/// Elements the controller works on, probed once. A POST form with at least
/// one answer input is required; the rest degrade to no-ops when absent.
pub struct QuizElements {
    pub form: HtmlFormElement,
    pub options: Vec<HtmlInputElement>,
    pub submit_button: Option<HtmlButtonElement>,
    pub time_display: Option<HtmlElement>,
    pub title: Option<HtmlElement>,
}

impl QuizElements {
    pub fn probe(doc: &Document) -> Result<Option<Self>, JsValue> {
        let form = match doc.query_selector(CONFIG.selectors.quiz_form)? {
            Some(f) => f.dyn_into::<HtmlFormElement>()?,
            None => return Ok(None),
        };
        let nodes = form.query_selector_all(&config::answer_selector())?;
        let mut options = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            if let Some(n) = nodes.item(i) {
                options.push(n.dyn_into::<HtmlInputElement>()?);
            }
        }
        // Login, registration and access-code forms carry no answer field.
        if options.is_empty() {
            return Ok(None);
        }
        let submit_button = match doc.query_selector(CONFIG.selectors.submit_button)? {
            Some(b) => b.dyn_into::<HtmlButtonElement>().ok(),
            None => None,
        };
        let time_display = doc
            .query_selector(CONFIG.selectors.time_remaining)?
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        let title = doc
            .query_selector(CONFIG.selectors.title)?
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        Ok(Some(Self {
            form,
            options,
            submit_button,
            time_display,
            title,
        }))
    }

    fn label_of(&self, index: usize) -> Option<HtmlElement> {
        self.options
            .get(index)?
            .closest("label")
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()
    }
}

// --- Controller ---------------------------------------------------------------

/// Event listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(target: &EventTarget, kind: &'static str, callback: Closure<dyn FnMut(Event)>) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

struct Inner {
    win: Window,
    state: RefCell<QuizState>,
    elements: QuizElements,
    interval: Cell<Option<i32>>,
}

impl Inner {
    fn clear_interval(&self) {
        if let Some(id) = self.interval.take() {
            self.win.clear_interval_with_handle(id);
        }
    }

    fn on_option_changed(&self, index: usize) {
        let change = match self.state.borrow_mut().select(index) {
            Some(c) => c,
            None => return,
        };
        for i in 0..self.elements.options.len() {
            if let Some(label) = self.elements.label_of(i) {
                label.class_list().remove_1("selected").ok();
            }
        }
        if let Some(label) = self.elements.label_of(change.current) {
            label.class_list().add_1("selected").ok();
        }
        if let Some(btn) = &self.elements.submit_button {
            btn.set_disabled(false);
            if change.previous != Some(change.current) {
                btn.class_list().add_1("pulse").ok();
                animation::pulse(btn, CONFIG.animation.pulse_duration_ms);
            }
        }
    }

    /// Side effects of the one submission that went through.
    fn lock_page(&self) {
        self.clear_interval();
        if let Some(btn) = &self.elements.submit_button {
            btn.set_inner_html(CONFIG.quiz.submitting_label);
        }
        // Disabled controls (the submitter included) are left out of the
        // form data set, so wait until the submission has captured it.
        let options = self.elements.options.clone();
        let button = self.elements.submit_button.clone();
        let cb = Closure::once_into_js(move || {
            for input in &options {
                input.set_disabled(true);
            }
            if let Some(btn) = button {
                btn.set_disabled(true);
            }
        });
        if let Err(e) = self
            .win
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 0)
        {
            diag::warn(&format!("quiz: cannot schedule input lock: {e:?}"));
        }
    }

    /// Submission initiated by script (Enter, timer): native `submit()` does
    /// not fire a submit event, so the guard is taken here.
    fn submit_programmatically(&self, source: SubmitSource) {
        if !self.state.borrow_mut().submit(source) {
            return;
        }
        self.send();
    }

    fn send(&self) {
        self.lock_page();
        if let Err(e) = self.elements.form.submit() {
            diag::error(&format!("quiz: form submission failed: {e:?}"));
        }
    }

    fn on_submit_event(&self, evt: &Event) {
        if self.state.borrow_mut().submit(SubmitSource::Click) {
            self.lock_page();
        } else {
            evt.prevent_default();
        }
    }

    fn render(&self, event: TimerEvent) {
        match event {
            TimerEvent::Display { text, warning } => {
                if let Some(el) = &self.elements.time_display {
                    el.set_text_content(Some(&text));
                    let style = el.style();
                    match warning {
                        TimeWarning::Critical => {
                            style.set_property("color", CONFIG.quiz.critical_color).ok();
                            style.set_property("animation", CONFIG.quiz.critical_animation).ok();
                        }
                        TimeWarning::Low => {
                            style.set_property("color", CONFIG.quiz.warning_color).ok();
                        }
                        TimeWarning::None => {}
                    }
                }
            }
            TimerEvent::TimeUp { auto_submit } => {
                self.clear_interval();
                notification::show(CONFIG.quiz.time_up_message, NotificationKind::Error);
                if auto_submit {
                    self.send();
                }
            }
            TimerEvent::Idle => {}
        }
    }

    fn on_tick(&self) {
        let event = self.state.borrow_mut().tick();
        self.render(event);
    }

    fn on_key(&self, evt: &KeyboardEvent) {
        if evt.ctrl_key() || evt.meta_key() || evt.alt_key() {
            return;
        }
        match Shortcut::from_key(&evt.key()) {
            Some(Shortcut::SelectOption(index)) => {
                if self.state.borrow().is_answered() {
                    return;
                }
                // Same path as a pointer click: check it and fire `change`.
                if let Some(input) = self.elements.options.get(index) {
                    input.set_checked(true);
                    if let Ok(change) = Event::new("change") {
                        input.dispatch_event(&change).ok();
                    }
                }
            }
            Some(Shortcut::Submit) => self.submit_programmatically(SubmitSource::EnterKey),
            Some(Shortcut::Abandon) => {
                let confirmed = self
                    .win
                    .confirm_with_message(CONFIG.quiz.abandon_prompt)
                    .unwrap_or(false);
                if confirmed {
                    self.clear_interval();
                    if let Err(e) = self.win.location().set_href(CONFIG.quiz.abandon_url) {
                        diag::error(&format!("quiz: navigation failed: {e:?}"));
                    }
                }
            }
            None => {}
        }
    }

    /// Entrance animations for the title and the answer labels.
    fn enhance(&self) {
        if let Some(title) = &self.elements.title {
            animation::slide_in_left(title, CONFIG.animation.title_slide_ms);
        }
        for i in 0..self.elements.options.len() {
            if let Some(label) = self.elements.label_of(i) {
                label.class_list().add_1("option").ok();
                let delay = CONFIG.animation.option_stagger_ms * i as u32;
                label
                    .style()
                    .set_property("animation-delay", &format!("{delay}ms"))
                    .ok();
                animation::fade_in(&label, CONFIG.animation.option_fade_ms);
            }
        }
    }
}

/// One per page load. Dropping it is the teardown.
pub struct QuizController {
    inner: Rc<Inner>,
    listeners: Vec<Listener>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl QuizController {
    /// Probes the page; `Ok(None)` when there is no quiz form.
    pub fn attach(win: &Window, doc: &Document) -> Result<Option<Self>, JsValue> {
        let elements = match QuizElements::probe(doc)? {
            Some(e) => e,
            None => return Ok(None),
        };
        let countdown = elements
            .time_display
            .as_ref()
            .and_then(|el| el.text_content())
            .and_then(|t| Countdown::from_display(&t));
        let mut state = QuizState::new(elements.options.len(), countdown);
        if let Some(pre) = elements.options.iter().position(|o| o.checked()) {
            state.select(pre);
        }
        if let Some(btn) = &elements.submit_button {
            btn.set_disabled(!state.submit_enabled());
        }

        let inner = Rc::new(Inner {
            win: win.clone(),
            state: RefCell::new(state),
            elements,
            interval: Cell::new(None),
        });
        let mut controller = Self {
            inner,
            listeners: Vec::new(),
            tick: None,
        };
        controller.listen()?;
        controller.inner.enhance();
        controller.start_timer()?;
        diag::info(&format!(
            "quiz: {} options, timer {}",
            controller.inner.elements.options.len(),
            if controller.inner.state.borrow().countdown().is_some() { "on" } else { "off" }
        ));
        Ok(Some(controller))
    }

    fn listen(&mut self) -> Result<(), JsValue> {
        for (index, input) in self.inner.elements.options.iter().enumerate() {
            let inner = self.inner.clone();
            let cb = Closure::wrap(Box::new(move |_evt: Event| {
                inner.on_option_changed(index);
            }) as Box<dyn FnMut(Event)>);
            self.listeners.push(Listener::add(input, "change", cb)?);
        }

        let inner = self.inner.clone();
        let cb = Closure::wrap(Box::new(move |evt: Event| {
            inner.on_submit_event(&evt);
        }) as Box<dyn FnMut(Event)>);
        self.listeners
            .push(Listener::add(&self.inner.elements.form, "submit", cb)?);

        let inner = self.inner.clone();
        let cb = Closure::wrap(Box::new(move |evt: Event| {
            if let Some(key) = evt.dyn_ref::<KeyboardEvent>() {
                inner.on_key(key);
            }
        }) as Box<dyn FnMut(Event)>);
        let doc = self
            .inner
            .win
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        self.listeners.push(Listener::add(&doc, "keydown", cb)?);
        Ok(())
    }

    fn start_timer(&mut self) -> Result<(), JsValue> {
        let immediate = self.inner.state.borrow_mut().start();
        if immediate != TimerEvent::Idle {
            self.inner.render(immediate);
            return Ok(());
        }
        let running = self
            .inner
            .state
            .borrow()
            .countdown()
            .is_some_and(Countdown::is_running);
        if !running {
            return Ok(());
        }
        let inner = self.inner.clone();
        let cb = Closure::wrap(Box::new(move || inner.on_tick()) as Box<dyn FnMut()>);
        let id = self
            .inner
            .win
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                CONFIG.quiz.tick_ms,
            )?;
        self.inner.interval.set(Some(id));
        self.tick = Some(cb);
        Ok(())
    }

    /// Stops the countdown; safe to call any number of times.
    pub fn stop_timer(&self) {
        self.inner.state.borrow_mut().stop_timer();
        self.inner.clear_interval();
    }

    pub fn state(&self) -> QuizState {
        self.inner.state.borrow().clone()
    }
}

impl Drop for QuizController {
    fn drop(&mut self) {
        self.stop_timer();
        self.listeners.clear();
        self.tick.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(options: usize, seconds: u32) -> QuizState {
        QuizState::new(options, Some(Countdown::new(seconds)))
    }

    #[test]
    fn time_up_fires_after_exactly_initial_ticks() {
        let mut state = timed(3, 5);
        for expected in (1..5).rev() {
            assert!(matches!(state.tick(), TimerEvent::Display { .. }));
            assert_eq!(state.countdown().map(Countdown::remaining), Some(expected));
        }
        assert_eq!(state.tick(), TimerEvent::TimeUp { auto_submit: true });
        assert_eq!(state.tick(), TimerEvent::Idle);
        assert!(state.is_answered());
    }

    #[test]
    fn display_carries_format_and_warning() {
        let mut state = timed(2, 12);
        assert_eq!(
            state.tick(),
            TimerEvent::Display { text: "0:11".into(), warning: TimeWarning::Low }
        );
        assert_eq!(
            state.tick(),
            TimerEvent::Display { text: "0:10".into(), warning: TimeWarning::Critical }
        );
    }

    #[test]
    fn timer_does_not_resubmit_after_user_submit() {
        let mut state = timed(3, 2);
        state.select(0);
        assert!(state.submit(SubmitSource::Click));
        // Submission stopped the countdown.
        assert_eq!(state.tick(), TimerEvent::Idle);
        assert_eq!(state.guard().submitted_by(), Some(SubmitSource::Click));
    }

    #[test]
    fn user_submit_after_time_up_is_refused() {
        let mut state = timed(3, 1);
        assert_eq!(state.tick(), TimerEvent::TimeUp { auto_submit: true });
        assert!(!state.submit(SubmitSource::EnterKey));
        assert!(!state.submit(SubmitSource::Click));
        assert_eq!(state.guard().rejected(), 2);
    }

    #[test]
    fn zero_second_timer_expires_on_start() {
        let mut state = timed(3, 0);
        assert_eq!(state.start(), TimerEvent::TimeUp { auto_submit: true });
        assert_eq!(state.start(), TimerEvent::TimeUp { auto_submit: false });
        assert_eq!(state.tick(), TimerEvent::Idle);
    }

    #[test]
    fn untimed_page_never_ticks() {
        let mut state = QuizState::new(3, None);
        assert_eq!(state.start(), TimerEvent::Idle);
        assert_eq!(state.tick(), TimerEvent::Idle);
        assert!(!state.stop_timer());
    }

    #[test]
    fn shortcut_matches_click() {
        let mut clicked = QuizState::new(4, None);
        clicked.select(2);
        let mut keyed = QuizState::new(4, None);
        if let Some(Shortcut::SelectOption(i)) = Shortcut::from_key("3") {
            keyed.select(i);
        }
        assert_eq!(keyed, clicked);
        assert_eq!(keyed.selected(), Some(2));
    }

    #[test]
    fn selection_frozen_after_submit() {
        let mut state = QuizState::new(3, None);
        state.select(1);
        assert!(state.submit_enabled());
        state.submit(SubmitSource::Click);
        assert_eq!(state.select(0), None);
        assert_eq!(state.selected(), Some(1));
        assert!(!state.submit_enabled());
    }

    #[test]
    fn stop_timer_twice_is_safe() {
        let mut state = timed(3, 30);
        assert!(state.stop_timer());
        assert!(!state.stop_timer());
        assert_eq!(state.countdown().map(Countdown::remaining), Some(30));
    }
}
