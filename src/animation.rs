//! Frame-driven visual transitions.
//!
//! The math is pure: an animation maps normalized progress `t` in `[0, 1]`
//! to a `FrameStyle`. `animate` drives it from `requestAnimationFrame`,
//! sampling the host frame clock once per rendered frame.

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, window};

use crate::config::CONFIG;

// --- Easing -------------------------------------------------------------------

/// Normalized progress for `elapsed` ms of a `duration` ms animation.
pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Horizontal shake offset in px: five damped oscillations, 10px peak.
pub fn shake_offset(t: f64) -> f64 {
    (t * PI * 10.0).sin() * (1.0 - t) * 10.0
}

/// Scale factor for a pulse: two full swells of ±10%.
pub fn pulse_scale(t: f64) -> f64 {
    1.0 + (t * PI * 4.0).sin() * 0.1
}

// --- Animations ---------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Animation {
    FadeIn,
    /// Fades from the element's current opacity, hides it at the end.
    FadeOut { from_opacity: f64 },
    /// Slides in from the left edge with cubic ease-out.
    SlideInLeft,
    Shake,
    Pulse,
}

/// Inline style values to write for one frame. `None` leaves a property alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStyle {
    pub opacity: Option<f64>,
    pub transform: Option<String>,
    pub display: Option<&'static str>,
}

fn compose(base: &str, extra: &str) -> String {
    let base = base.trim();
    if base.is_empty() {
        extra.to_string()
    } else {
        format!("{base} {extra}")
    }
}

impl Animation {
    /// Style applied synchronously, before the first frame.
    pub fn initial(&self) -> FrameStyle {
        match self {
            Animation::FadeIn => FrameStyle {
                opacity: Some(0.0),
                display: Some("block"),
                ..FrameStyle::default()
            },
            Animation::SlideInLeft => FrameStyle {
                opacity: Some(0.0),
                transform: Some("translateX(-100%)".to_string()),
                display: Some("block"),
            },
            Animation::FadeOut { .. } | Animation::Shake | Animation::Pulse => FrameStyle::default(),
        }
    }

    /// Style at progress `t`; `base_transform` is the element's transform
    /// before the animation started.
    pub fn frame(&self, t: f64, base_transform: &str) -> FrameStyle {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Animation::FadeIn => FrameStyle {
                opacity: Some(t),
                ..FrameStyle::default()
            },
            Animation::FadeOut { from_opacity } => FrameStyle {
                opacity: Some(from_opacity * (1.0 - t)),
                display: if t >= 1.0 { Some("none") } else { None },
                ..FrameStyle::default()
            },
            Animation::SlideInLeft => {
                let eased = ease_out_cubic(t);
                let remaining = 100.0 * (1.0 - eased);
                FrameStyle {
                    opacity: Some(eased),
                    transform: Some(format!("translateX(-{remaining}%)")),
                    display: None,
                }
            }
            Animation::Shake => {
                let transform = if t < 1.0 {
                    compose(base_transform, &format!("translateX({}px)", shake_offset(t)))
                } else {
                    base_transform.to_string()
                };
                FrameStyle {
                    transform: Some(transform),
                    ..FrameStyle::default()
                }
            }
            Animation::Pulse => FrameStyle {
                transform: Some(compose(base_transform, &format!("scale({})", pulse_scale(t)))),
                ..FrameStyle::default()
            },
        }
    }
}

// --- DOM driver ---------------------------------------------------------------

thread_local! {
    static REDUCED_MOTION: Cell<bool> = const { Cell::new(false) };
}

/// When set, animations jump straight to their final frame.
pub fn set_reduced_motion(reduced: bool) {
    REDUCED_MOTION.with(|r| r.set(reduced));
}

pub fn reduced_motion() -> bool {
    REDUCED_MOTION.with(|r| r.get())
}

fn apply(el: &HtmlElement, style: &FrameStyle) {
    let css = el.style();
    if let Some(o) = style.opacity {
        css.set_property("opacity", &o.to_string()).ok();
    }
    if let Some(t) = &style.transform {
        css.set_property("transform", t).ok();
    }
    if let Some(d) = style.display {
        css.set_property("display", d).ok();
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Runs `anim` on `el` for `duration_ms`, one style update per frame.
pub fn animate(el: &HtmlElement, anim: Animation, duration_ms: f64) {
    let base = el.style().get_property_value("transform").unwrap_or_default();
    apply(el, &anim.initial());

    let win = match window() {
        Some(w) => w,
        None => return,
    };
    if reduced_motion() {
        apply(el, &anim.frame(1.0, &base));
        return;
    }
    let start = win.performance().map(|p| p.now()).unwrap_or(0.0);

    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    let el = el.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let t = progress(ts - start, duration_ms);
        apply(&el, &anim.frame(t, &base));
        if t < 1.0 {
            if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
                let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        } else {
            // Release the loop; the closure is freed once this call returns.
            let _ = f.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(cb) = g.borrow().as_ref() {
        let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn fade_in(el: &HtmlElement, duration_ms: f64) {
    animate(el, Animation::FadeIn, duration_ms);
}

/// Fades out from the computed opacity and hides the element.
pub fn fade_out(el: &HtmlElement, duration_ms: f64) {
    let from_opacity = window()
        .and_then(|w| w.get_computed_style(el).ok().flatten())
        .and_then(|s| s.get_property_value("opacity").ok())
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(1.0);
    animate(el, Animation::FadeOut { from_opacity }, duration_ms);
}

pub fn slide_in_left(el: &HtmlElement, duration_ms: f64) {
    animate(el, Animation::SlideInLeft, duration_ms);
}

pub fn shake(el: &HtmlElement) {
    animate(el, Animation::Shake, CONFIG.animation.shake_duration_ms);
}

pub fn pulse(el: &HtmlElement, duration_ms: f64) {
    animate(el, Animation::Pulse, duration_ms);
}
