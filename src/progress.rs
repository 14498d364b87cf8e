//! Quiz progress: "Question 3/5" titles, the progress bar, and progress
//! records kept in storage.

use std::collections::BTreeMap;

use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::animation;
use crate::config::CONFIG;
use crate::storage::{KeyValueStore, Storage};

const COMPLETE_GRADIENT: &str = "linear-gradient(90deg, #4caf50, #8bc34a)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
}

/// Leading integer of `s` after optional whitespace, like JS `parseInt`.
/// Saturates at `u32::MAX`.
fn leading_int(s: &str) -> Option<u32> {
    let mut digits = s.trim_start().chars().map_while(|c| c.to_digit(10)).peekable();
    digits.peek()?;
    Some(digits.fold(0u32, |n, d| n.saturating_mul(10).saturating_add(d)))
}

/// First run of ASCII digits anywhere in `s`.
pub fn first_int(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    leading_int(&s[start..])
}

impl Progress {
    /// Parses a title such as `Question 3/5`. `current` is the first integer
    /// (0 if none), `total` the integer right after the first `/` (1 if none).
    pub fn parse(title: &str) -> Self {
        let current = first_int(title).unwrap_or(0);
        let total = title
            .split('/')
            .nth(1)
            .and_then(leading_int)
            .filter(|t| *t > 0)
            .unwrap_or(1);
        Self { current, total }
    }

    pub fn percentage(&self) -> f64 {
        f64::from(self.current) / f64::from(self.total.max(1)) * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.current, self.total)
    }
}

/// Progress records: timestamp (ms) → arbitrary payload.
pub type ProgressRecords = BTreeMap<String, Value>;

/// Appends `data` under `timestamp_ms` and returns the record count.
pub fn save_record<S: KeyValueStore>(storage: &Storage<S>, timestamp_ms: f64, data: Value) -> usize {
    let key = CONFIG.storage.progress_key;
    let mut records: ProgressRecords = storage.get(key, ProgressRecords::new());
    records.insert(format!("{}", timestamp_ms.max(0.0) as u64), data);
    storage.set(key, &records);
    records.len()
}

// --- DOM ----------------------------------------------------------------------

/// Sets bar width (with a completion flourish) and the `current/total` text.
pub fn update(doc: &Document, progress: Progress) -> Result<(), JsValue> {
    if let Some(bar) = doc.query_selector(CONFIG.selectors.progress_bar)? {
        let bar: HtmlElement = bar.dyn_into()?;
        bar.style()
            .set_property("width", &format!("{}%", progress.percentage()))?;
        if progress.is_complete() {
            bar.style().set_property("background", COMPLETE_GRADIENT)?;
            animation::pulse(&bar, CONFIG.animation.pulse_duration_ms);
        }
    }
    if let Some(text) = doc.query_selector(CONFIG.selectors.progress_text)? {
        text.set_text_content(Some(&progress.label()));
    }
    Ok(())
}

/// Runs only on pages with a progress container.
pub fn install<S: KeyValueStore>(doc: &Document, storage: &Storage<S>) -> Result<(), JsValue> {
    if doc.query_selector(CONFIG.selectors.progress_container)?.is_none() {
        return Ok(());
    }
    let title = doc
        .query_selector(CONFIG.selectors.title)?
        .and_then(|h| h.text_content())
        .unwrap_or_default();
    let progress = Progress::parse(&title);
    update(doc, progress)?;
    save_record(
        storage,
        js_sys::Date::now(),
        serde_json::json!({ "current": progress.current, "total": progress.total }),
    );
    Ok(())
}
