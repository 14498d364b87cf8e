//! Escape Game SVT page enhancements.
//!
//! Loaded by the server-rendered quiz pages. On start it wires the theme
//! switcher, accessibility touches, the quiz controller (countdown, answer
//! selection, single submission, keyboard shortcuts), progress and feedback
//! decorations. Every feature probes for its elements and stays off when they
//! are absent. The page's own form submission does all server traffic.

use wasm_bindgen::prelude::*;

pub mod accessibility;
pub mod achievements;
pub mod animation;
mod app;
pub mod config;
pub mod diag;
pub mod error;
pub mod notification;
pub mod progress;
pub mod quiz;
pub mod storage;
pub mod theme;

pub use achievements::GameStats;
pub use error::StorageError;
pub use quiz::{QuizState, format_time};
pub use storage::{KeyValueStore, MemoryStore, Storage};
pub use theme::{Theme, ThemeSwitcher};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if let Err(e) = app::start() {
        diag::error(&format!("startup failed: {e:?}"));
    }
}

/// Called by the results page with a JSON `GameStats` object. Persists and
/// announces newly unlocked achievements; returns how many were unlocked.
#[wasm_bindgen]
pub fn check_achievements(stats_json: &str) -> Result<u32, JsValue> {
    let stats: GameStats =
        serde_json::from_str(stats_json).map_err(|e| JsValue::from_str(&format!("invalid game stats: {e}")))?;
    let storage = app::storage();
    let fresh = achievements::check(&storage, &stats);
    if !fresh.is_empty() {
        achievements::announce(&fresh)?;
    }
    Ok(fresh.len() as u32)
}
