//! Dark / light theme switching.
//!
//! A theme is a palette written to `--theme-*` custom properties on the
//! root element. The chosen name is persisted under the `theme` key; the
//! persisted value always equals the applied one after a change.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::config::CONFIG;
use crate::storage::{KeyValueStore, Storage};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

pub const DARK_PALETTE: &[(&str, &str)] = &[
    ("primary", "#ff5252"),
    ("secondary", "#4db6ac"),
    ("background", "#0d0d0d"),
    ("surface", "#1e1e1e"),
    ("text", "#f4f4f9"),
];

pub const LIGHT_PALETTE: &[(&str, &str)] = &[
    ("primary", "#d32f2f"),
    ("secondary", "#00695c"),
    ("background", "#fafafa"),
    ("surface", "#ffffff"),
    ("text", "#333333"),
];

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Theme::Dark => DARK_PALETTE,
            Theme::Light => LIGHT_PALETTE,
        }
    }

    /// Label of the toggle button: the icon of the theme it switches to.
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Dark => "🌞",
            Theme::Light => "🌙",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Owns the current theme and its persisted preference.
pub struct ThemeSwitcher<S: KeyValueStore> {
    storage: Rc<Storage<S>>,
    current: Theme,
}

impl<S: KeyValueStore> ThemeSwitcher<S> {
    /// Loads the saved preference; unknown or missing names give dark.
    pub fn load(storage: Rc<Storage<S>>) -> Self {
        let saved: String = storage.get(CONFIG.storage.theme_key, Theme::Dark.as_str().to_string());
        let current = saved.parse().unwrap_or_default();
        Self { storage, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Makes `theme` current and persists it.
    pub fn set(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        self.storage.set(CONFIG.storage.theme_key, theme.as_str());
        theme
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled())
    }
}

// --- DOM ----------------------------------------------------------------------

/// Writes the palette to the root element and relabels the toggle button.
pub fn apply(doc: &Document, theme: Theme) {
    if let Some(root) = doc.document_element().and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
        let style = root.style();
        for (name, value) in theme.palette() {
            style.set_property(&format!("--theme-{name}"), value).ok();
        }
    }
    if let Ok(Some(toggle)) = doc.query_selector(CONFIG.selectors.theme_toggle) {
        toggle.set_text_content(Some(theme.toggle_icon()));
    }
}

/// Applies the saved theme and appends a toggle button to `nav` if present.
pub fn install<S: KeyValueStore + 'static>(doc: &Document, storage: Rc<Storage<S>>) -> Result<(), JsValue> {
    let mut switcher = ThemeSwitcher::load(storage);
    // Re-save so a corrupt or unknown value is replaced by what is shown.
    let theme = switcher.set(switcher.current());
    apply(doc, theme);

    let nav = match doc.query_selector(CONFIG.selectors.nav)? {
        Some(n) => n,
        None => return Ok(()),
    };
    let toggle = doc.create_element("button")?;
    toggle.set_class_name("theme-toggle");
    toggle.set_text_content(Some(theme.toggle_icon()));
    toggle.set_attribute("title", "Changer de thème")?;
    toggle.set_attribute("type", "button")?;

    let doc_click = doc.clone();
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        let next = switcher.toggle();
        apply(&doc_click, next);
    }) as Box<dyn FnMut(_)>);
    toggle.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();

    nav.append_child(&toggle)?;
    Ok(())
}
