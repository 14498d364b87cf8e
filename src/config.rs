//! Static configuration for the page enhancements.
//!
//! Everything here is compile-time data: the pages are rendered by the quiz
//! server and the script has no settings of its own. Sections mirror the
//! modules that read them.

// --- Sections -----------------------------------------------------------------

pub struct AnimationConfig {
    pub duration_ms: f64,       // default fade / slide duration
    pub shake_duration_ms: f64, // wrong-answer shake
    pub pulse_duration_ms: f64,
    pub option_stagger_ms: u32, // per-option animation delay on the quiz page
    pub title_slide_ms: f64,
    pub option_fade_ms: f64,
    pub feedback_fade_ms: f64,
    pub next_button_pulse_ms: f64,
}

pub struct QuizConfig {
    pub tick_ms: i32,
    pub auto_advance_delay_ms: i32,
    pub warning_threshold_secs: u32, // color change at or below
    pub critical_threshold_secs: u32, // pulsing at or below
    pub warning_color: &'static str,
    pub critical_color: &'static str,
    pub critical_animation: &'static str,
    pub answer_field: &'static str,
    pub abandon_url: &'static str,
    pub abandon_prompt: &'static str,
    pub time_up_message: &'static str,
    pub submitting_label: &'static str,
}

pub struct NotificationConfig {
    pub duration_ms: i32,
    pub generic_error: &'static str,
}

pub struct StorageConfig {
    pub prefix: &'static str,
    pub theme_key: &'static str,
    pub progress_key: &'static str,
    pub achievements_key: &'static str,
}

/// CSS selectors the page enhancements probe for. Absence of any of them
/// disables the matching feature.
pub struct Selectors {
    pub quiz_form: &'static str,
    pub time_remaining: &'static str,
    pub submit_button: &'static str,
    pub progress_container: &'static str,
    pub progress_bar: &'static str,
    pub progress_text: &'static str,
    pub feedback: &'static str,
    pub next_button: &'static str,
    pub title: &'static str,
    pub nav: &'static str,
    pub theme_toggle: &'static str,
    pub loading_targets: &'static str,
}

pub struct AchievementConfig {
    pub popup_interval_ms: i32,
    pub popup_duration_ms: i32,
}

pub struct Config {
    pub animation: AnimationConfig,
    pub quiz: QuizConfig,
    pub notification: NotificationConfig,
    pub storage: StorageConfig,
    pub selectors: Selectors,
    pub achievements: AchievementConfig,
}

// --- Values -------------------------------------------------------------------

pub static CONFIG: Config = Config {
    animation: AnimationConfig {
        duration_ms: 300.0,
        shake_duration_ms: 600.0,
        pulse_duration_ms: 1000.0,
        option_stagger_ms: 100,
        title_slide_ms: 500.0,
        option_fade_ms: 300.0,
        feedback_fade_ms: 500.0,
        next_button_pulse_ms: 1500.0,
    },
    quiz: QuizConfig {
        tick_ms: 1000,
        auto_advance_delay_ms: 2000,
        warning_threshold_secs: 30,
        critical_threshold_secs: 10,
        warning_color: "#ff9800",
        critical_color: "#f44336",
        critical_animation: "pulse 1s infinite",
        answer_field: "reponse",
        abandon_url: "/profil",
        abandon_prompt: "Êtes-vous sûr de vouloir quitter le quiz ?",
        time_up_message: "Temps écoulé !",
        submitting_label: "<span class=\"spinner\"></span> Validation...",
    },
    notification: NotificationConfig {
        duration_ms: 3000,
        generic_error: "Une erreur est survenue. Veuillez recharger la page.",
    },
    storage: StorageConfig {
        prefix: "escapeGame_",
        theme_key: "theme",
        progress_key: "progress",
        achievements_key: "achievements",
    },
    selectors: Selectors {
        quiz_form: "form[method=\"POST\"]",
        time_remaining: ".time-remaining",
        submit_button: "button[type=\"submit\"]",
        progress_container: ".progress-container",
        progress_bar: ".progress-bar",
        progress_text: ".progress-text",
        feedback: ".feedback",
        next_button: "a.btn",
        title: "h1",
        nav: "nav",
        theme_toggle: ".theme-toggle",
        loading_targets: "button, .btn",
    },
    achievements: AchievementConfig {
        popup_interval_ms: 1000,
        popup_duration_ms: 4000,
    },
};

/// Selector matching every answer radio of the quiz form.
pub fn answer_selector() -> String {
    format!("input[name=\"{}\"]", CONFIG.quiz.answer_field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_threshold_is_below_warning() {
        assert!(CONFIG.quiz.critical_threshold_secs < CONFIG.quiz.warning_threshold_secs);
    }

    #[test]
    fn answer_selector_targets_field() {
        assert_eq!(answer_selector(), "input[name=\"reponse\"]");
    }
}
