//! Achievements unlocked from end-of-game statistics.
//!
//! Unlocked ids are an append-only JSON array under the `achievements` key.
//! Newly unlocked achievements are announced one after another.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::config::CONFIG;
use crate::notification::{self, NotificationKind};
use crate::storage::{KeyValueStore, Storage};

/// Statistics the quiz page reports at the end of a game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStats {
    pub questions_answered: u32,
    pub score: u32,
    pub total_questions: u32,
    pub time_taken: Option<f64>, // seconds
    pub games_played: u32,
}

pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub condition: fn(&GameStats) -> bool,
}

fn answered_one(s: &GameStats) -> bool {
    s.questions_answered >= 1
}

fn perfect(s: &GameStats) -> bool {
    s.total_questions > 0 && s.score == s.total_questions
}

fn under_two_minutes(s: &GameStats) -> bool {
    s.time_taken.is_some_and(|t| t < 120.0)
}

fn ten_games(s: &GameStats) -> bool {
    s.games_played >= 10
}

pub static ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        id: "first_question",
        title: "Première question",
        description: "Répondre à votre première question",
        icon: "🎯",
        condition: answered_one,
    },
    Achievement {
        id: "perfect_score",
        title: "Score parfait",
        description: "Obtenir un score parfait (5/5)",
        icon: "🏆",
        condition: perfect,
    },
    Achievement {
        id: "speed_demon",
        title: "Démon de vitesse",
        description: "Terminer un quiz en moins de 2 minutes",
        icon: "⚡",
        condition: under_two_minutes,
    },
    Achievement {
        id: "persistent",
        title: "Persistant",
        description: "Jouer 10 parties",
        icon: "💪",
        condition: ten_games,
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Ids unlocked so far, in unlock order.
pub fn unlocked<S: KeyValueStore>(storage: &Storage<S>) -> Vec<String> {
    storage.get(CONFIG.storage.achievements_key, Vec::new())
}

/// Evaluates every locked achievement against `stats`, persists the new
/// unlocks, and returns them. Already unlocked ids are never re-reported.
pub fn check<S: KeyValueStore>(storage: &Storage<S>, stats: &GameStats) -> Vec<&'static Achievement> {
    let mut saved = unlocked(storage);
    let fresh: Vec<&'static Achievement> = ACHIEVEMENTS
        .iter()
        .filter(|a| !saved.iter().any(|id| id == a.id) && (a.condition)(stats))
        .collect();
    if !fresh.is_empty() {
        saved.extend(fresh.iter().map(|a| a.id.to_string()));
        storage.set(CONFIG.storage.achievements_key, &saved);
    }
    fresh
}

pub fn announcement(a: &Achievement) -> String {
    format!("{} Nouveau succès débloqué : {} ({})", a.icon, a.title, a.description)
}

/// Announces each achievement, spaced by the configured interval.
pub fn announce(list: &[&'static Achievement]) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    for (i, a) in list.iter().enumerate() {
        let message = announcement(a);
        let cb = Closure::once_into_js(move || {
            if let Err(e) = notification::show_for(
                &message,
                NotificationKind::Success,
                CONFIG.achievements.popup_duration_ms,
            ) {
                crate::diag::warn(&format!("achievement pop-up failed: {e:?}"));
            }
        });
        let delay = CONFIG.achievements.popup_interval_ms.saturating_mul(i as i32);
        win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> Storage<MemoryStore> {
        Storage::new(MemoryStore::new(), "a_")
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            assert!(ACHIEVEMENTS[i + 1..].iter().all(|b| b.id != a.id), "duplicate id {}", a.id);
        }
        assert!(find("speed_demon").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn unlocks_are_reported_once() {
        let storage = store();
        let stats = GameStats { questions_answered: 1, ..GameStats::default() };
        let first: Vec<_> = check(&storage, &stats).iter().map(|a| a.id).collect();
        assert_eq!(first, vec!["first_question"]);
        assert!(check(&storage, &stats).is_empty());
        assert_eq!(unlocked(&storage), vec!["first_question".to_string()]);
    }

    #[test]
    fn list_is_append_only() {
        let storage = store();
        check(&storage, &GameStats { games_played: 10, ..GameStats::default() });
        check(
            &storage,
            &GameStats { questions_answered: 5, score: 5, total_questions: 5, ..GameStats::default() },
        );
        assert_eq!(
            unlocked(&storage),
            vec!["persistent".to_string(), "first_question".to_string(), "perfect_score".to_string()]
        );
    }

    #[test]
    fn missing_time_never_counts_as_fast() {
        let storage = store();
        assert!(check(&storage, &GameStats::default()).is_empty());
        let fast = GameStats { time_taken: Some(95.0), ..GameStats::default() };
        let ids: Vec<_> = check(&storage, &fast).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["speed_demon"]);
    }

    #[test]
    fn stats_parse_from_camel_case() {
        let stats: GameStats =
            serde_json::from_str(r#"{"questionsAnswered":3,"score":3,"totalQuestions":5,"timeTaken":200}"#).unwrap();
        assert_eq!(stats.questions_answered, 3);
        assert_eq!(stats.time_taken, Some(200.0));
        assert_eq!(stats.games_played, 0);
    }
}
