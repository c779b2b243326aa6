//! Session Records and Aggregates
//!
//! The persisted result of one play-through and the running statistics
//! folded over every finished session. Serialized field names are camelCase
//! so records match the shapes already stored by the web app.

use serde::{Deserialize, Serialize};

// ==================== Session record ====================

/// Result of one timed play-through against one boss
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Wall-clock milliseconds at session end, stringified
    pub id: String,
    pub boss_id: String,
    pub exercise_id: String,
    /// Total repetitions, detected and manual
    pub reps: u32,
    /// Percentage in [0, 100]; see [`accuracy`]
    pub accuracy: f64,
    /// Elapsed seconds
    pub duration: u32,
    pub victory: bool,
    /// Wall-clock milliseconds at session end
    pub timestamp: i64,
}

/// Session accuracy: the share of repetitions credited to the combo
/// counter, as a percentage capped at 100. Zero repetitions score zero.
///
/// Detector-counted repetitions advance reps and combo together, so
/// camera-only sessions score exactly 100; manual repetitions advance reps
/// alone and pull the score down.
pub fn accuracy(reps: u32, combo: u32) -> f64 {
    if reps == 0 {
        return 0.0;
    }
    (f64::from(combo) / f64::from(reps) * 100.0).min(100.0)
}

// ==================== Aggregates ====================

/// Running totals over all finished sessions.
///
/// Updated in O(1) per session by [`UserStats::apply`]; never derived by
/// rescanning the session log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_reps: u32,
    pub total_sessions: u32,
    pub victories: u32,
    /// Consecutive victories; any defeat resets it
    pub streak: u32,
    pub best_accuracy: f64,
}

impl UserStats {
    /// Fold one finished session into the totals
    pub fn apply(&mut self, session: &GameSession) {
        self.total_reps += session.reps;
        self.total_sessions += 1;
        self.best_accuracy = self.best_accuracy.max(session.accuracy);

        if session.victory {
            self.victories += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
    }

    /// Totals obtained by folding `sessions` oldest-first from zero
    pub fn replay<'a, I>(sessions: I) -> UserStats
    where
        I: IntoIterator<Item = &'a GameSession>,
    {
        let mut stats = UserStats::default();
        for session in sessions {
            stats.apply(session);
        }
        stats
    }
}

// ==================== Settings ====================

/// Player preferences persisted alongside the session log
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub camera_permission: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            camera_permission: false,
        }
    }
}

// ==================== Tests ====================
