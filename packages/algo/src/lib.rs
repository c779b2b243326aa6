//! # bossfit-algo - exercise battle core algorithms
//!
//! Pure Rust gameplay core for camera-driven exercise battles:
//!
//! - **Joint geometry** - angles between pose keypoints
//! - **Angle smoothing** - moving-average filter over noisy estimates
//! - **Repetition detection** - hysteresis state machine with debounce
//! - **Boss battles** - timed encounters where repetitions deal damage
//! - **Session records** - persistence and lifetime statistics
//!
//! ## Design
//!
//! Goals of this crate:
//! - **Pure Rust** - no browser or binding dependencies, usable anywhere
//! - **Deterministic** - no clocks inside; callers pass every timestamp
//! - **Reusable** - core logic separated from the wasm surface
//! - **Fully tested** - every module carries its own unit tests
//!
//! ## Modules
//!
//! - [`geometry`] - angle at a joint from three keypoints
//! - [`smoother`] - trailing moving-average filter
//! - [`detector`] - repetition state machine (phases, reps, combo)
//! - [`catalog`] - built-in exercise profiles and bosses
//! - [`battle`] - countdown battle engine and session reports
//! - [`session`] - game records, accuracy, lifetime statistics
//! - [`store`] - key-value persistence over a pluggable backend
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use bossfit_algo::{find_boss, find_exercise, BattleSession, BattleState};
//!
//! let boss = find_boss("couch-potato").unwrap();
//! let profile = find_exercise("squat").unwrap();
//!
//! let mut battle = BattleSession::new(boss, profile);
//! battle.start(1_700_000_000_000);
//!
//! // Keyboard fallback: one repetition, one point of damage
//! battle.manual_rep();
//! assert_eq!(battle.boss_hp(), 29);
//! assert_eq!(battle.state(), BattleState::Playing);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

pub mod battle;
pub mod catalog;
pub mod detector;
pub mod geometry;
pub mod session;
pub mod smoother;
pub mod store;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export all shared types
pub use types::*;

/// Re-export the joint angle function
pub use geometry::joint_angle;

/// Re-export the moving-average filter
pub use smoother::AngleSmoother;

/// Re-export the repetition detector
pub use detector::{FrameOutcome, RepDetector, StepOutcome};

/// Re-export the built-in catalog
pub use catalog::{builtin_bosses, builtin_exercises, find_boss, find_exercise};

/// Re-export the battle engine
pub use battle::{
    BattleFrame, BattleOutcome, BattleSession, BattleState, ManualRep, SessionReport, Tick,
    REP_DAMAGE, SESSION_SECONDS,
};

/// Re-export session records and statistics
pub use session::{accuracy, GameSession, UserSettings, UserStats};

/// Re-export the persistence layer
pub use store::{
    GameStore, KvBackend, MemoryBackend, StoreError, SESSIONS_KEY, SESSION_LOG_LIMIT,
    SETTINGS_KEY, STATS_KEY,
};
