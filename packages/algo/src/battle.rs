//! Boss Battle Engine
//!
//! One timed encounter: repetitions deal damage, a countdown runs against
//! the player, and the first terminal condition wins. Reaching zero boss HP
//! is a victory; running out the clock is a defeat.
//!
//! Two periodic inputs drive a battle, and both go through the methods
//! here and nowhere else:
//!
//! - the per-frame path ([`BattleSession::process_frame`]), driven from
//!   the camera loop, which feeds the repetition detector;
//! - the 1 Hz countdown ([`BattleSession::tick_second`]), driven from the
//!   host's interval timer.
//!
//! Finishing is one-shot: the first terminal transition emits the single
//! [`SessionReport`]; every later call is inert. Pausing gates both inputs,
//! so a paused battle cannot lose time or count repetitions.

use log::debug;

use crate::detector::RepDetector;
use crate::session::{accuracy, GameSession};
use crate::types::{Boss, ExercisePhase, ExerciseProfile, Pose};

// ==================== Constants ====================

/// Length of one battle (seconds)
pub const SESSION_SECONDS: u32 = 120;

/// Damage dealt per repetition
pub const REP_DAMAGE: u32 = 1;

// ==================== Lifecycle ====================

/// Lifecycle of one encounter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleState {
    Ready,
    Playing,
    Paused,
    Finished,
}

impl BattleState {
    pub fn as_str(self) -> &'static str {
        match self {
            BattleState::Ready => "ready",
            BattleState::Playing => "playing",
            BattleState::Paused => "paused",
            BattleState::Finished => "finished",
        }
    }
}

/// How the encounter ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Emitted exactly once, by whichever call finishes the battle
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    pub outcome: BattleOutcome,
    /// The record to persist
    pub session: GameSession,
}

// ==================== Step results ====================

/// Result of one camera frame
#[derive(Clone, Debug, PartialEq)]
pub struct BattleFrame {
    /// False when the frame carried no usable angle (or the battle is not
    /// in play); such frames change nothing
    pub valid: bool,
    /// Smoothed angle in degrees, or -1.0 when invalid
    pub angle: f64,
    pub phase: ExercisePhase,
    pub phase_changed: bool,
    pub rep_completed: bool,
    pub damage_dealt: u32,
    pub boss_hp: u32,
    /// Present when this frame ended the battle
    pub report: Option<SessionReport>,
}

/// Result of one countdown tick
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub time_left: u32,
    /// Present when this tick ran out the clock
    pub report: Option<SessionReport>,
}

/// Result of one manual repetition
#[derive(Clone, Debug, PartialEq)]
pub struct ManualRep {
    pub boss_hp: u32,
    /// Present when this repetition felled the boss
    pub report: Option<SessionReport>,
}

// ==================== Battle session ====================

/// One owned boss encounter.
///
/// Owns the boss, the exercise profile, and the repetition detector for its
/// whole lifetime; a rematch is a new `BattleSession`. The engine never
/// reads a clock: frame timestamps come from the caller and the countdown
/// advances only through [`tick_second`](Self::tick_second).
#[derive(Debug)]
pub struct BattleSession {
    boss: Boss,
    detector: RepDetector,
    state: BattleState,
    boss_hp: u32,
    time_left: u32,
    manual_reps: u32,
    started_at: i64,
}

impl BattleSession {
    pub fn new(boss: Boss, profile: ExerciseProfile) -> Self {
        let boss_hp = boss.max_hp;
        Self {
            boss,
            detector: RepDetector::new(profile),
            state: BattleState::Ready,
            boss_hp,
            time_left: SESSION_SECONDS,
            manual_reps: 0,
            started_at: 0,
        }
    }

    /// Begin play. `started_at` is the wall clock in Unix milliseconds;
    /// the final record's id and timestamp derive from it. Returns false
    /// unless the battle was still ready.
    pub fn start(&mut self, started_at: i64) -> bool {
        if self.state != BattleState::Ready {
            return false;
        }
        self.started_at = started_at;
        self.state = BattleState::Playing;
        debug!("battle started against {} ({} HP)", self.boss.id, self.boss_hp);
        true
    }

    /// Feed one camera frame while playing.
    ///
    /// A completed repetition deals [`REP_DAMAGE`]; if that empties the
    /// boss's HP the battle finishes with a victory and the report rides
    /// back on this frame.
    pub fn process_frame(&mut self, pose: &Pose, now: f64) -> BattleFrame {
        if self.state != BattleState::Playing {
            return self.idle_frame();
        }

        let outcome = self.detector.track(pose, now);
        let mut damage_dealt = 0;
        let mut report = None;

        if outcome.rep_completed {
            damage_dealt = REP_DAMAGE;
            report = self.apply_damage();
        }

        BattleFrame {
            valid: outcome.valid,
            angle: outcome.angle,
            phase: outcome.phase,
            phase_changed: outcome.phase_changed,
            rep_completed: outcome.rep_completed,
            damage_dealt,
            boss_hp: self.boss_hp,
            report,
        }
    }

    /// Advance the countdown by one second. The host drives this from its
    /// 1 Hz timer; paused and finished battles do not tick.
    pub fn tick_second(&mut self) -> Tick {
        if self.state != BattleState::Playing {
            return Tick {
                time_left: self.time_left,
                report: None,
            };
        }

        self.time_left = self.time_left.saturating_sub(1);
        let report = if self.time_left == 0 {
            self.finish(BattleOutcome::Defeat)
        } else {
            None
        };

        Tick {
            time_left: self.time_left,
            report,
        }
    }

    /// Count one repetition without the detector (keyboard fallback when
    /// no camera is available). Advances reps but not the combo, so manual
    /// play lowers the session accuracy.
    pub fn manual_rep(&mut self) -> ManualRep {
        if self.state != BattleState::Playing {
            return ManualRep {
                boss_hp: self.boss_hp,
                report: None,
            };
        }

        self.manual_reps += 1;
        let report = self.apply_damage();

        ManualRep {
            boss_hp: self.boss_hp,
            report,
        }
    }

    /// Suspend play; frames and ticks become no-ops until resumed
    pub fn pause(&mut self) -> bool {
        if self.state != BattleState::Playing {
            return false;
        }
        self.state = BattleState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != BattleState::Paused {
            return false;
        }
        self.state = BattleState::Playing;
        true
    }

    /// End the battle immediately (player leaves mid-game). Counts as a
    /// defeat when play had begun; a battle still in setup just closes.
    pub fn abort(&mut self) -> Option<SessionReport> {
        match self.state {
            BattleState::Playing | BattleState::Paused => self.finish(BattleOutcome::Defeat),
            BattleState::Ready => {
                self.state = BattleState::Finished;
                None
            }
            BattleState::Finished => None,
        }
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn profile(&self) -> &ExerciseProfile {
        self.detector.profile()
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn boss_hp(&self) -> u32 {
        self.boss_hp
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Total repetitions: detected plus manual
    pub fn reps(&self) -> u32 {
        self.detector.reps() + self.manual_reps
    }

    pub fn combo(&self) -> u32 {
        self.detector.combo()
    }

    pub fn phase(&self) -> ExercisePhase {
        self.detector.phase()
    }

    pub fn angle_history(&self) -> &[f64] {
        self.detector.angle_history()
    }

    fn apply_damage(&mut self) -> Option<SessionReport> {
        self.boss_hp = self.boss_hp.saturating_sub(REP_DAMAGE);
        if self.boss_hp == 0 {
            self.finish(BattleOutcome::Victory)
        } else {
            None
        }
    }

    // Sole producer of the session report; unreachable twice because the
    // state moves to Finished on the first call
    fn finish(&mut self, outcome: BattleOutcome) -> Option<SessionReport> {
        if self.state == BattleState::Finished {
            return None;
        }
        self.state = BattleState::Finished;

        let duration = SESSION_SECONDS - self.time_left;
        let ended_at = self.started_at + i64::from(duration) * 1000;
        let reps = self.reps();

        let session = GameSession {
            id: ended_at.to_string(),
            boss_id: self.boss.id.clone(),
            exercise_id: self.detector.profile().id.clone(),
            reps,
            accuracy: accuracy(reps, self.detector.combo()),
            duration,
            victory: outcome == BattleOutcome::Victory,
            timestamp: ended_at,
        };

        debug!(
            "battle against {} finished: {:?} after {}s with {} reps",
            self.boss.id, outcome, duration, reps
        );

        Some(SessionReport { outcome, session })
    }

    fn idle_frame(&self) -> BattleFrame {
        BattleFrame {
            valid: false,
            angle: -1.0,
            phase: self.detector.phase(),
            phase_changed: false,
            rep_completed: false,
            damage_dealt: 0,
            boss_hp: self.boss_hp,
            report: None,
        }
    }
}

// ==================== Tests ====================
