use wasm_bindgen::prelude::*;

use bossfit_algo::{find_boss, find_exercise, BattleSession, GameStore, Pose, SessionReport};

use crate::store::LocalStorage;
use crate::tracker::{parse_pose, phase_code};

#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct BattleFrameResult {
    pub is_valid: bool,
    pub angle: f64,
    pub phase: u8,
    pub phase_changed: bool,
    pub rep_completed: bool,
    pub damage_dealt: u32,
    pub boss_hp: u32,
    /// True when this frame ended the battle; fetch session_report()
    pub finished: bool,
}

#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct TickResult {
    pub time_left: u32,
    pub finished: bool,
}

#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct ManualRepResult {
    pub boss_hp: u32,
    pub finished: bool,
}

/// One boss encounter wired to localStorage.
///
/// Drive it with the camera loop (process_frame / process_pose), a 1 Hz
/// interval (tick_second), and the spacebar fallback (manual_rep). When a
/// call reports `finished`, the session record has already been saved and
/// session_report() returns it.
#[wasm_bindgen]
pub struct BossBattle {
    session: BattleSession,
    store: GameStore<LocalStorage>,
    last_report: Option<SessionReport>,
}

#[wasm_bindgen]
impl BossBattle {
    #[wasm_bindgen(constructor)]
    pub fn new(boss_id: &str, exercise_id: &str) -> Result<BossBattle, JsValue> {
        let boss = find_boss(boss_id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown boss id: {boss_id}")))?;
        let profile = find_exercise(exercise_id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown exercise id: {exercise_id}")))?;
        Ok(Self {
            session: BattleSession::new(boss, profile),
            store: GameStore::new(LocalStorage),
            last_report: None,
        })
    }

    /// Begin play; `started_at` is Date.now()
    #[wasm_bindgen]
    pub fn start(&mut self, started_at: f64) -> bool {
        self.session.start(started_at as i64)
    }

    /// Flat keypoint coords in MoveNet order; `timestamp` is performance.now()
    #[wasm_bindgen]
    pub fn process_frame(&mut self, coords: &[f64], timestamp: f64) -> BattleFrameResult {
        match Pose::from_flat(coords) {
            Some(pose) => self.feed(&pose, timestamp),
            None => self.skipped_frame(),
        }
    }

    /// Pose object path (MoveNet format via JsValue)
    #[wasm_bindgen]
    pub fn process_pose(&mut self, pose_js: JsValue, timestamp: f64) -> BattleFrameResult {
        match parse_pose(pose_js) {
            Some(pose) => self.feed(&pose, timestamp),
            None => self.skipped_frame(),
        }
    }

    /// Advance the countdown by one second
    #[wasm_bindgen]
    pub fn tick_second(&mut self) -> TickResult {
        let tick = self.session.tick_second();
        let finished = self.absorb(tick.report);
        TickResult {
            time_left: tick.time_left,
            finished,
        }
    }

    /// Count one repetition without the camera
    #[wasm_bindgen]
    pub fn manual_rep(&mut self) -> ManualRepResult {
        let manual = self.session.manual_rep();
        let finished = self.absorb(manual.report);
        ManualRepResult {
            boss_hp: manual.boss_hp,
            finished,
        }
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) -> bool {
        self.session.pause()
    }

    #[wasm_bindgen]
    pub fn resume(&mut self) -> bool {
        self.session.resume()
    }

    /// End the battle now; an in-progress game records a defeat
    #[wasm_bindgen]
    pub fn abort(&mut self) -> bool {
        let report = self.session.abort();
        self.absorb(report)
    }

    /// Final session record, or null while the battle is still running
    #[wasm_bindgen]
    pub fn session_report(&self) -> JsValue {
        match &self.last_report {
            Some(report) => {
                serde_wasm_bindgen::to_value(&report.session).unwrap_or(JsValue::NULL)
            }
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen]
    pub fn boss_hp(&self) -> u32 {
        self.session.boss_hp()
    }

    #[wasm_bindgen]
    pub fn time_left(&self) -> u32 {
        self.session.time_left()
    }

    #[wasm_bindgen]
    pub fn reps(&self) -> u32 {
        self.session.reps()
    }

    #[wasm_bindgen]
    pub fn combo(&self) -> u32 {
        self.session.combo()
    }

    #[wasm_bindgen]
    pub fn state_name(&self) -> String {
        self.session.state().as_str().to_string()
    }

    #[wasm_bindgen]
    pub fn phase_name(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    /// Smoothed angles seen so far, oldest first
    #[wasm_bindgen]
    pub fn angle_history(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.session.angle_history())
    }

    fn feed(&mut self, pose: &Pose, timestamp: f64) -> BattleFrameResult {
        let frame = self.session.process_frame(pose, timestamp);
        let finished = self.absorb(frame.report);
        BattleFrameResult {
            is_valid: frame.valid,
            angle: frame.angle,
            phase: phase_code(frame.phase),
            phase_changed: frame.phase_changed,
            rep_completed: frame.rep_completed,
            damage_dealt: frame.damage_dealt,
            boss_hp: frame.boss_hp,
            finished,
        }
    }

    // Keep the report and persist the session; a storage failure loses the
    // record but never the battle result
    fn absorb(&mut self, report: Option<SessionReport>) -> bool {
        match report {
            Some(report) => {
                if let Err(err) = self.store.record_session(&report.session) {
                    web_sys::console::warn_1(&format!("failed to save session: {err}").into());
                }
                self.last_report = Some(report);
                true
            }
            None => false,
        }
    }

    fn skipped_frame(&self) -> BattleFrameResult {
        BattleFrameResult {
            is_valid: false,
            angle: -1.0,
            phase: phase_code(self.session.phase()),
            phase_changed: false,
            rep_completed: false,
            damage_dealt: 0,
            boss_hp: self.session.boss_hp(),
            finished: false,
        }
    }
}
