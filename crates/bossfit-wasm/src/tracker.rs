use serde::Deserialize;
use wasm_bindgen::prelude::*;

use bossfit_algo::{find_exercise, ExercisePhase, ExerciseProfile, Joint, JointId, Pose, RepDetector};

#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct FrameResult {
    pub is_valid: bool,
    pub angle: f64,
    pub phase: u8,
    pub phase_changed: bool,
    pub rep_completed: bool,
    pub reps: u32,
    pub combo: u32,
}

// MoveNet pose format: { keypoints: [{ name, x, y, score }] }
#[derive(Deserialize)]
struct KeypointIn {
    name: String,
    x: f64,
    y: f64,
    #[serde(default)]
    score: f64,
}

#[derive(Deserialize)]
struct PoseIn {
    keypoints: Vec<KeypointIn>,
}

pub(crate) fn phase_code(phase: ExercisePhase) -> u8 {
    match phase {
        ExercisePhase::Neutral => 0,
        ExercisePhase::Down => 1,
        ExercisePhase::Up => 2,
    }
}

// Unknown keypoint names are skipped, not errors; models ship extra points
pub(crate) fn parse_pose(pose_js: JsValue) -> Option<Pose> {
    let parsed: PoseIn = serde_wasm_bindgen::from_value(pose_js).ok()?;

    let mut pose = Pose::new();
    for kp in &parsed.keypoints {
        if let Some(id) = JointId::from_name(&kp.name) {
            pose.set(id, Joint::new(kp.x, kp.y, kp.score));
        }
    }
    Some(pose)
}

#[wasm_bindgen]
pub struct RepTracker {
    detector: RepDetector,
}

#[wasm_bindgen]
impl RepTracker {
    #[wasm_bindgen(constructor)]
    pub fn new(exercise_id: &str) -> Result<RepTracker, JsValue> {
        let profile = find_exercise(exercise_id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown exercise id: {exercise_id}")))?;
        Ok(Self {
            detector: RepDetector::new(profile),
        })
    }

    /// Build a tracker from a custom profile object instead of the catalog
    #[wasm_bindgen]
    pub fn with_profile(profile_js: JsValue) -> Result<RepTracker, JsValue> {
        let profile: ExerciseProfile = serde_wasm_bindgen::from_value(profile_js)
            .map_err(|e| JsValue::from_str(&format!("invalid exercise profile: {e}")))?;
        Ok(Self {
            detector: RepDetector::new(profile),
        })
    }

    /// Optimized path: flat keypoint coords [x0, y0, score0, x1, y1, score1, ...]
    /// in MoveNet joint order (17 keypoints, 51 values)
    #[wasm_bindgen]
    pub fn process_frame(&mut self, coords: &[f64], timestamp: f64) -> FrameResult {
        match Pose::from_flat(coords) {
            Some(pose) => self.track(&pose, timestamp),
            None => self.invalid_result(),
        }
    }

    /// Pose object path (MoveNet format via JsValue)
    #[wasm_bindgen]
    pub fn process_pose(&mut self, pose_js: JsValue, timestamp: f64) -> FrameResult {
        match parse_pose(pose_js) {
            Some(pose) => self.track(&pose, timestamp),
            None => self.invalid_result(),
        }
    }

    #[wasm_bindgen]
    pub fn reps(&self) -> u32 {
        self.detector.reps()
    }

    #[wasm_bindgen]
    pub fn combo(&self) -> u32 {
        self.detector.combo()
    }

    #[wasm_bindgen]
    pub fn phase_name(&self) -> String {
        self.detector.phase().as_str().to_string()
    }

    /// Smoothed angles seen so far, oldest first
    #[wasm_bindgen]
    pub fn angle_history(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.detector.angle_history())
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.detector.reset();
    }

    fn track(&mut self, pose: &Pose, timestamp: f64) -> FrameResult {
        let outcome = self.detector.track(pose, timestamp);
        FrameResult {
            is_valid: outcome.valid,
            angle: outcome.angle,
            phase: phase_code(outcome.phase),
            phase_changed: outcome.phase_changed,
            rep_completed: outcome.rep_completed,
            reps: self.detector.reps(),
            combo: self.detector.combo(),
        }
    }

    fn invalid_result(&self) -> FrameResult {
        FrameResult {
            is_valid: false,
            angle: -1.0,
            phase: phase_code(self.detector.phase()),
            phase_changed: false,
            rep_completed: false,
            reps: self.detector.reps(),
            combo: self.detector.combo(),
        }
    }
}
