//! Repetition Detection
//!
//! The repetition state machine. A smoothed joint angle drives a three-phase
//! cycle (neutral -> down -> up); completing `down -> up` counts one
//! repetition. Two independent guards protect every transition:
//!
//! - **Hysteresis**: entering the bottom requires the angle at or below
//!   `down_angle`, completing the rep requires it at or above `up_angle`.
//!   The gap between the two prevents flicker around a single threshold.
//! - **Debounce**: a transition is only taken after `hold_duration`
//!   milliseconds have passed since the previous one.
//!
//! The detector also owns per-frame input handling: resolving the profile's
//! joint pairs against a pose (left side first, right as fallback), gating
//! on confidence, and smoothing the raw angle.

use crate::geometry::joint_angle;
use crate::smoother::AngleSmoother;
use crate::types::{
    ExercisePhase, ExerciseProfile, Joint, JointPair, Pose, ANGLE_HISTORY_LIMIT,
};

/// Result of advancing the state machine by one smoothed angle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    /// Phase after this step
    pub phase: ExercisePhase,
    /// Whether this step took a transition
    pub phase_changed: bool,
    /// Whether this step completed a repetition
    pub rep_completed: bool,
}

/// Result of tracking one camera frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    /// False when a required joint was missing or under-confident; such a
    /// frame changes nothing
    pub valid: bool,
    /// Smoothed angle in degrees, or -1.0 when the frame is invalid
    pub angle: f64,
    /// Phase after this frame
    pub phase: ExercisePhase,
    /// Whether this frame took a transition
    pub phase_changed: bool,
    /// Whether this frame completed a repetition
    pub rep_completed: bool,
}

impl FrameOutcome {
    fn invalid(phase: ExercisePhase) -> Self {
        Self {
            valid: false,
            angle: -1.0,
            phase,
            phase_changed: false,
            rep_completed: false,
        }
    }
}

/// Per-exercise repetition counter.
///
/// Owns the exercise profile, the smoothing window, and the state machine.
/// Timestamps are caller-supplied milliseconds (the browser passes
/// `performance.now()`); the detector never reads a clock.
#[derive(Clone, Debug)]
pub struct RepDetector {
    profile: ExerciseProfile,
    smoother: AngleSmoother,
    phase: ExercisePhase,
    reps: u32,
    combo: u32,
    last_transition: f64,
    angles: Vec<f64>,
}

impl RepDetector {
    pub fn new(profile: ExerciseProfile) -> Self {
        Self {
            profile,
            smoother: AngleSmoother::new(),
            phase: ExercisePhase::Neutral,
            reps: 0,
            combo: 0,
            last_transition: 0.0,
            angles: Vec::with_capacity(ANGLE_HISTORY_LIMIT),
        }
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn phase(&self) -> ExercisePhase {
        self.phase
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Smoothed angles from recent valid frames, oldest first
    pub fn angle_history(&self) -> &[f64] {
        &self.angles
    }

    /// Track one camera frame.
    ///
    /// Resolves the profile's joint pairs against the pose; if any of the
    /// three cannot be resolved the frame is a complete no-op and the
    /// outcome is marked invalid. Otherwise the raw angle is smoothed and
    /// fed to the state machine.
    pub fn track(&mut self, pose: &Pose, now: f64) -> FrameOutcome {
        let raw = match self.resolve_angle(pose) {
            Some(angle) => angle,
            None => return FrameOutcome::invalid(self.phase),
        };

        let smoothed = self.smoother.push(raw);
        let step = self.advance(smoothed, now);

        FrameOutcome {
            valid: true,
            angle: smoothed,
            phase: step.phase,
            phase_changed: step.phase_changed,
            rep_completed: step.rep_completed,
        }
    }

    /// Advance the state machine by one smoothed angle.
    ///
    /// Every call records the angle in the history, transition or not. A
    /// repetition is reported only on the `down -> up` transition, so one
    /// physical rep can never count twice.
    pub fn advance(&mut self, angle: f64, now: f64) -> StepOutcome {
        let dwell_ok = now - self.last_transition >= self.profile.hold_duration;
        let mut phase_changed = false;
        let mut rep_completed = false;

        match self.phase {
            ExercisePhase::Neutral | ExercisePhase::Up => {
                if angle <= self.profile.down_angle && dwell_ok {
                    self.phase = ExercisePhase::Down;
                    self.last_transition = now;
                    phase_changed = true;
                }
            }
            ExercisePhase::Down => {
                if angle >= self.profile.up_angle && dwell_ok {
                    self.phase = ExercisePhase::Up;
                    self.last_transition = now;
                    self.reps += 1;
                    self.combo += 1;
                    phase_changed = true;
                    rep_completed = true;
                }
            }
        }

        self.record_angle(angle);

        StepOutcome {
            phase: self.phase,
            phase_changed,
            rep_completed,
        }
    }

    /// Restore the initial state: neutral phase, zeroed counters, empty
    /// history and smoothing window
    pub fn reset(&mut self) {
        self.phase = ExercisePhase::Neutral;
        self.reps = 0;
        self.combo = 0;
        self.last_transition = 0.0;
        self.angles.clear();
        self.smoother.reset();
    }

    fn resolve_angle(&self, pose: &Pose) -> Option<f64> {
        let [a, b, c] = self.profile.joints;
        let ja = Self::resolve_joint(pose, a)?;
        let jb = Self::resolve_joint(pose, b)?;
        let jc = Self::resolve_joint(pose, c)?;
        Some(joint_angle(ja, jb, jc))
    }

    // Left side preferred; either side must clear the confidence floor
    fn resolve_joint(pose: &Pose, pair: JointPair) -> Option<Joint> {
        pose.usable(pair.left).or_else(|| pose.usable(pair.right))
    }

    fn record_angle(&mut self, angle: f64) {
        self.angles.push(angle);
        if self.angles.len() > ANGLE_HISTORY_LIMIT {
            self.angles.remove(0);
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JointId;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn squat_joints() -> [JointPair; 3] {
        [
            JointPair::new(JointId::LeftHip, JointId::RightHip),
            JointPair::new(JointId::LeftKnee, JointId::RightKnee),
            JointPair::new(JointId::LeftAnkle, JointId::RightAnkle),
        ]
    }

    fn profile_with(down_angle: f64, up_angle: f64, hold_duration: f64) -> ExerciseProfile {
        ExerciseProfile {
            id: "squat".into(),
            name: "Squat".into(),
            description: String::new(),
            joints: squat_joints(),
            down_angle,
            up_angle,
            hold_duration,
        }
    }

    fn squat_profile() -> ExerciseProfile {
        profile_with(90.0, 160.0, 300.0)
    }

    /// Left-side leg fully extended: knee angle 180
    fn standing_pose() -> Pose {
        let mut pose = Pose::new();
        pose.set(JointId::LeftHip, Joint::new(100.0, 40.0, 0.95));
        pose.set(JointId::LeftKnee, Joint::new(100.0, 100.0, 0.95));
        pose.set(JointId::LeftAnkle, Joint::new(100.0, 160.0, 0.95));
        pose
    }

    /// Left-side thigh horizontal: knee angle 90
    fn deep_squat_pose() -> Pose {
        let mut pose = Pose::new();
        pose.set(JointId::LeftHip, Joint::new(160.0, 100.0, 0.95));
        pose.set(JointId::LeftKnee, Joint::new(100.0, 100.0, 0.95));
        pose.set(JointId::LeftAnkle, Joint::new(100.0, 160.0, 0.95));
        pose
    }

    // ============ State machine tests ============

    #[test]
    fn test_initial_state() {
        let detector = RepDetector::new(squat_profile());
        assert_eq!(detector.phase(), ExercisePhase::Neutral);
        assert_eq!(detector.reps(), 0);
        assert_eq!(detector.combo(), 0);
        assert!(detector.angle_history().is_empty());
    }

    #[test]
    fn test_single_cycle_counts_one_rep() {
        let mut detector = RepDetector::new(squat_profile());

        let step = detector.advance(170.0, 400.0);
        assert_eq!(step.phase, ExercisePhase::Neutral);
        assert!(!step.phase_changed);

        let step = detector.advance(80.0, 800.0);
        assert_eq!(step.phase, ExercisePhase::Down);
        assert!(step.phase_changed);
        assert!(!step.rep_completed);

        let step = detector.advance(170.0, 1200.0);
        assert_eq!(step.phase, ExercisePhase::Up);
        assert!(step.phase_changed);
        assert!(step.rep_completed);
        assert_eq!(detector.reps(), 1);
        assert_eq!(detector.combo(), 1);
    }

    #[test]
    fn test_hysteresis_overshoot_counts_once() {
        // Angle dips below the down threshold once, then overshoots past
        // the up threshold and stays there: exactly one rep
        let mut detector = RepDetector::new(squat_profile());
        let angles = [170.0, 170.0, 85.0, 85.0, 170.0, 170.0];

        let mut reps_seen = 0;
        for (i, angle) in angles.iter().enumerate() {
            let step = detector.advance(*angle, i as f64 * 350.0);
            if step.rep_completed {
                reps_seen += 1;
            }
        }

        assert_eq!(reps_seen, 1);
        assert_eq!(detector.reps(), 1);
        assert_eq!(detector.phase(), ExercisePhase::Up);
    }

    #[test]
    fn test_debounce_blocks_rapid_sequence() {
        // Same angle pattern, but every sample lands inside the hold
        // window: no transition is allowed to fire
        let mut detector = RepDetector::new(squat_profile());
        let angles = [170.0, 170.0, 85.0, 85.0, 170.0, 170.0];

        for (i, angle) in angles.iter().enumerate() {
            let step = detector.advance(*angle, i as f64 * 50.0);
            assert!(!step.rep_completed);
        }

        assert_eq!(detector.reps(), 0);
        assert_eq!(detector.phase(), ExercisePhase::Neutral);
    }

    #[test]
    fn test_second_rep_requires_another_descent() {
        let mut detector = RepDetector::new(squat_profile());
        let mut now = 0.0;
        let mut feed = |d: &mut RepDetector, angle: f64| {
            now += 400.0;
            d.advance(angle, now)
        };

        feed(&mut detector, 170.0);
        feed(&mut detector, 85.0);
        feed(&mut detector, 170.0);
        assert_eq!(detector.reps(), 1);

        // Staying at the top adds nothing
        feed(&mut detector, 175.0);
        feed(&mut detector, 170.0);
        assert_eq!(detector.reps(), 1);

        // A full second cycle counts again
        feed(&mut detector, 85.0);
        let step = feed(&mut detector, 170.0);
        assert!(step.rep_completed);
        assert_eq!(detector.reps(), 2);
    }

    #[test]
    fn test_zero_hold_duration_allows_immediate_transitions() {
        let mut detector = RepDetector::new(profile_with(90.0, 160.0, 0.0));
        detector.advance(80.0, 0.0);
        let step = detector.advance(170.0, 0.0);
        assert!(step.rep_completed);
    }

    #[test]
    fn test_combo_mirrors_reps_for_detected_repetitions() {
        // The combo counter intentionally advances one-for-one with reps
        // and never resets mid-session; only manual repetitions (handled
        // by the battle layer) widen the gap between the two
        let mut detector = RepDetector::new(squat_profile());
        let mut now = 0.0;
        for _ in 0..4 {
            now += 400.0;
            detector.advance(85.0, now);
            now += 400.0;
            detector.advance(170.0, now);
            assert_eq!(detector.combo(), detector.reps());
        }
        assert_eq!(detector.reps(), 4);
    }

    // ============ Angle history tests ============

    #[test]
    fn test_every_step_records_history() {
        let mut detector = RepDetector::new(squat_profile());
        detector.advance(170.0, 0.0);
        detector.advance(120.0, 50.0);
        detector.advance(85.0, 100.0);

        // Recorded whether or not a transition fired
        assert_eq!(detector.angle_history(), &[170.0, 120.0, 85.0]);
    }

    #[test]
    fn test_history_is_bounded_fifo() {
        let mut detector = RepDetector::new(squat_profile());
        for i in 0..150 {
            detector.advance(i as f64, i as f64 * 400.0);
        }

        let history = detector.angle_history();
        assert_eq!(history.len(), ANGLE_HISTORY_LIMIT);
        assert!((history[0] - 50.0).abs() < EPSILON);
        assert!((history[99] - 149.0).abs() < EPSILON);
    }

    // ============ Frame tracking tests ============

    #[test]
    fn test_track_full_cycle_with_smoothing() {
        let mut detector = RepDetector::new(squat_profile());
        let mut now = 0.0;
        let mut reps_seen = 0;
        let mut feed = |d: &mut RepDetector, pose: &Pose| {
            now += 400.0;
            d.track(pose, now)
        };

        for _ in 0..5 {
            let out = feed(&mut detector, &standing_pose());
            assert!(out.valid);
            assert!((out.angle - 180.0).abs() < EPSILON);
        }

        // The window takes five deep frames to settle onto the bottom
        for _ in 0..5 {
            let out = feed(&mut detector, &deep_squat_pose());
            reps_seen += u32::from(out.rep_completed);
        }
        assert_eq!(detector.phase(), ExercisePhase::Down);

        for _ in 0..5 {
            let out = feed(&mut detector, &standing_pose());
            reps_seen += u32::from(out.rep_completed);
        }

        assert_eq!(reps_seen, 1);
        assert_eq!(detector.reps(), 1);
        assert_eq!(detector.phase(), ExercisePhase::Up);
    }

    #[test]
    fn test_missing_joint_frame_is_a_no_op() {
        let mut detector = RepDetector::new(squat_profile());
        detector.track(&standing_pose(), 400.0);
        let before_history = detector.angle_history().to_vec();

        // Knee present on neither side with usable confidence
        let mut pose = standing_pose();
        pose.set(JointId::LeftKnee, Joint::new(100.0, 100.0, 0.4));
        let out = detector.track(&pose, 800.0);

        assert!(!out.valid);
        assert_eq!(out.angle, -1.0);
        assert_eq!(detector.phase(), ExercisePhase::Neutral);
        assert_eq!(detector.reps(), 0);
        assert_eq!(detector.angle_history(), before_history.as_slice());
    }

    #[test]
    fn test_invalid_frame_skips_smoothing_window() {
        let mut detector = RepDetector::new(squat_profile());

        let mut headless = Pose::new();
        headless.set(JointId::LeftKnee, Joint::new(100.0, 100.0, 0.9));
        detector.track(&headless, 400.0);

        // First valid frame averages over itself alone
        let out = detector.track(&deep_squat_pose(), 800.0);
        assert!(out.valid);
        assert!((out.angle - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_falls_back_to_right_side_joint() {
        let mut pose = deep_squat_pose();
        // Left hip under-confident; right hip placed straight above the
        // knee, which straightens the measured angle to 180
        pose.set(JointId::LeftHip, Joint::new(160.0, 100.0, 0.2));
        pose.set(JointId::RightHip, Joint::new(100.0, 40.0, 0.9));

        let mut detector = RepDetector::new(squat_profile());
        let out = detector.track(&pose, 400.0);
        assert!(out.valid);
        assert!((out.angle - 180.0).abs() < EPSILON);
    }

    #[test]
    fn test_prefers_left_side_when_both_usable() {
        let mut pose = deep_squat_pose();
        pose.set(JointId::RightHip, Joint::new(100.0, 40.0, 0.99));

        let mut detector = RepDetector::new(squat_profile());
        let out = detector.track(&pose, 400.0);

        // Left hip wins even though the right is more confident
        assert!((out.angle - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut detector = RepDetector::new(squat_profile());
        detector.advance(85.0, 400.0);
        detector.advance(170.0, 800.0);
        assert_eq!(detector.reps(), 1);

        detector.reset();
        assert_eq!(detector.phase(), ExercisePhase::Neutral);
        assert_eq!(detector.reps(), 0);
        assert_eq!(detector.combo(), 0);
        assert!(detector.angle_history().is_empty());

        // The hold gate is back at its initial reference point
        let step = detector.advance(85.0, 100.0);
        assert!(!step.phase_changed);
    }

    // ============ Property tests ============

    proptest! {
        #[test]
        fn test_counters_are_monotone(angles in prop::collection::vec(0.0f64..180.0, 0..200)) {
            let mut detector = RepDetector::new(squat_profile());
            let mut last_reps = 0;

            for (i, angle) in angles.iter().enumerate() {
                detector.advance(*angle, i as f64 * 120.0);
                prop_assert!(detector.reps() >= last_reps);
                prop_assert_eq!(detector.combo(), detector.reps());
                last_reps = detector.reps();
            }

            prop_assert!(detector.angle_history().len() <= ANGLE_HISTORY_LIMIT);
        }

        #[test]
        fn test_rep_count_never_exceeds_descents(angles in prop::collection::vec(0.0f64..180.0, 0..200)) {
            // Each counted rep needs its own crossing below the down
            // threshold, so descents bound reps from above
            let mut detector = RepDetector::new(squat_profile());
            let mut descents = 0u32;
            let mut below = false;

            for (i, angle) in angles.iter().enumerate() {
                detector.advance(*angle, i as f64 * 400.0);
                if *angle <= 90.0 && !below {
                    descents += 1;
                    below = true;
                } else if *angle > 90.0 {
                    below = false;
                }
            }

            prop_assert!(detector.reps() <= descents);
        }
    }
}
