//! Common Types and Constants
//!
//! Shared data structures for pose input and exercise configuration, used
//! across the geometry, detection, and battle modules.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Number of keypoints reported per pose (MoveNet body model)
pub const JOINT_COUNT: usize = 17;

/// Minimum per-joint confidence; joints below this are treated as absent
pub const MIN_JOINT_CONFIDENCE: f64 = 0.5;

/// Trailing moving-average window applied to raw joint angles
pub const SMOOTHING_WINDOW: usize = 5;

/// Maximum number of smoothed angles retained for the overlay trace
pub const ANGLE_HISTORY_LIMIT: usize = 100;

// ==================== Keypoints ====================

/// The 17 MoveNet keypoints, in model output order.
///
/// Serialized names match the model's keypoint labels (`"left_hip"` etc.),
/// so poses coming from the JS side deserialize without remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointId {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointId {
    /// All keypoints in model output order
    pub const ALL: [JointId; JOINT_COUNT] = [
        JointId::Nose,
        JointId::LeftEye,
        JointId::RightEye,
        JointId::LeftEar,
        JointId::RightEar,
        JointId::LeftShoulder,
        JointId::RightShoulder,
        JointId::LeftElbow,
        JointId::RightElbow,
        JointId::LeftWrist,
        JointId::RightWrist,
        JointId::LeftHip,
        JointId::RightHip,
        JointId::LeftKnee,
        JointId::RightKnee,
        JointId::LeftAnkle,
        JointId::RightAnkle,
    ];

    /// Index into the model's keypoint array
    pub fn index(self) -> usize {
        self as usize
    }

    /// Keypoint at the given model index, if in range
    pub fn from_index(index: usize) -> Option<JointId> {
        JointId::ALL.get(index).copied()
    }

    /// The model's label for this keypoint
    pub fn name(self) -> &'static str {
        match self {
            JointId::Nose => "nose",
            JointId::LeftEye => "left_eye",
            JointId::RightEye => "right_eye",
            JointId::LeftEar => "left_ear",
            JointId::RightEar => "right_ear",
            JointId::LeftShoulder => "left_shoulder",
            JointId::RightShoulder => "right_shoulder",
            JointId::LeftElbow => "left_elbow",
            JointId::RightElbow => "right_elbow",
            JointId::LeftWrist => "left_wrist",
            JointId::RightWrist => "right_wrist",
            JointId::LeftHip => "left_hip",
            JointId::RightHip => "right_hip",
            JointId::LeftKnee => "left_knee",
            JointId::RightKnee => "right_knee",
            JointId::LeftAnkle => "left_ankle",
            JointId::RightAnkle => "right_ankle",
        }
    }

    /// Keypoint matching a model label, if known
    pub fn from_name(name: &str) -> Option<JointId> {
        JointId::ALL.iter().copied().find(|id| id.name() == name)
    }
}

/// One detected keypoint: image-space position plus detection confidence
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// Horizontal position (pixels)
    pub x: f64,
    /// Vertical position (pixels)
    pub y: f64,
    /// Detection confidence [0, 1]
    #[serde(default)]
    pub confidence: f64,
}

impl Joint {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, confidence }
    }

    /// Whether the joint is confident enough to use for angle measurement
    pub fn is_usable(&self) -> bool {
        self.confidence >= MIN_JOINT_CONFIDENCE
    }
}

/// One frame's keypoints, indexed by [`JointId`]. Entries may be absent.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    joints: [Option<Joint>; JOINT_COUNT],
}

impl Pose {
    pub fn new() -> Self {
        Self {
            joints: [None; JOINT_COUNT],
        }
    }

    /// Build a pose from a flat `[x, y, confidence] * 17` buffer in model
    /// keypoint order. Returns `None` if the buffer is too short.
    pub fn from_flat(coords: &[f64]) -> Option<Pose> {
        if coords.len() < JOINT_COUNT * 3 {
            return None;
        }

        let mut pose = Pose::new();
        for (i, id) in JointId::ALL.iter().enumerate() {
            let base = i * 3;
            pose.set(*id, Joint::new(coords[base], coords[base + 1], coords[base + 2]));
        }
        Some(pose)
    }

    pub fn set(&mut self, id: JointId, joint: Joint) {
        self.joints[id.index()] = Some(joint);
    }

    /// The joint at `id`, regardless of confidence
    pub fn get(&self, id: JointId) -> Option<Joint> {
        self.joints[id.index()]
    }

    /// The joint at `id` only when present and above the confidence floor
    pub fn usable(&self, id: JointId) -> Option<Joint> {
        self.get(id).filter(Joint::is_usable)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Exercise Configuration ====================

/// Position class of the tracked limb within one repetition cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExercisePhase {
    Neutral,
    Down,
    Up,
}

impl ExercisePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ExercisePhase::Neutral => "neutral",
            ExercisePhase::Down => "down",
            ExercisePhase::Up => "up",
        }
    }
}

/// Left/right alternatives for one vertex of the measured angle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointPair {
    pub left: JointId,
    pub right: JointId,
}

impl JointPair {
    pub const fn new(left: JointId, right: JointId) -> Self {
        Self { left, right }
    }
}

/// Detection configuration for one exercise.
///
/// The profile is pure data: the three joint pairs define the measured
/// angle (middle entry is the vertex) and the thresholds define the
/// repetition state machine. Adding an exercise is a catalog entry, not a
/// code change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Angle triple `(a, b, c)`; the angle is measured at `b`
    pub joints: [JointPair; 3],
    /// Entering the bottom of the movement requires angle <= this (degrees)
    pub down_angle: f64,
    /// Completing a repetition requires angle >= this (degrees)
    pub up_angle: f64,
    /// Minimum dwell between phase transitions (milliseconds)
    pub hold_duration: f64,
}

// ==================== Bosses ====================

/// Boss difficulty tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// An opponent: repetitions deal damage until `max_hp` is exhausted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    #[serde(rename = "maxHP")]
    pub max_hp: u32,
    pub description: String,
}

// ==================== Tests ====================
