//! Built-in Catalogs
//!
//! The stock exercises and bosses. Both are plain data: gameplay code never
//! branches on an id, so extending either catalog is just another entry
//! here (or an entry loaded from JSON, since the types deserialize).

use crate::types::{Boss, Difficulty, ExerciseProfile, JointId, JointPair};

// ==================== Exercises ====================

fn squat() -> ExerciseProfile {
    ExerciseProfile {
        id: "squat".into(),
        name: "Squat".into(),
        description: "Bend at the knees until your thighs are level, then stand back up".into(),
        joints: [
            JointPair::new(JointId::LeftHip, JointId::RightHip),
            JointPair::new(JointId::LeftKnee, JointId::RightKnee),
            JointPair::new(JointId::LeftAnkle, JointId::RightAnkle),
        ],
        down_angle: 90.0,
        up_angle: 160.0,
        hold_duration: 300.0,
    }
}

fn pushup() -> ExerciseProfile {
    ExerciseProfile {
        id: "pushup".into(),
        name: "Push-Up".into(),
        description: "Lower your chest by bending the elbows, then press back up".into(),
        joints: [
            JointPair::new(JointId::LeftShoulder, JointId::RightShoulder),
            JointPair::new(JointId::LeftElbow, JointId::RightElbow),
            JointPair::new(JointId::LeftWrist, JointId::RightWrist),
        ],
        down_angle: 90.0,
        up_angle: 160.0,
        hold_duration: 300.0,
    }
}

/// All built-in exercise profiles
pub fn builtin_exercises() -> Vec<ExerciseProfile> {
    vec![squat(), pushup()]
}

/// Built-in exercise profile by id
pub fn find_exercise(id: &str) -> Option<ExerciseProfile> {
    builtin_exercises().into_iter().find(|e| e.id == id)
}

// ==================== Bosses ====================

/// All built-in bosses, easiest first
pub fn builtin_bosses() -> Vec<Boss> {
    vec![
        Boss {
            id: "couch-potato".into(),
            name: "Couch Potato".into(),
            difficulty: Difficulty::Easy,
            max_hp: 30,
            description: "Barely puts up a fight. A warm-up opponent.".into(),
        },
        Boss {
            id: "snack-goblin".into(),
            name: "Snack Goblin".into(),
            difficulty: Difficulty::Medium,
            max_hp: 60,
            description: "Quick and greedy. Keep a steady pace to wear it down.".into(),
        },
        Boss {
            id: "iron-titan".into(),
            name: "Iron Titan".into(),
            difficulty: Difficulty::Hard,
            max_hp: 100,
            description: "A wall of metal. Only a full workout brings it down.".into(),
        },
    ]
}

/// Built-in boss by id
pub fn find_boss(id: &str) -> Option<Boss> {
    builtin_bosses().into_iter().find(|b| b.id == id)
}

// ==================== Tests ====================
