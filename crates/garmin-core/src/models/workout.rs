// ABOUTME: Garmin Connect workout wire format (segments, steps, repeat groups)
// ABOUTME: Serializes to the camelCase JSON accepted by the workout service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::workout::RUNNING_SPORT_TYPE_ID;
use serde::{Deserialize, Serialize};

/// Reference to a Garmin sport type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportTypeRef {
    /// Garmin sport type id (1 = running)
    pub sport_type_id: u32,
}

impl SportTypeRef {
    /// Running
    #[must_use]
    pub const fn running() -> Self {
        Self {
            sport_type_id: RUNNING_SPORT_TYPE_ID,
        }
    }
}

/// Step intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intensity {
    /// Warm-up
    Warmup,
    /// Cool-down
    Cooldown,
    /// Work interval
    Active,
    /// Recovery jog
    Recovery,
    /// Standing rest
    Rest,
}

/// How a step ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationType {
    /// `durationValue` is seconds
    Time,
    /// `durationValue` is centimetres
    Distance,
}

/// Step target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    /// Open target
    NoTarget,
}

/// A single executable step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableStep {
    /// 1-based position within the enclosing list
    pub step_order: u32,
    /// Intensity
    pub intensity: Intensity,
    /// Duration kind
    pub duration_type: DurationType,
    /// Seconds or centimetres depending on `duration_type`
    pub duration_value: u64,
    /// Target kind
    pub target_type: TargetType,
}

/// A group of steps repeated `number_of_iterations` times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatStep {
    /// 1-based position within the enclosing list
    pub step_order: u32,
    /// Repeat count
    pub number_of_iterations: u32,
    /// Steps inside the group, numbered from 1
    pub workout_steps: Vec<WorkoutStep>,
}

/// A workout step, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkoutStep {
    /// `"type": "WorkoutStep"`
    WorkoutStep(ExecutableStep),
    /// `"type": "WorkoutRepeatStep"`
    WorkoutRepeatStep(RepeatStep),
}

impl WorkoutStep {
    /// Position of this step within its list
    #[must_use]
    pub const fn step_order(&self) -> u32 {
        match self {
            Self::WorkoutStep(step) => step.step_order,
            Self::WorkoutRepeatStep(step) => step.step_order,
        }
    }
}

/// Workout segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSegment {
    /// 1-based segment position
    pub segment_order: u32,
    /// Segment sport
    pub sport_type: SportTypeRef,
    /// Steps
    pub workout_steps: Vec<WorkoutStep>,
}

/// A complete Garmin workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Name shown in Garmin Connect
    pub workout_name: String,
    /// Workout sport
    pub sport_type: SportTypeRef,
    /// Segments (the parser always produces exactly one)
    pub workout_segments: Vec<WorkoutSegment>,
}

impl Workout {
    /// A running workout with one segment holding `steps`
    #[must_use]
    pub fn running(name: impl Into<String>, steps: Vec<WorkoutStep>) -> Self {
        Self {
            workout_name: name.into(),
            sport_type: SportTypeRef::running(),
            workout_segments: vec![WorkoutSegment {
                segment_order: 1,
                sport_type: SportTypeRef::running(),
                workout_steps: steps,
            }],
        }
    }

    /// Steps of the first segment
    #[must_use]
    pub fn steps(&self) -> &[WorkoutStep] {
        self.workout_segments
            .first()
            .map_or(&[], |segment| segment.workout_steps.as_slice())
    }
}
