// ABOUTME: Natural-language run workout parser producing Garmin workout steps
// ABOUTME: Handles separators, nested repeat groups, intensities, time and distance units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout text parser
//!
//! Accepts descriptions such as
//! `10 min warmup, 5x(800m @ 5k pace, 400m easy), 10 min cooldown` and turns
//! them into a single-segment running [`Workout`].
//!
//! Parts are separated by `,`, `;` or the word `then`, but only outside
//! parentheses, so repeat groups keep their inner steps together.

use chrono::{Local, NaiveDateTime};
use garmin_core::constants::workout::{DEFAULT_NAME_PREFIX, DEFAULT_STEP_SECONDS};
use garmin_core::models::{
    DurationType, ExecutableStep, Intensity, RepeatStep, TargetType, Workout, WorkoutStep,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Keywords checked in order; the first one contained in a step wins
const INTENSITY_KEYWORDS: [(&str, Intensity); 10] = [
    ("warmup", Intensity::Warmup),
    ("warm up", Intensity::Warmup),
    ("cooldown", Intensity::Cooldown),
    ("cool down", Intensity::Cooldown),
    ("easy", Intensity::Active),
    ("recovery", Intensity::Recovery),
    ("interval", Intensity::Active),
    ("tempo", Intensity::Active),
    ("threshold", Intensity::Active),
    ("rest", Intensity::Rest),
];

const CENTIMETERS_PER_METER: f64 = 100.0;
const CENTIMETERS_PER_KILOMETER: f64 = 100_000.0;
const CENTIMETERS_PER_MILE: f64 = 160_934.0;

static REPEAT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*x\s*\(").ok());

static TIME_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(\d+(?:\.\d+)?)\s*(seconds|second|secs|sec|minutes|minute|mins|min|hours|hour|hrs|hr)\b",
    )
    .ok()
});

static DISTANCE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(miles|mile|mi|meters|meter|km|k|m)\b").ok()
});

/// How long a step lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDuration {
    /// Fixed time
    Time {
        /// Seconds
        seconds: u64,
    },
    /// Fixed distance
    Distance {
        /// Centimetres
        centimeters: u64,
    },
}

/// A step recognized in the text, before numbering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedStep {
    /// A single step
    Single {
        /// Intensity
        intensity: Intensity,
        /// Duration
        duration: StepDuration,
    },
    /// A repeat group
    Repeat {
        /// Number of iterations
        iterations: u32,
        /// Steps inside the group
        steps: Vec<Self>,
    },
}

/// Workout text parser
pub struct WorkoutParser;

impl WorkoutParser {
    /// Parse `text` into a workout named `name`, or a timestamped default
    #[must_use]
    pub fn parse(text: &str, name: Option<&str>) -> Workout {
        Self::parse_at(text, name, Local::now().naive_local())
    }

    /// Parse with a fixed clock for the default name
    #[must_use]
    pub fn parse_at(text: &str, name: Option<&str>, now: NaiveDateTime) -> Workout {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| default_name(now), str::to_owned);
        Workout::running(name, build_steps(&Self::parse_steps(text)))
    }

    /// Recognize the steps in `text`
    #[must_use]
    pub fn parse_steps(text: &str) -> Vec<ParsedStep> {
        let lowered = text.to_lowercase();
        split_top_level(&lowered)
            .into_iter()
            .map(parse_part)
            .collect()
    }
}

/// `Run Workout YYYY-MM-DD HH:MM`
#[must_use]
pub fn default_name(now: NaiveDateTime) -> String {
    format!("{DEFAULT_NAME_PREFIX} {}", now.format("%Y-%m-%d %H:%M"))
}

/// Number parsed steps into Garmin steps, 1-based per list
#[must_use]
pub fn build_steps(steps: &[ParsedStep]) -> Vec<WorkoutStep> {
    steps
        .iter()
        .zip(1_u32..)
        .map(|(step, order)| match step {
            ParsedStep::Single {
                intensity,
                duration,
            } => {
                let (duration_type, duration_value) = match *duration {
                    StepDuration::Time { seconds } => (DurationType::Time, seconds),
                    StepDuration::Distance { centimeters } => {
                        (DurationType::Distance, centimeters)
                    }
                };
                WorkoutStep::WorkoutStep(ExecutableStep {
                    step_order: order,
                    intensity: *intensity,
                    duration_type,
                    duration_value,
                    target_type: TargetType::NoTarget,
                })
            }
            ParsedStep::Repeat { iterations, steps } => {
                WorkoutStep::WorkoutRepeatStep(RepeatStep {
                    step_order: order,
                    number_of_iterations: *iterations,
                    workout_steps: build_steps(steps),
                })
            }
        })
        .collect()
}

const fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || !byte.is_ascii()
}

fn word_at(bytes: &[u8], index: usize, word: &[u8]) -> bool {
    let end = index + word.len();
    bytes[index..].starts_with(word)
        && (index == 0 || !is_word_byte(bytes[index - 1]))
        && (end >= bytes.len() || !is_word_byte(bytes[end]))
}

/// Split on separators outside parentheses, dropping empty parts
fn split_top_level(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' | b';' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            b't' if depth == 0 && word_at(bytes, i, b"then") => {
                parts.push(&text[start..i]);
                i += 4;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Contents of the group opened at `open`, up to its matching `)`
///
/// An unclosed group runs to the end of the text.
fn group_contents(text: &str, open: usize) -> &str {
    let mut depth = 0_usize;
    for (i, byte) in text.bytes().enumerate().skip(open) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return &text[open + 1..i];
                }
            }
            _ => {}
        }
    }
    &text[open + 1..]
}

/// A repeat needs at least one iteration and one inner step; anything else
/// is read as a single step
fn parse_part(part: &str) -> ParsedStep {
    parse_repeat(part).unwrap_or_else(|| parse_single(part))
}

fn parse_repeat(part: &str) -> Option<ParsedStep> {
    let captures = REPEAT_PATTERN.as_ref()?.captures(part)?;
    let iterations = captures.get(1)?.as_str().parse::<u32>().ok()?;
    if iterations == 0 {
        return None;
    }

    let inner = group_contents(part, captures.get(0)?.end() - 1);
    let steps = WorkoutParser::parse_steps(inner);
    (!steps.is_empty()).then_some(ParsedStep::Repeat { iterations, steps })
}

fn parse_single(part: &str) -> ParsedStep {
    let intensity = INTENSITY_KEYWORDS
        .iter()
        .find(|(keyword, _)| part.contains(keyword))
        .map_or(Intensity::Active, |(_, intensity)| *intensity);

    let duration = parse_time(part)
        .or_else(|| parse_distance(part))
        .unwrap_or(StepDuration::Time {
            seconds: DEFAULT_STEP_SECONDS,
        });

    ParsedStep::Single {
        intensity,
        duration,
    }
}

fn number_and_unit<'a>(pattern: &LazyLock<Option<Regex>>, text: &'a str) -> Option<(f64, &'a str)> {
    let captures = pattern.as_ref()?.captures(text)?;
    let value = captures.get(1)?.as_str().parse::<f64>().ok()?;
    Some((value, captures.get(2)?.as_str()))
}

// Inputs are non-negative decimals from the patterns above
fn truncate_to_u64(value: f64) -> u64 {
    value as u64
}

fn parse_time(part: &str) -> Option<StepDuration> {
    let (value, unit) = number_and_unit(&TIME_PATTERN, part)?;
    let factor = match unit {
        "hours" | "hour" | "hrs" | "hr" => 3600.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        _ => 1.0,
    };
    Some(StepDuration::Time {
        seconds: truncate_to_u64(value * factor),
    })
}

fn parse_distance(part: &str) -> Option<StepDuration> {
    let (value, unit) = number_and_unit(&DISTANCE_PATTERN, part)?;
    let factor = match unit {
        "km" | "k" => CENTIMETERS_PER_KILOMETER,
        "miles" | "mile" | "mi" => CENTIMETERS_PER_MILE,
        _ => CENTIMETERS_PER_METER,
    };
    Some(StepDuration::Distance {
        centimeters: truncate_to_u64(value * factor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(intensity: Intensity, duration: StepDuration) -> ParsedStep {
        ParsedStep::Single {
            intensity,
            duration,
        }
    }

    #[test]
    fn test_split_ignores_separators_inside_groups() {
        assert_eq!(
            split_top_level("a, 2x(b, c) then d; e"),
            vec!["a", "2x(b, c)", "d", "e"]
        );
    }

    #[test]
    fn test_then_requires_word_boundary() {
        assert_eq!(split_top_level("strengthen legs"), vec!["strengthen legs"]);
        assert_eq!(split_top_level("a then b"), vec!["a", "b"]);
    }

    #[test]
    fn test_group_contents_nested() {
        let text = "3x(2x(a, b), c) tail";
        assert_eq!(group_contents(text, 2), "2x(a, b), c");
    }

    #[test]
    fn test_unclosed_group_runs_to_end() {
        let steps = WorkoutParser::parse_steps("2x(400m, 1 min rest");
        assert_eq!(
            steps,
            vec![ParsedStep::Repeat {
                iterations: 2,
                steps: vec![
                    single(Intensity::Active, StepDuration::Distance { centimeters: 40_000 }),
                    single(Intensity::Rest, StepDuration::Time { seconds: 60 }),
                ],
            }]
        );
    }

    #[test]
    fn test_degenerate_repeats_become_single_steps() {
        assert_eq!(
            WorkoutParser::parse_steps("3x(), 0x(400m), 2x( , )"),
            vec![
                single(Intensity::Active, StepDuration::Time { seconds: DEFAULT_STEP_SECONDS }),
                single(Intensity::Active, StepDuration::Distance { centimeters: 40_000 }),
                single(Intensity::Active, StepDuration::Time { seconds: DEFAULT_STEP_SECONDS }),
            ]
        );
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_time("90 sec"), Some(StepDuration::Time { seconds: 90 }));
        assert_eq!(parse_time("1.5 hours"), Some(StepDuration::Time { seconds: 5400 }));
        assert_eq!(parse_time("2.5 mins"), Some(StepDuration::Time { seconds: 150 }));
        assert_eq!(
            parse_distance("3 miles"),
            Some(StepDuration::Distance { centimeters: 482_802 })
        );
        assert_eq!(
            parse_distance("5k"),
            Some(StepDuration::Distance { centimeters: 500_000 })
        );
        assert_eq!(parse_distance("tempo"), None);
    }

    #[test]
    fn test_default_name_format() {
        let now = NaiveDateTime::parse_from_str("2025-03-04 06:07", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(default_name(now), "Run Workout 2025-03-04 06:07");
    }
}
