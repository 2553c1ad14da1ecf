//! AI difficulty tiers.

use serde::{Deserialize, Serialize};

/// How hard the AI opponent plays.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Mostly random play.
    Easy,
    /// Positional play with occasional random moves.
    Medium,
    /// Positional play without random moves.
    #[default]
    Impossible,
}

impl Difficulty {
    /// Probability of ignoring position and moving at random, once no
    /// immediate win or block exists.
    pub fn random_move_chance(self) -> f64 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Medium => 0.3,
            Difficulty::Impossible => 0.0,
        }
    }
}
