//! # Persona Rewards
//!
//! A persona is a named reward shaping selected when an environment is built.
//! It never influences state transitions, only the scalar reward returned by
//! `step`. Every method here is a pure function of the signals passed in.

use serde::Serialize;
use std::str::FromStr;

use crate::error::EnvError;
use crate::web_flow::Page;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Small per-tick bonus, rewards novelty, forgiving on failure.
    #[default]
    Explorer,
    /// Large per-tick bonus, punishes failure hard.
    Survivor,
}

/// Signals the workflow environment exposes to the reward function, taken
/// after the transition of the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowSignals {
    pub page: Page,
    pub has_error: bool,
    /// First tick of the episode on which `page` was reached. Only tracked
    /// for [`Persona::Explorer`]; always `false` otherwise.
    pub newly_visited: bool,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Explorer, Persona::Survivor];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Persona::Explorer => "explorer",
            Persona::Survivor => "survivor",
        }
    }

    /// Parse a persona name, falling back to [`Persona::Explorer`] for
    /// anything unrecognized. Names are matched exactly, so `"Survivor"` also
    /// falls back.
    ///
    /// This mirrors how the training scripts have always treated persona
    /// names. Use [`str::parse`] to reject unknown names instead.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(persona = name, "unrecognized persona, using explorer rewards");
            Persona::default()
        })
    }

    /// Whether the persona keeps track of visited pages in the workflow domain.
    #[must_use]
    pub const fn tracks_visits(self) -> bool {
        matches!(self, Persona::Explorer)
    }

    /// Per-tick reward in the obstacle flight domain.
    #[must_use]
    pub fn flappy_reward(self, obstacles_passed: u32, terminated: bool) -> f64 {
        let (alive_bonus, per_pipe, crash_penalty) = match self {
            Persona::Explorer => (0.2, 1.0, 5.0),
            Persona::Survivor => (0.5, 2.0, 10.0),
        };
        let mut reward = alive_bonus + per_pipe * f64::from(obstacles_passed);
        if terminated {
            reward -= crash_penalty;
        }
        reward
    }

    /// Per-tick reward in the workflow domain.
    #[must_use]
    pub fn workflow_reward(self, signals: WorkflowSignals) -> f64 {
        let done = signals.page == Page::Done;
        let mut reward = 0.0;
        match self {
            Persona::Explorer => {
                if signals.newly_visited {
                    reward += 3.0;
                }
                if signals.has_error {
                    reward -= 2.0;
                }
                if done {
                    reward += 10.0;
                }
            }
            Persona::Survivor => {
                if !signals.has_error && !done {
                    reward += 1.0;
                }
                if signals.has_error {
                    reward -= 8.0;
                }
                if done {
                    reward += 5.0;
                }
            }
        }
        reward
    }
}

impl FromStr for Persona {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "explorer" => Ok(Persona::Explorer),
            "survivor" => Ok(Persona::Survivor),
            _ => Err(EnvError::UnknownPersona(s.to_owned())),
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
