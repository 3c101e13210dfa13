use serde::Serialize;

use crate::error::EnvError;
use crate::web_flow::Page;

/// Why an obstacle flight episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathReason {
    Ground,
    Ceiling,
    Pipe,
}

impl DeathReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DeathReason::Ground => "ground",
            DeathReason::Ceiling => "ceiling",
            DeathReason::Pipe => "pipe",
        }
    }
}

impl std::fmt::Display for DeathReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic side channel of a transition. Not meant to be fed to the agent.
///
/// The workflow environment always leaves this empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInfo {
    pub death_reason: Option<DeathReason>,
}

/// Result of advancing an environment by one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub obs: Vec<f32>,
    pub reward: f64,
    /// A natural end state was reached (collision, `done` page).
    pub terminated: bool,
    /// The tick limit was reached.
    pub truncated: bool,
    pub info: StepInfo,
}

impl Transition {
    /// Whether the episode is over for either reason.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Declared per-component observation bounds. Only descriptive.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub low: Vec<f32>,
    pub high: Vec<f32>,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, obs: &[f32]) -> bool {
        obs.len() == self.low.len()
            && obs
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }
}

/// App-specific view of the environment state, read by episode drivers when
/// recording outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    Flappy {
        ticks: u32,
        pipes_passed: u32,
        death_reason: Option<DeathReason>,
    },
    WebFlow {
        ticks: u32,
        page: Page,
        has_error: bool,
    },
}

impl Snapshot {
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        match *self {
            Snapshot::Flappy { ticks, .. } | Snapshot::WebFlow { ticks, .. } => ticks,
        }
    }
}

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym, this trait defines the core
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one discrete action and returns the new observation vector, a
/// persona-shaped reward, and whether the episode terminated or was truncated.
///
/// Implementations own their random source, so two instances never share
/// state and may live on different threads.
///
/// [`step`]: Env::step
pub trait Env {
    /// Reset to the starting state and return the initial observation.
    ///
    /// `Some(seed)` re-seeds the instance generator so the episode is
    /// reproducible; `None` keeps drawing from the current stream.
    fn reset(&mut self, seed: Option<u64>) -> Vec<f32>;

    /// Advance the environment by one tick.
    ///
    /// # Errors
    ///
    /// [`EnvError::InvalidAction`] when `action >= action_size()` and
    /// [`EnvError::EpisodeFinished`] when the previous tick already ended the
    /// episode. In both cases the state is left untouched.
    fn step(&mut self, action: usize) -> Result<Transition, EnvError>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;

    fn observation_bounds(&self) -> Bounds;

    fn snapshot(&self) -> Snapshot;
}

impl<E: Env + ?Sized> Env for Box<E> {
    fn reset(&mut self, seed: Option<u64>) -> Vec<f32> {
        (**self).reset(seed)
    }

    fn step(&mut self, action: usize) -> Result<Transition, EnvError> {
        (**self).step(action)
    }

    fn obs_size(&self) -> usize {
        (**self).obs_size()
    }

    fn action_size(&self) -> usize {
        (**self).action_size()
    }

    fn observation_bounds(&self) -> Bounds {
        (**self).observation_bounds()
    }

    fn snapshot(&self) -> Snapshot {
        (**self).snapshot()
    }
}
