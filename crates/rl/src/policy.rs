//! Non-learning action choosers used to drive the environments.
//!
//! Anything that maps an observation to a discrete action can be plugged into
//! the episode driver; a trained agent would implement [`Policy`] the same way.

use anyhow::{bail, ensure, Error, Result};
use envs::App;
use std::str::FromStr;

/// Chooses the next action from the latest observation.
pub trait Policy {
    fn act(&mut self, obs: &[f32]) -> usize;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn act(&mut self, obs: &[f32]) -> usize {
        (**self).act(obs)
    }
}

/// Uniformly random actions from its own seeded generator.
pub struct RandomPolicy {
    rng: fastrand::Rng,
    action_size: usize,
}

impl RandomPolicy {
    /// # Errors
    ///
    /// Fails if `action_size` is zero.
    pub fn new(action_size: usize, seed: u64) -> Result<Self> {
        ensure!(action_size > 0, "action space must not be empty");
        Ok(Self { rng: fastrand::Rng::with_seed(seed), action_size })
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _obs: &[f32]) -> usize {
        self.rng.usize(0..self.action_size)
    }
}

/// Flaps whenever the bird drifts past a point slightly above the gap center.
///
/// Expects the flappy observation layout `[y, velocity, gap_center, pipe_x]`.
pub struct FlapHeuristic {
    /// Offset from the gap center at which the bird flaps
    pub offset: f32,
}

impl Default for FlapHeuristic {
    fn default() -> Self {
        Self { offset: 20.0 }
    }
}

impl Policy for FlapHeuristic {
    fn act(&mut self, obs: &[f32]) -> usize {
        let (y, gap_center) = (obs[0], obs[2]);
        usize::from(y > gap_center + self.offset)
    }
}

/// Clicks through the workflow: login on the login page, save on the profile
/// page. Failed attempts are simply retried on the next tick.
#[derive(Default)]
pub struct WorkflowScript;

impl Policy for WorkflowScript {
    fn act(&mut self, obs: &[f32]) -> usize {
        if obs[0] > 0.5 {
            2
        } else if obs[1] > 0.5 {
            4
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Random,
    /// [`FlapHeuristic`] or [`WorkflowScript`] depending on the app
    Heuristic,
}

impl PolicyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Heuristic => "heuristic",
        }
    }

    /// # Errors
    ///
    /// Fails if a random policy is requested for an empty action space.
    pub fn build(self, app: App, action_size: usize, seed: u64) -> Result<Box<dyn Policy + Send>> {
        Ok(match (self, app) {
            (PolicyKind::Random, _) => Box::new(RandomPolicy::new(action_size, seed)?),
            (PolicyKind::Heuristic, App::Flappy) => Box::new(FlapHeuristic::default()),
            (PolicyKind::Heuristic, App::WebFlow) => Box::new(WorkflowScript),
        })
    }
}

impl FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(PolicyKind::Random),
            "heuristic" => Ok(PolicyKind::Heuristic),
            other => bail!("unknown policy `{other}`, expected `random` or `heuristic`"),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
