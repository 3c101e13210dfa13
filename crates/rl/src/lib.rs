#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Episode Driver
//!
//! Drives the [`envs`] environments from the outside: a [`Policy`] picks
//! actions, [`run_episode`] plays an episode to its end, and [`evaluate`]
//! repeats that for a whole evaluation run while recording outcomes.
//!
//! Nothing here learns. Training belongs to whatever library implements
//! [`Policy`] for a real agent.

pub mod episode;
pub mod evaluate;
pub mod policy;

pub use episode::{run_episode, EpisodeOutcome, OutcomeDetail, Rollout, TerminalCause};
pub use evaluate::{evaluate, EvalConfig, EvalReport, JsonLinesRecorder, Summary};
pub use policy::{FlapHeuristic, Policy, PolicyKind, RandomPolicy, WorkflowScript};
