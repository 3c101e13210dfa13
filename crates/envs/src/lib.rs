#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Persona Environments
//!
//! Two small simulations that produce experience for reinforcement learning
//! agents through a Gym-style reset/step contract:
//!
//! -   **Flappy:** [`FlappyEnv`] is a side-scrolling obstacle course. The
//!     bird either flaps or falls, pipes scroll past and are recycled with a
//!     new gap, and any collision ends the episode.
//! -   **Web flow:** [`WebFlowEnv`] is a three page workflow
//!     (`login -> profile -> done`) whose transitions fail at random to mimic
//!     flaky software.
//!
//! Both share the [`Env`] trait and take their reward shaping from a
//! [`Persona`] chosen at construction. Each instance owns a seedable random
//! generator, so seeded episodes are reproducible and instances can run on
//! separate threads.
//!
//! ## Usage
//!
//! ```rust
//! use envs::{Env, FlappyEnv, Persona};
//!
//! let mut env = FlappyEnv::new(Persona::Explorer, Some(7));
//! let obs = env.reset(Some(7));
//! assert_eq!(obs.len(), env.obs_size());
//!
//! let t = env.step(0)?;
//! assert_eq!(t.obs[0], 100.5);
//! # Ok::<(), envs::EnvError>(())
//! ```

pub mod app;
pub mod env;
pub mod error;
pub mod flappy;
pub mod persona;
pub mod web_flow;

pub use app::{make_env, App};
pub use env::{Bounds, DeathReason, Env, Snapshot, StepInfo, Transition};
pub use error::EnvError;
pub use flappy::{FlappyConfig, FlappyEnv, FlappyState};
pub use persona::{Persona, WorkflowSignals};
pub use web_flow::{Page, UiAction, WebFlowConfig, WebFlowEnv};
