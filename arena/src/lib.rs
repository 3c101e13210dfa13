//! # Arena: persona-shaped environments for RL experiments
//!
//! ## Overview
//!
//! This workspace provides two small simulated applications that generate
//! experience for reinforcement learning agents, and the tooling to play
//! them from the command line.
//!
//! ### The Crates
//!
//! -   **`arena`:** The crate you are currently viewing. It parses the command
//!     line and runs evaluations through [`app::run`].
//! -   **[`envs`]:** The simulation core. The flappy obstacle course, the web
//!     workflow with fault injection, the persona reward functions and the
//!     shared [`envs::Env`] trait live here.
//! -   **[`rl`]:** The episode driver. Policies, episode rollouts, outcome
//!     records and evaluation summaries.
//!
//! Training an agent is out of scope: any learner that implements
//! [`rl::Policy`] can be dropped into the driver.

pub mod app;
pub mod cli;

pub use envs;
pub use rl;
