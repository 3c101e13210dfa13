use clap::Parser;
use envs::{App, Persona};
use rl::{EvalConfig, PolicyKind};
use std::path::PathBuf;

/// Evaluate a policy against one of the simulated apps.
#[derive(Parser, Debug, Clone)]
#[command(name = "arena", version, about)]
pub struct Args {
    /// App to simulate: `flappy` or `web`
    #[arg(long, default_value = "flappy")]
    pub app: App,

    /// Reward persona. Unrecognized names fall back to `explorer`.
    #[arg(long, default_value = "explorer")]
    pub persona: String,

    /// Action chooser: `random` or `heuristic`
    #[arg(long, default_value = "random")]
    pub policy: PolicyKind,

    #[arg(long, default_value_t = 30)]
    pub episodes: usize,

    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Override the app's tick limit
    #[arg(long)]
    pub max_steps: Option<u32>,

    /// Directory for the JSON lines outcome log. Nothing is written without it.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    #[must_use]
    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            app: self.app,
            persona: Persona::from_name_or_default(&self.persona),
            policy: self.policy,
            episodes: self.episodes,
            seed: self.seed,
            max_steps: self.max_steps,
        }
    }
}
