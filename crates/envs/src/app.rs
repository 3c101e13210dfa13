use serde::Serialize;
use std::str::FromStr;

use crate::env::Env;
use crate::error::EnvError;
use crate::flappy::FlappyEnv;
use crate::persona::Persona;
use crate::web_flow::WebFlowEnv;

/// The simulated applications an agent can be evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum App {
    #[serde(rename = "flappy")]
    Flappy,
    #[serde(rename = "web")]
    WebFlow,
}

impl App {
    pub const ALL: [App; 2] = [App::Flappy, App::WebFlow];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            App::Flappy => "flappy",
            App::WebFlow => "web",
        }
    }
}

impl FromStr for App {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flappy" => Ok(App::Flappy),
            "web" => Ok(App::WebFlow),
            _ => Err(EnvError::UnknownApp(s.to_owned())),
        }
    }
}

impl std::fmt::Display for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a freshly reset environment for `app` with default constants.
#[must_use]
pub fn make_env(app: App, persona: Persona, seed: Option<u64>) -> Box<dyn Env + Send> {
    match app {
        App::Flappy => Box::new(FlappyEnv::new(persona, seed)),
        App::WebFlow => Box::new(WebFlowEnv::new(persona, seed)),
    }
}
