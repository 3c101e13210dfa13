//! Multi-page web workflow with randomized fault injection.
//!
//! The agent has to log in and then save its profile:
//! `login -> profile -> done`. Clicking login, saving the profile and random
//! clicks may fail at random, which raises the error flag instead of moving
//! to the next page. Resetting the form always returns to the login page.

use fastrand::Rng;
use serde::Serialize;
use std::collections::HashSet;

use crate::env::{Bounds, Env, Snapshot, StepInfo, Transition};
use crate::error::EnvError;
use crate::persona::{Persona, WorkflowSignals};

pub const ACTION_SIZE: usize = 7;
pub const OBS_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Login,
    Profile,
    Done,
}

impl Page {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Profile => "profile",
            Page::Done => "done",
        }
    }

    #[must_use]
    pub const fn one_hot(self) -> [f32; 3] {
        match self {
            Page::Login => [1.0, 0.0, 0.0],
            Page::Profile => [0.0, 1.0, 0.0],
            Page::Done => [0.0, 0.0, 1.0],
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete UI actions. Only `ClickLogin`, `SaveProfile`, `RandomClick` and
/// `ResetForm` change state; the typing actions exist for the agent's benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    TypeUsername,
    TypePassword,
    ClickLogin,
    FillProfile,
    SaveProfile,
    RandomClick,
    ResetForm,
}

impl UiAction {
    #[must_use]
    pub const fn from_index(action: usize) -> Option<Self> {
        Some(match action {
            0 => UiAction::TypeUsername,
            1 => UiAction::TypePassword,
            2 => UiAction::ClickLogin,
            3 => UiAction::FillProfile,
            4 => UiAction::SaveProfile,
            5 => UiAction::RandomClick,
            6 => UiAction::ResetForm,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug)]
pub struct WebFlowConfig {
    /// Probability that clicking login fails
    pub login_fault_rate: f64,
    /// Probability that saving the profile fails
    pub save_fault_rate: f64,
    /// Probability that a random click raises an error
    pub random_click_fault_rate: f64,
    /// Constant stand-in for the form state in the observation
    pub form_fill_level: f32,
    pub max_steps: u32,
}

impl Default for WebFlowConfig {
    fn default() -> Self {
        Self {
            login_fault_rate: 0.12,
            save_fault_rate: 0.10,
            random_click_fault_rate: 0.20,
            form_fill_level: 0.4,
            max_steps: 50,
        }
    }
}

pub struct WebFlowEnv {
    config: WebFlowConfig,
    persona: Persona,
    rng: Rng,
    page: Page,
    has_error: bool,
    visited: HashSet<Page>,
    last_action: usize,
    ticks: u32,
    finished: bool,
}

impl WebFlowEnv {
    #[must_use]
    pub fn new(persona: Persona, seed: Option<u64>) -> Self {
        Self::with_config(WebFlowConfig::default(), persona, seed)
    }

    #[must_use]
    pub fn with_config(config: WebFlowConfig, persona: Persona, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(Rng::new, Rng::with_seed);
        let mut env = Self {
            config,
            persona,
            rng,
            page: Page::Login,
            has_error: false,
            visited: HashSet::new(),
            last_action: 0,
            ticks: 0,
            finished: false,
        };
        env.reset(None);
        env
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    #[must_use]
    pub fn visited_pages(&self) -> &HashSet<Page> {
        &self.visited
    }

    #[must_use]
    pub fn persona(&self) -> Persona {
        self.persona
    }

    #[must_use]
    pub fn config(&self) -> &WebFlowConfig {
        &self.config
    }

    /// Draws a fresh uniform sample and reports whether the fault fires.
    fn fault(&self, rate: f64) -> bool {
        self.rng.f64() < rate
    }

    /// Attempts a page transition guarded by a fault roll.
    fn try_advance(&mut self, next: Page, fault_rate: f64) {
        if self.fault(fault_rate) {
            self.has_error = true;
            tracing::debug!(page = %self.page, "transition fault injected");
        } else {
            self.page = next;
            self.has_error = false;
        }
    }

    fn observation(&self) -> Vec<f32> {
        let mut obs = Vec::with_capacity(OBS_SIZE);
        obs.extend_from_slice(&self.page.one_hot());
        obs.push(if self.has_error { 1.0 } else { 0.0 });
        obs.push(self.config.form_fill_level);
        obs.push(self.last_action as f32 / (ACTION_SIZE - 1) as f32);
        obs
    }
}

impl Env for WebFlowEnv {
    fn reset(&mut self, seed: Option<u64>) -> Vec<f32> {
        if let Some(seed) = seed {
            self.rng.seed(seed);
        }
        self.page = Page::Login;
        self.has_error = false;
        self.visited.clear();
        self.visited.insert(Page::Login);
        self.last_action = 0;
        self.ticks = 0;
        self.finished = false;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Result<Transition, EnvError> {
        let ui = UiAction::from_index(action)
            .ok_or(EnvError::InvalidAction { action, action_size: ACTION_SIZE })?;
        if self.finished {
            return Err(EnvError::EpisodeFinished);
        }

        self.ticks += 1;

        match (self.page, ui) {
            (Page::Login, UiAction::ClickLogin) => {
                self.try_advance(Page::Profile, self.config.login_fault_rate);
            }
            (Page::Profile, UiAction::SaveProfile) => {
                self.try_advance(Page::Done, self.config.save_fault_rate);
            }
            _ => {}
        }

        if ui == UiAction::RandomClick && self.fault(self.config.random_click_fault_rate) {
            self.has_error = true;
            tracing::debug!(page = %self.page, "random click raised an error");
        }

        // Applied last so it overrides whatever happened above.
        if ui == UiAction::ResetForm {
            self.page = Page::Login;
            self.has_error = false;
        }

        let newly_visited = self.persona.tracks_visits() && self.visited.insert(self.page);
        let reward = self.persona.workflow_reward(WorkflowSignals {
            page: self.page,
            has_error: self.has_error,
            newly_visited,
        });

        let terminated = self.page == Page::Done;
        let truncated = self.ticks >= self.config.max_steps;
        self.last_action = action;
        self.finished = terminated || truncated;

        if terminated {
            tracing::debug!(ticks = self.ticks, "workflow completed");
        }

        Ok(Transition {
            obs: self.observation(),
            reward,
            terminated,
            truncated,
            info: StepInfo::default(),
        })
    }

    fn obs_size(&self) -> usize {
        OBS_SIZE
    }

    fn action_size(&self) -> usize {
        ACTION_SIZE
    }

    fn observation_bounds(&self) -> Bounds {
        Bounds {
            low: vec![0.0; OBS_SIZE],
            high: vec![1.0; OBS_SIZE],
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::WebFlow {
            ticks: self.ticks,
            page: self.page,
            has_error: self.has_error,
        }
    }
}
