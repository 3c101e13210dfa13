//! Side-scrolling obstacle avoidance environment.
//!
//! A bird falls under gravity and may flap to get an upward impulse. A single
//! pipe with a vertical gap scrolls towards the bird and is recycled with a
//! fresh gap position once it has passed. Flying into the ground, the
//! ceiling, or the solid part of the pipe ends the episode.
//!
//! Actions: `0` do nothing, `1` flap.

use fastrand::Rng;

use crate::env::{Bounds, DeathReason, Env, Snapshot, StepInfo, Transition};
use crate::error::EnvError;
use crate::persona::Persona;

pub const ACTION_SIZE: usize = 2;
pub const OBS_SIZE: usize = 4;

/// Physical constants of the obstacle course.
#[derive(Clone, Debug)]
pub struct FlappyConfig {
    /// Velocity added on every tick without a flap
    pub gravity: f32,
    /// Velocity assigned (not added) on a flap
    pub flap_velocity: f32,
    /// Symmetric velocity clamp
    pub max_speed: f32,
    pub start_y: f32,
    /// World height; the ground is at 0
    pub world_height: f32,
    /// Fixed horizontal position of the bird
    pub bird_x: f32,
    pub pipe_width: f32,
    pub pipe_speed: f32,
    /// Horizontal distance of the first pipe after reset
    pub pipe_spawn_x: f32,
    /// Horizontal distance of a recycled pipe
    pub pipe_recycle_x: f32,
    /// Half height of the passable gap
    pub gap_half_height: f32,
    /// Inclusive range the gap center is drawn from
    pub gap_center_min: u32,
    pub gap_center_max: u32,
    /// Tick limit after which the episode is truncated
    pub max_steps: u32,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            flap_velocity: -6.5,
            max_speed: 12.0,
            start_y: 100.0,
            world_height: 200.0,
            bird_x: 20.0,
            pipe_width: 20.0,
            pipe_speed: 2.0,
            pipe_spawn_x: 200.0,
            pipe_recycle_x: 70.0,
            gap_half_height: 40.0,
            gap_center_min: 40,
            gap_center_max: 160,
            max_steps: 500,
        }
    }
}

/// Mutable per-episode state of [`FlappyEnv`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlappyState {
    pub position_y: f32,
    pub velocity: f32,
    pub gap_center: f32,
    pub pipe_x: f32,
    pub ticks: u32,
    pub pipes_passed: u32,
    pub last_action: usize,
}

pub struct FlappyEnv {
    config: FlappyConfig,
    persona: Persona,
    rng: Rng,
    state: FlappyState,
    death_reason: Option<DeathReason>,
    finished: bool,
}

impl FlappyEnv {
    /// Creates a reset environment with default physics.
    ///
    /// `seed` makes the first episode reproducible; later episodes continue the
    /// same stream unless [`Env::reset`] is given a new seed.
    #[must_use]
    pub fn new(persona: Persona, seed: Option<u64>) -> Self {
        Self::with_config(FlappyConfig::default(), persona, seed)
    }

    #[must_use]
    pub fn with_config(config: FlappyConfig, persona: Persona, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(Rng::new, Rng::with_seed);
        let mut env = Self {
            config,
            persona,
            rng,
            state: FlappyState::default(),
            death_reason: None,
            finished: false,
        };
        env.reset(None);
        env
    }

    #[must_use]
    pub fn state(&self) -> &FlappyState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &FlappyConfig {
        &self.config
    }

    #[must_use]
    pub fn persona(&self) -> Persona {
        self.persona
    }

    fn draw_gap_center(&self) -> f32 {
        self.rng
            .u32(self.config.gap_center_min..=self.config.gap_center_max) as f32
    }

    fn observation(&self) -> Vec<f32> {
        vec![
            self.state.position_y,
            self.state.velocity,
            self.state.gap_center,
            self.state.pipe_x,
        ]
    }

    /// Collision check in priority order: ground, ceiling, pipe.
    fn collision(&self) -> Option<DeathReason> {
        let cfg = &self.config;
        let s = &self.state;
        let hit_ground = s.position_y <= 0.0;
        let hit_ceiling = s.position_y >= cfg.world_height;
        let overlaps_pipe = s.pipe_x < cfg.bird_x && s.pipe_x + cfg.pipe_width > 0.0;
        let in_gap = s.position_y >= s.gap_center - cfg.gap_half_height
            && s.position_y <= s.gap_center + cfg.gap_half_height;

        if hit_ground {
            Some(DeathReason::Ground)
        } else if hit_ceiling {
            Some(DeathReason::Ceiling)
        } else if overlaps_pipe && !in_gap {
            Some(DeathReason::Pipe)
        } else {
            None
        }
    }
}

impl Env for FlappyEnv {
    fn reset(&mut self, seed: Option<u64>) -> Vec<f32> {
        if let Some(seed) = seed {
            self.rng.seed(seed);
        }
        let gap_center = self.draw_gap_center();
        self.state = FlappyState {
            position_y: self.config.start_y,
            velocity: 0.0,
            gap_center,
            pipe_x: self.config.pipe_spawn_x,
            ticks: 0,
            pipes_passed: 0,
            last_action: 0,
        };
        self.death_reason = None;
        self.finished = false;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Result<Transition, EnvError> {
        if action >= ACTION_SIZE {
            return Err(EnvError::InvalidAction { action, action_size: ACTION_SIZE });
        }
        if self.finished {
            return Err(EnvError::EpisodeFinished);
        }

        self.state.ticks += 1;

        if action == 1 {
            self.state.velocity = self.config.flap_velocity;
        } else {
            self.state.velocity += self.config.gravity;
        }
        self.state.velocity = self
            .state
            .velocity
            .clamp(-self.config.max_speed, self.config.max_speed);
        self.state.position_y += self.state.velocity;

        self.state.pipe_x -= self.config.pipe_speed;
        if self.state.pipe_x < -self.config.pipe_width {
            self.state.pipe_x = self.config.pipe_recycle_x;
            self.state.gap_center = self.draw_gap_center();
            self.state.pipes_passed += 1;
            tracing::debug!(
                pipes_passed = self.state.pipes_passed,
                gap_center = self.state.gap_center,
                "pipe recycled"
            );
        }

        let death_reason = self.collision();
        let terminated = death_reason.is_some();
        let reward = self.persona.flappy_reward(self.state.pipes_passed, terminated);
        let truncated = self.state.ticks >= self.config.max_steps;

        self.state.last_action = action;
        self.death_reason = death_reason;
        self.finished = terminated || truncated;

        if let Some(reason) = death_reason {
            tracing::debug!(ticks = self.state.ticks, %reason, "bird crashed");
        }

        Ok(Transition {
            obs: self.observation(),
            reward,
            terminated,
            truncated,
            info: StepInfo { death_reason },
        })
    }

    fn obs_size(&self) -> usize {
        OBS_SIZE
    }

    fn action_size(&self) -> usize {
        ACTION_SIZE
    }

    fn observation_bounds(&self) -> Bounds {
        let h = self.config.world_height;
        let v = self.config.max_speed;
        Bounds {
            low: vec![0.0, -v, 0.0, 0.0],
            high: vec![h, v, h, h],
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Flappy {
            ticks: self.state.ticks,
            pipes_passed: self.state.pipes_passed,
            death_reason: self.death_reason,
        }
    }
}
