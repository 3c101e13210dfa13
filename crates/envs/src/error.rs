use thiserror::Error;

/// Contract violations raised by the environments and their constructors.
///
/// None of these are produced by normal simulation events: fault injection and
/// obstacle recycling are ordinary transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("action {action} is outside the discrete action space of size {action_size}")]
    InvalidAction { action: usize, action_size: usize },
    #[error("episode already finished, call reset before stepping again")]
    EpisodeFinished,
    #[error("unknown persona `{0}`, expected `explorer` or `survivor`")]
    UnknownPersona(String),
    #[error("unknown app `{0}`, expected `flappy` or `web`")]
    UnknownApp(String),
}
