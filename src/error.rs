use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type InteractionResult<T> = Result<T, InteractionError>;

/// Invalid or contradictory configuration.
///
/// Raised when a handler is constructed, reconfigured or registered. Never
/// produced while an event is being dispatched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {handler} config: {reason}")]
    InvalidConfig {
        handler: &'static str,
        reason: String,
    },

    #[error("interaction id must not be empty")]
    EmptyId,

    #[error("interaction with id `{0}` is already registered")]
    DuplicateId(String),

    #[error("no interaction with id `{0}` is registered")]
    UnknownId(String),

    #[error("listener with id `{0}` is already registered")]
    DuplicateListener(String),

    #[error("interaction `{id}` is a {actual} handler, cannot apply {expected} config")]
    KindMismatch {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(handler: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            handler,
            reason: reason.into(),
        }
    }
}

/// Failure inside one handler's event or frame callback.
///
/// The surface isolates it: the error goes to the error sink and the remaining
/// handlers still see the event.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("interaction `{handler_id}` failed on {event}: {reason}")]
pub struct DispatchError {
    pub handler_id: String,
    pub event: &'static str,
    pub reason: String,
}

impl DispatchError {
    pub(crate) fn new(
        handler_id: impl Into<String>,
        event: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            handler_id: handler_id.into(),
            event,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
