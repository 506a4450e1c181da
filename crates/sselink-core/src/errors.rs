/// Typed error hierarchy for stream subscription operations.
/// Configuration errors abort before any connection exists; transport errors
/// surface to the subscriber as an `sse.error` event.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LinkError {
    // Configuration — detected at subscription-build time, never retried
    #[error("no server specified")]
    NoServer,

    // Transport — signaled by the underlying stream, not retried by the manager
    #[error("transport error: {0}")]
    Transport(String),

    // Lifecycle misuse
    #[error("connection already started")]
    AlreadyStarted,
}

impl LinkError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::NoServer)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::NoServer => "no_server",
            Self::Transport(_) => "transport",
            Self::AlreadyStarted => "already_started",
        }
    }
}
