use thiserror::Error;

#[derive(Error, Debug)]
pub enum TracerError {
    /// Network or timeout failure talking to a gateway.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The gateway answered but signalled failure (error body, missing result, bad JSON).
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The receiving side of an event channel is gone; the producer should stop.
    #[error("Event stream closed")]
    StreamClosed,
}

impl TracerError {
    /// Transport failures self-heal on the next cycle; everything else is worth a louder log.
    pub fn is_transient(&self) -> bool {
        matches!(self, TracerError::Transport(_))
    }
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("No arguments")]
    NoArguments,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Malformed action payload: {0}")]
    MalformedAction(String),
}

pub type Result<T> = std::result::Result<T, TracerError>;
