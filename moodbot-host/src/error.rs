use moodbot_messages::{Token, VerdictError};
use thiserror::Error;

/// Error type for serial line links
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("No response within the read timeout")]
    Timeout,
    #[error("Serial transport failed: {0}")]
    Transport(#[from] std::io::Error),
}

/// Why the validation link could not confirm a token
#[derive(Error, Debug)]
pub enum Unconfirmed {
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Verdict(#[from] VerdictError),
}

/// Faults recovered inside a tick. None of these end the process.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("Motor link timed out, no telemetry this tick")]
    LinkTimeout,
    #[error("Motor link transport fault: {0}")]
    LinkTransportFault(std::io::Error),
    #[error("Malformed telemetry line")]
    MalformedTelemetry,
    #[error("Validation link unavailable: {0}")]
    ValidationLinkUnavailable(#[from] Unconfirmed),
    #[error("Token {0} was already used")]
    InvalidToken(Token),
}

impl From<LinkError> for Fault {
    fn from(value: LinkError) -> Self {
        match value {
            LinkError::Timeout => Self::LinkTimeout,
            LinkError::Transport(err) => Self::LinkTransportFault(err),
        }
    }
}
