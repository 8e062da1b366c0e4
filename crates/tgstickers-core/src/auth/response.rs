use std::time::Duration;

use crate::error::{Result, StickersError};

/// Outcome of a sign-in call, as reported by the remote service.
///
/// Gateways map the protocol client's result objects and error codes onto
/// these variants so the state machine can match them exhaustively.
/// Transport failures are not responses; gateways return
/// `StickersError::Connection` for those. Gateways may also report the
/// handshake outcomes as `InvalidCode`, `TwoFactorRequired` or
/// `RateLimited` errors; [`SignInResponse::recover`] folds them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResponse {
    /// A one-time verification code was issued.
    CodeSent,
    /// The session is authorized.
    Authorized,
    /// The verification code was rejected.
    InvalidCode,
    /// The account requires its two-factor password.
    PasswordRequired,
    /// Too many attempts; the remote asks the caller to wait.
    FloodWait { seconds: u64 },
    /// Anything else, described for logging.
    Unexpected(String),
}

impl SignInResponse {
    /// Turns the sign-in errors that are part of the handshake into the
    /// matching response. Other errors pass through.
    pub fn recover(result: Result<SignInResponse>) -> Result<SignInResponse> {
        match result {
            Err(StickersError::InvalidCode) => Ok(SignInResponse::InvalidCode),
            Err(StickersError::TwoFactorRequired) => Ok(SignInResponse::PasswordRequired),
            Err(StickersError::RateLimited { wait }) => Ok(SignInResponse::FloodWait {
                seconds: wait.as_secs(),
            }),
            other => other,
        }
    }

    pub fn flood_wait(&self) -> Option<Duration> {
        match self {
            SignInResponse::FloodWait { seconds } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SignInResponse::Unexpected(description) => description.clone(),
            other => format!("{:?}", other),
        }
    }
}
