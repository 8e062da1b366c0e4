use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the client currently is in the sign-in handshake.
///
/// Only `SignedIn` allows API calls other than the sign-in ones.
/// `RateLimited` is terminal for the session: the remote imposed a flood
/// wait (usually around a day) and nothing can be retried until it passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignInState {
    /// No connection has been opened yet.
    #[default]
    Uninitialized,
    /// Connected to the remote service, user not signed in.
    ConnectedUnauthenticated,
    /// A verification code was sent to the user's other devices.
    AwaitingVerificationCode,
    /// The account needs its two-factor password.
    AwaitingTwoFactor,
    /// Signed in and ready to make API calls.
    SignedIn,
    /// Too many sign-in attempts.
    RateLimited,
}

impl SignInState {
    pub fn is_signed_in(self) -> bool {
        self == SignInState::SignedIn
    }

    /// True for states no sign-in operation can leave.
    pub fn is_terminal(self) -> bool {
        matches!(self, SignInState::SignedIn | SignInState::RateLimited)
    }
}

impl fmt::Display for SignInState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignInState::Uninitialized => "Uninitialized",
            SignInState::ConnectedUnauthenticated => "ConnectedUnauthenticated",
            SignInState::AwaitingVerificationCode => "AwaitingVerificationCode",
            SignInState::AwaitingTwoFactor => "AwaitingTwoFactor",
            SignInState::SignedIn => "SignedIn",
            SignInState::RateLimited => "RateLimited",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uninitialized() {
        assert_eq!(SignInState::default(), SignInState::Uninitialized);
    }

    #[test]
    fn test_terminal_states() {
        assert!(SignInState::SignedIn.is_terminal());
        assert!(SignInState::RateLimited.is_terminal());
        assert!(!SignInState::AwaitingTwoFactor.is_terminal());
        assert!(!SignInState::ConnectedUnauthenticated.is_terminal());
    }
}
