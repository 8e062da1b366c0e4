//! The sign-in state machine.

use std::sync::Arc;

use super::{SignInResponse, SignInSession, SignInState, normalize_phone};
use crate::error::{Result, StickersError};
use crate::gateway::TelegramGateway;

/// Drives the multi-step sign-in handshake against a [`TelegramGateway`].
///
/// The machine holds no state of its own; every operation takes the
/// [`SignInSession`] it advances. Operations are only defined for their
/// source state. Invoked from any other state they fail with
/// `StickersError::ProtocolState` before touching the gateway.
///
/// Responses that are part of the handshake (invalid code, password
/// required, flood wait) become state transitions and are returned as
/// `Ok(new_state)`. Unexpected responses and transport errors are returned
/// as errors and leave the state unchanged.
#[derive(Clone)]
pub struct SignInMachine {
    gateway: Arc<dyn TelegramGateway>,
}

impl SignInMachine {
    pub fn new(gateway: Arc<dyn TelegramGateway>) -> Self {
        Self { gateway }
    }

    fn require(
        session: &SignInSession,
        operation: &'static str,
        expected: SignInState,
    ) -> Result<()> {
        if session.state() == expected {
            Ok(())
        } else {
            tracing::warn!(
                "Rejected '{}' in state {} (expected {})",
                operation,
                session.state(),
                expected
            );
            Err(StickersError::ProtocolState {
                operation,
                state: session.state(),
            })
        }
    }

    /// `Uninitialized -> ConnectedUnauthenticated`.
    pub async fn connect(&self, session: &mut SignInSession) -> Result<SignInState> {
        Self::require(session, "connect", SignInState::Uninitialized)?;

        tracing::info!("Connecting to the remote service");
        self.gateway.connect().await?;
        session.set_state(SignInState::ConnectedUnauthenticated);
        Ok(session.state())
    }

    /// Reuses an authorized session kept by the protocol client.
    ///
    /// Moves to `SignedIn` when the remote reports the session authorized,
    /// otherwise leaves the state unchanged.
    pub async fn resume(&self, session: &mut SignInSession) -> Result<SignInState> {
        Self::require(session, "resume", SignInState::ConnectedUnauthenticated)?;

        if self.gateway.is_authorized().await? {
            tracing::info!("Existing session is already authorized, no need to sign in again");
            session.set_state(SignInState::SignedIn);
        }
        Ok(session.state())
    }

    /// Submits the phone number.
    ///
    /// `CodeSent -> AwaitingVerificationCode`, `Authorized -> SignedIn`,
    /// `FloodWait -> RateLimited`. The phone is only recorded on the session
    /// once the remote accepted it.
    pub async fn submit_phone(&self, session: &mut SignInSession, phone: &str) -> Result<SignInState> {
        Self::require(session, "submit_phone", SignInState::ConnectedUnauthenticated)?;
        let phone = normalize_phone(phone)?;

        tracing::info!("Attempting authentication with phone number");
        tracing::debug!("phone: {}", phone);
        let response = SignInResponse::recover(self.gateway.sign_in_phone(&phone).await)?;

        match &response {
            SignInResponse::CodeSent => {
                tracing::info!("Verification code sent to the user's account");
                session.set_phone(phone);
                session.set_state(SignInState::AwaitingVerificationCode);
            }
            SignInResponse::Authorized => {
                tracing::info!("Sign in successful, user is authorized");
                session.set_phone(phone);
                session.set_state(SignInState::SignedIn);
            }
            SignInResponse::FloodWait { .. } => {
                session.set_phone(phone);
                Self::rate_limit(session, &response);
            }
            other => return Err(Self::unexpected("submit_phone", other)),
        }
        Ok(session.state())
    }

    /// Submits the verification code.
    ///
    /// `Authorized -> SignedIn`, `InvalidCode` keeps `AwaitingVerificationCode`,
    /// `PasswordRequired -> AwaitingTwoFactor`, `FloodWait -> RateLimited`.
    pub async fn submit_code(
        &self,
        session: &mut SignInSession,
        phone: &str,
        code: &str,
    ) -> Result<SignInState> {
        Self::require(session, "submit_code", SignInState::AwaitingVerificationCode)?;
        let phone = normalize_phone(phone)?;

        tracing::info!("Attempting authentication with phone number and code");
        let response = SignInResponse::recover(self.gateway.sign_in_code(&phone, code).await)?;
        session.set_code(code.to_string());

        match &response {
            SignInResponse::Authorized => {
                tracing::info!("Sign in successful, user is authorized");
                session.set_state(SignInState::SignedIn);
            }
            SignInResponse::InvalidCode => {
                tracing::error!("The verification code entered was invalid. Sign in unsuccessful");
                session.record_rejected_code();
                session.set_state(SignInState::AwaitingVerificationCode);
            }
            SignInResponse::PasswordRequired => {
                tracing::info!("User needs Two Factor Authentication Password to Sign In");
                session.set_state(SignInState::AwaitingTwoFactor);
            }
            SignInResponse::FloodWait { .. } => Self::rate_limit(session, &response),
            other => return Err(Self::unexpected("submit_code", other)),
        }
        Ok(session.state())
    }

    /// Submits the two-factor password. Only `Authorized` is accepted.
    pub async fn submit_two_factor(
        &self,
        session: &mut SignInSession,
        password: &str,
    ) -> Result<SignInState> {
        Self::require(session, "submit_two_factor", SignInState::AwaitingTwoFactor)?;

        tracing::info!("Attempting authentication with two-factor password");
        session.set_password(password.to_string());
        match SignInResponse::recover(self.gateway.sign_in_password(password).await)? {
            SignInResponse::Authorized => {
                tracing::info!("Sign in successful, user is authorized");
                session.set_state(SignInState::SignedIn);
                Ok(session.state())
            }
            other => Err(Self::unexpected("submit_two_factor", &other)),
        }
    }

    /// Asks the remote to issue the verification code again. Never changes state.
    pub async fn request_new_code(&self, session: &SignInSession, phone: &str) -> Result<()> {
        Self::require(session, "request_new_code", SignInState::AwaitingVerificationCode)?;
        let phone = normalize_phone(phone)?;

        tracing::info!("Requesting a new sign in code");
        let response = SignInResponse::recover(self.gateway.send_code_request(&phone).await)?;
        if let Some(wait) = response.flood_wait() {
            tracing::error!("Too many code requests, remote asks to wait {}s", wait.as_secs());
            return Err(StickersError::RateLimited { wait });
        }
        match response {
            SignInResponse::CodeSent => Ok(()),
            other => Err(Self::unexpected("request_new_code", &other)),
        }
    }

    fn rate_limit(session: &mut SignInSession, response: &SignInResponse) {
        let wait = response.flood_wait().unwrap_or_default();
        tracing::error!("Too many sign in requests, remote asks to wait {}s", wait.as_secs());
        session.record_flood_wait(wait);
    }

    fn unexpected(operation: &str, response: &SignInResponse) -> StickersError {
        tracing::error!(
            "{} received an unexpected response and cannot continue: {}",
            operation,
            response.describe()
        );
        StickersError::unexpected(format!("{}: {}", operation, response.describe()))
    }
}
