//! Interactive sign-in driver.

use async_trait::async_trait;

use tgstickers_core::auth::{SignInMachine, SignInSession, SignInState, format_phone, is_valid_phone};
use tgstickers_core::error::{Result, StickersError};

/// Number of phone numbers a user may enter before the driver gives up.
pub const MAX_PHONE_ATTEMPTS: u32 = 3;

/// Number of verification codes a user may try before the driver gives up.
pub const MAX_CODE_ATTEMPTS: u32 = 3;

/// Source of the credentials the sign-in handshake asks for, usually a
/// terminal or a dialog.
#[async_trait]
pub trait CredentialPrompt: Send {
    /// `attempt` starts at 1 and grows after each rejected number.
    async fn phone_number(&mut self, attempt: u32) -> Result<String>;

    /// `attempt` starts at 1 and grows after each rejected code.
    async fn verification_code(&mut self, attempt: u32) -> Result<String>;

    async fn two_factor_password(&mut self) -> Result<String>;
}

/// Walks the session to `SignedIn`, asking `prompt` for whatever the
/// current step needs.
///
/// Connects when the session is fresh and reuses an authorized session when
/// the protocol client already has one. Numbers that are not dialable are
/// asked for again without contacting the remote. Fails with
/// `InvalidPhoneNumber` after [`MAX_PHONE_ATTEMPTS`] such numbers, with
/// `InvalidCode` once [`MAX_CODE_ATTEMPTS`] codes were rejected and with
/// `RateLimited` if the remote imposes a flood wait.
pub async fn run_interactive(
    machine: &SignInMachine,
    session: &mut SignInSession,
    prompt: &mut dyn CredentialPrompt,
) -> Result<SignInState> {
    if session.state() == SignInState::Uninitialized {
        machine.connect(session).await?;
    }
    if session.state() == SignInState::ConnectedUnauthenticated {
        machine.resume(session).await?;
    }

    let mut phone_attempts = 0;
    while !session.state().is_terminal() {
        match session.state() {
            SignInState::ConnectedUnauthenticated => {
                phone_attempts += 1;
                let phone = prompt.phone_number(phone_attempts).await?;
                if !is_valid_phone(&phone) {
                    tracing::warn!(
                        "Invalid phone number entered (attempt {} of {})",
                        phone_attempts,
                        MAX_PHONE_ATTEMPTS
                    );
                    if phone_attempts >= MAX_PHONE_ATTEMPTS {
                        return Err(StickersError::InvalidPhoneNumber(phone));
                    }
                    continue;
                }
                tracing::info!("Signing in as {}", format_phone(&phone)?);
                machine.submit_phone(session, &phone).await?;
            }
            SignInState::AwaitingVerificationCode => {
                let rejected = session.rejected_codes();
                if rejected >= MAX_CODE_ATTEMPTS {
                    tracing::error!("Giving up after {} rejected verification codes", rejected);
                    return Err(StickersError::InvalidCode);
                }
                let phone = session
                    .phone()
                    .map(str::to_string)
                    .ok_or_else(|| StickersError::unexpected("no phone number submitted"))?;
                let code = prompt.verification_code(rejected + 1).await?;
                machine.submit_code(session, &phone, &code).await?;
            }
            SignInState::AwaitingTwoFactor => {
                let password = prompt.two_factor_password().await?;
                machine.submit_two_factor(session, &password).await?;
            }
            state => {
                return Err(StickersError::ProtocolState {
                    operation: "run_interactive",
                    state,
                });
            }
        }
    }

    if session.state().is_signed_in() {
        Ok(SignInState::SignedIn)
    } else {
        Err(StickersError::RateLimited {
            wait: session.flood_wait().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::*;
    use crate::test_support::FakeGateway;
    use tgstickers_core::auth::SignInResponse;

    const PHONE: &str = "12015550123";

    #[derive(Default)]
    struct ScriptedPrompt {
        phones: VecDeque<String>,
        codes: VecDeque<String>,
        passwords: VecDeque<String>,
        phone_attempts: Vec<u32>,
        code_attempts: Vec<u32>,
    }

    impl ScriptedPrompt {
        fn new(phones: &[&str], codes: &[&str], passwords: &[&str]) -> Self {
            let owned = |v: &[&str]| -> VecDeque<String> { v.iter().map(|s| s.to_string()).collect() };
            Self {
                phones: owned(phones),
                codes: owned(codes),
                passwords: owned(passwords),
                phone_attempts: Vec::new(),
                code_attempts: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl CredentialPrompt for ScriptedPrompt {
        async fn phone_number(&mut self, attempt: u32) -> Result<String> {
            self.phone_attempts.push(attempt);
            self.phones
                .pop_front()
                .ok_or_else(|| StickersError::unexpected("no phone"))
        }
        async fn verification_code(&mut self, attempt: u32) -> Result<String> {
            self.code_attempts.push(attempt);
            self.codes
                .pop_front()
                .ok_or_else(|| StickersError::unexpected("no code"))
        }
        async fn two_factor_password(&mut self) -> Result<String> {
            self.passwords
                .pop_front()
                .ok_or_else(|| StickersError::unexpected("no password"))
        }
    }

    #[tokio::test]
    async fn test_invalid_code_then_valid_code() {
        let gateway = FakeGateway::new();
        gateway.script_sign_in(vec![
            SignInResponse::CodeSent,
            SignInResponse::InvalidCode,
            SignInResponse::Authorized,
        ]);
        let machine = SignInMachine::new(gateway.clone());
        let mut session = SignInSession::new();
        let mut prompt = ScriptedPrompt::new(&[PHONE], &["00000", "12345"], &[]);

        let state = run_interactive(&machine, &mut session, &mut prompt)
            .await
            .unwrap();

        assert_eq!(state, SignInState::SignedIn);
        assert_eq!(prompt.code_attempts, vec![1, 2]);
        assert_eq!(gateway.sign_in_calls(), vec!["phone", "code", "code"]);
    }

    #[tokio::test]
    async fn test_already_authorized_skips_prompts() {
        let gateway = FakeGateway::new();
        gateway.set_authorized(true);
        let machine = SignInMachine::new(gateway.clone());
        let mut session = SignInSession::new();
        let mut prompt = ScriptedPrompt::default();

        let state = run_interactive(&machine, &mut session, &mut prompt)
            .await
            .unwrap();

        assert_eq!(state, SignInState::SignedIn);
        assert!(gateway.sign_in_calls().is_empty());
    }

    #[tokio::test]
    async fn test_two_factor_flow() {
        let gateway = FakeGateway::new();
        gateway.script_sign_in(vec![
            SignInResponse::CodeSent,
            SignInResponse::PasswordRequired,
            SignInResponse::Authorized,
        ]);
        let machine = SignInMachine::new(gateway.clone());
        let mut session = SignInSession::new();
        let mut prompt = ScriptedPrompt::new(&["+1 201-555-0123"], &["12345"], &["hunter2"]);

        let state = run_interactive(&machine, &mut session, &mut prompt)
            .await
            .unwrap();

        assert_eq!(state, SignInState::SignedIn);
        assert_eq!(gateway.sign_in_calls(), vec!["phone", "code", "password"]);
        assert_eq!(session.phone(), Some("12015550123"));
    }

    #[tokio::test]
    async fn test_flood_wait_is_an_error() {
        let gateway = FakeGateway::new();
        gateway.script_sign_in(vec![SignInResponse::FloodWait { seconds: 30 }]);
        let machine = SignInMachine::new(gateway);
        let mut session = SignInSession::new();
        let mut prompt = ScriptedPrompt::new(&[PHONE], &[], &[]);

        let err = run_interactive(&machine, &mut session, &mut prompt)
            .await
            .unwrap_err();

        match err {
            StickersError::RateLimited { wait } => assert_eq!(wait, Duration::from_secs(30)),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(session.state(), SignInState::RateLimited);
    }

    #[tokio::test]
    async fn test_gives_up_after_repeated_invalid_codes() {
        let gateway = FakeGateway::new();
        gateway.script_sign_in(vec![
            SignInResponse::CodeSent,
            SignInResponse::InvalidCode,
            SignInResponse::InvalidCode,
            SignInResponse::InvalidCode,
        ]);
        let machine = SignInMachine::new(gateway.clone());
        let mut session = SignInSession::new();
        let mut prompt = ScriptedPrompt::new(&[PHONE], &["1", "2", "3", "4"], &[]);

        let err = run_interactive(&machine, &mut session, &mut prompt)
            .await
            .unwrap_err();

        assert!(matches!(err, StickersError::InvalidCode));
        assert_eq!(prompt.code_attempts, vec![1, 2, 3]);
        assert_eq!(session.state(), SignInState::AwaitingVerificationCode);
    }

    #[tokio::test]
    async fn test_invalid_phone_is_asked_again() {
        let gateway = FakeGateway::new();
        gateway.script_sign_in(vec![SignInResponse::CodeSent, SignInResponse::Authorized]);
        let machine = SignInMachine::new(gateway.clone());
        let mut session = SignInSession::new();
        let mut prompt = ScriptedPrompt::new(&["+1 201-555-012", PHONE], &["12345"], &[]);

        let state = run_interactive(&machine, &mut session, &mut prompt)
            .await
            .unwrap();

        assert_eq!(state, SignInState::SignedIn);
        assert_eq!(prompt.phone_attempts, vec![1, 2]);
        assert_eq!(gateway.sign_in_calls(), vec!["phone", "code"]);
    }

    #[tokio::test]
    async fn test_gives_up_after_repeated_invalid_phones() {
        let gateway = FakeGateway::new();
        let machine = SignInMachine::new(gateway.clone());
        let mut session = SignInSession::new();
        let mut prompt = ScriptedPrompt::new(
            &["not a phone", "0000000", "+1 000 000 0000", PHONE],
            &[],
            &[],
        );

        let err = run_interactive(&machine, &mut session, &mut prompt)
            .await
            .unwrap_err();

        assert!(matches!(err, StickersError::InvalidPhoneNumber(ref p) if p == "+1 000 000 0000"));
        assert_eq!(prompt.phone_attempts, vec![1, 2, 3]);
        assert!(gateway.sign_in_calls().is_empty());
        assert_eq!(session.state(), SignInState::ConnectedUnauthenticated);
    }
}
