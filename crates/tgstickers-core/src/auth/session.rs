use std::fmt;
use std::time::Duration;

use phonenumber::{Mode, PhoneNumber};

use super::SignInState;
use crate::error::{Result, StickersError};

/// The sign-in context for the single local user.
///
/// Created at startup in `Uninitialized` and passed explicitly to every
/// state machine operation. Never persisted: each run either reuses the
/// authorized session kept by the protocol client or signs in again.
#[derive(Default, Clone)]
pub struct SignInSession {
    state: SignInState,
    phone: Option<String>,
    code: Option<String>,
    password: Option<String>,
    rejected_codes: u32,
    flood_wait: Option<Duration>,
}

impl SignInSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SignInState {
        self.state
    }

    /// The normalized phone number submitted in this attempt.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// The last verification code submitted, cleared once signed in.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Number of verification codes the remote rejected in this attempt.
    pub fn rejected_codes(&self) -> u32 {
        self.rejected_codes
    }

    /// The cooldown the remote demanded when the session became rate limited.
    pub fn flood_wait(&self) -> Option<Duration> {
        self.flood_wait
    }

    pub(crate) fn set_state(&mut self, state: SignInState) {
        tracing::debug!("SignInState {} -> {}", self.state, state);
        self.state = state;
        if state == SignInState::SignedIn {
            self.code = None;
            self.password = None;
        }
    }

    pub(crate) fn set_phone(&mut self, phone: String) {
        self.phone = Some(phone);
        self.code = None;
        self.rejected_codes = 0;
    }

    pub(crate) fn set_code(&mut self, code: String) {
        self.code = Some(code);
    }

    pub(crate) fn set_password(&mut self, password: String) {
        self.password = Some(password);
    }

    pub(crate) fn record_rejected_code(&mut self) {
        self.rejected_codes += 1;
    }

    pub(crate) fn record_flood_wait(&mut self, wait: Duration) {
        self.flood_wait = Some(wait);
        self.password = None;
        self.set_state(SignInState::RateLimited);
    }
}

impl fmt::Debug for SignInSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInSession")
            .field("state", &self.state)
            .field("phone", &self.phone)
            .field("code", &self.code.as_ref().map(|_| "<redacted>"))
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("rejected_codes", &self.rejected_codes)
            .field("flood_wait", &self.flood_wait)
            .finish()
    }
}

/// Reduces a user-entered phone number to its E.164 digits, country code
/// first and without the `+`.
///
/// Spaces, dashes, dots, parentheses and one leading `+` are dropped. The
/// digits must be 7 to 15 long and start with an assigned country calling
/// code. Whether the number is actually dialable is left to the remote; see
/// [`is_valid_phone`] for the stricter check.
pub fn normalize_phone(raw: &str) -> Result<String> {
    let e164 = parse_phone(raw)?.format().mode(Mode::E164).to_string();
    Ok(e164.trim_start_matches('+').to_string())
}

/// Whether `raw` is a dialable number according to the phone numbering plan
/// metadata, not just well-formed.
pub fn is_valid_phone(raw: &str) -> bool {
    match parse_phone(raw) {
        Ok(number) => phonenumber::is_valid(&number),
        Err(e) => {
            tracing::info!("{}", e);
            false
        }
    }
}

/// Renders a phone number for display, e.g. `+1 201-555-0123`.
pub fn format_phone(raw: &str) -> Result<String> {
    Ok(parse_phone(raw)?.format().mode(Mode::International).to_string())
}

fn parse_phone(raw: &str) -> Result<PhoneNumber> {
    let invalid = || StickersError::InvalidPhoneNumber(raw.to_string());
    let trimmed = raw.trim();
    let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut digits = String::with_capacity(without_plus.len());
    for c in without_plus.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(invalid()),
        }
    }
    if !(7..=15).contains(&digits.len()) {
        return Err(invalid());
    }

    phonenumber::parse(None, format!("+{}", digits)).map_err(|e| {
        tracing::debug!("{}: {}", raw, e);
        invalid()
    })
}
