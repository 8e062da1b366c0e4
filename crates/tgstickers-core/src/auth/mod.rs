//! Sign-in state machine and the types it works with.

mod machine;
mod response;
mod session;
mod state;

pub use machine::SignInMachine;
pub use response::SignInResponse;
pub use session::{SignInSession, format_phone, is_valid_phone, normalize_phone};
pub use state::SignInState;
