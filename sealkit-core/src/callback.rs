//! Caller-facing callback surface.
//!
//! Every gated operation reports its result through an [`AuthCallback`].
//! Exactly one of the three methods fires per operation; a cancelled attempt
//! fires none of them.

/// Success result reported by an auth-only operation.
///
/// Distinguishes "the owner authorized" from decrypted payload text, which is
/// what the other success path carries.
pub const AUTHORIZED: &str = "__SEAL_AUTHORIZED";

/// Receives the outcome of one gated operation.
///
/// Implementations are invoked on whatever thread the platform authentication
/// subsystem chooses; marshal back to a UI context yourself if needed.
pub trait AuthCallback: Send + Sync {
    /// The operation concluded successfully.
    ///
    /// `result` is the decrypted payload for a retrieval, the literal
    /// `"Encrypted"` for a store, or [`AUTHORIZED`] for an auth-only
    /// operation.
    fn on_success(&self, result: &str);

    /// The operation failed. `message` is a descriptive, inspectable reason.
    fn on_failure(&self, message: &str);

    /// The platform issued recoverable guidance (e.g. "sensor dirty").
    fn on_help(&self, code: i32, message: &str);
}

/// Tagged outcome of one authentication attempt.
///
/// Ephemeral: exists only to be dispatched to an [`AuthCallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The operation succeeded; carries the result text.
    Success(String),
    /// The operation failed; carries the reason.
    Failure(String),
    /// Recoverable guidance from the platform.
    Help {
        /// Platform help code, surfaced verbatim.
        code: i32,
        /// Human-readable guidance, surfaced verbatim.
        message: String,
    },
}

impl AuthOutcome {
    /// Dispatches this outcome to the matching callback method.
    pub fn dispatch(self, callback: &dyn AuthCallback) {
        match self {
            Self::Success(result) => callback.on_success(&result),
            Self::Failure(message) => callback.on_failure(&message),
            Self::Help { code, message } => callback.on_help(code, &message),
        }
    }
}
