//! Biometric authenticator trait and its event sink.
//!
//! The authenticator is the gate in front of every cipher operation: the
//! helper probes its capabilities eagerly, then submits a single challenge
//! and waits for exactly one terminal event (or silence, if the attempt was
//! cancelled).

use std::sync::Arc;

use crate::cancellation::CancellationSignal;

/// Receives the events of one authentication attempt.
///
/// Mirrors the platform authentication callback surface. Events arrive on
/// whatever thread the authenticator chooses; implementations must be
/// thread-safe.
pub trait AuthenticationEvents: Send + Sync {
    /// The presented factor matched an enrolled factor.
    fn on_authentication_succeeded(&self);

    /// The presented factor was valid but matched no enrolled factor.
    fn on_authentication_failed(&self);

    /// The platform reported a hard, terminal error (lockout, sensor fault).
    fn on_authentication_error(&self, code: i32, message: &str);

    /// The platform issued recoverable guidance (e.g. "sensor dirty").
    fn on_authentication_help(&self, code: i32, message: &str);
}

/// Capability probes plus submission of one biometric challenge.
///
/// # Contract
///
/// - [`authenticate`](Self::authenticate) never blocks the calling thread;
///   events arrive later on an implementation-chosen worker context.
/// - Implementations MUST NOT deliver any event once `signal` is cancelled:
///   cancellation is a silent abort.
/// - Retry and lockout policy is owned by the platform; whatever it reports
///   is surfaced verbatim through the event sink, never massaged here.
pub trait BiometricAuthenticator: Send + Sync {
    /// Whether the platform supports biometric authentication at all.
    fn platform_supported(&self) -> bool;

    /// Whether a biometric sensor is present.
    fn hardware_present(&self) -> bool;

    /// Whether the device has a secure lock screen configured.
    fn keyguard_secure(&self) -> bool;

    /// Whether the host holds permission to use the sensor.
    fn permission_granted(&self) -> bool;

    /// Whether at least one biometric factor is enrolled.
    fn biometrics_enrolled(&self) -> bool;

    /// Submits one challenge. The outcome arrives through `events` unless
    /// `signal` is cancelled first.
    fn authenticate(&self, signal: CancellationSignal, events: Arc<dyn AuthenticationEvents>);
}
