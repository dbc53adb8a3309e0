//! End-to-end tests of the gated operations over the in-memory platform.

mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{CallbackEvent, RecordingCallback};
use sealkit_core::platform::memory::{AuthScript, MemoryAuthenticator, MemoryKeyStore};
use sealkit_core::platform::{BiometricAuthenticator, MemoryPlatform, SecureKeyStore};
use sealkit_core::{
    BiometricVault, CancellationSignal, AUTHORIZED, ENCRYPTED_DATA_SETTING, ENCRYPTED_RESULT,
    LAST_IV_SETTING,
};
use sealkit_store::{FileSettings, SettingsStore};

const WAIT: Duration = Duration::from_secs(2);

fn run_store(vault: &BiometricVault, plaintext: &str) -> CallbackEvent {
    let recorder = Arc::new(RecordingCallback::new());
    vault.store(
        plaintext,
        &CancellationSignal::new(),
        Arc::clone(&recorder) as _,
    );
    recorder.wait_for_event(WAIT).expect("store outcome")
}

fn run_retrieve(vault: &BiometricVault) -> CallbackEvent {
    let recorder = Arc::new(RecordingCallback::new());
    vault.retrieve(&CancellationSignal::new(), Arc::clone(&recorder) as _);
    recorder.wait_for_event(WAIT).expect("retrieve outcome")
}

#[test]
fn test_encrypt_then_decrypt_roundtrip() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    vault.init().expect("init");

    let plaintext = "correct horse battery staple";
    assert_eq!(
        run_store(&vault, plaintext),
        CallbackEvent::Success(ENCRYPTED_RESULT.to_string())
    );
    assert_eq!(
        run_retrieve(&vault),
        CallbackEvent::Success(plaintext.to_string())
    );
}

#[test]
fn test_roundtrip_preserves_non_ascii_payloads() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    vault.init().expect("init");

    let plaintext = "pä55wörd für das 金庫";
    run_store(&vault, plaintext);
    assert_eq!(
        run_retrieve(&vault),
        CallbackEvent::Success(plaintext.to_string())
    );
}

#[test]
fn test_reencryption_overwrites_iv_and_blob() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    vault.init().expect("init");

    run_store(&vault, "first secret payload, long enough to span blocks");
    let iv_after_first = platform.settings.get(LAST_IV_SETTING).unwrap().unwrap();
    let blob_after_first = platform
        .settings
        .get(ENCRYPTED_DATA_SETTING)
        .unwrap()
        .unwrap();

    let second = "second secret payload, also spanning multiple blocks";
    run_store(&vault, second);
    let iv_after_second = platform.settings.get(LAST_IV_SETTING).unwrap().unwrap();
    let blob_after_second = platform
        .settings
        .get(ENCRYPTED_DATA_SETTING)
        .unwrap()
        .unwrap();

    assert_ne!(iv_after_first, iv_after_second);
    assert_ne!(blob_after_first, blob_after_second);
    assert_eq!(
        run_retrieve(&vault),
        CallbackEvent::Success(second.to_string())
    );

    // Reinstating the first IV must not decrypt the second blob correctly.
    platform
        .settings
        .put(LAST_IV_SETTING, &iv_after_first)
        .unwrap();
    match run_retrieve(&vault) {
        CallbackEvent::Success(payload) => assert_ne!(payload, second),
        CallbackEvent::Failure(_) => {}
        CallbackEvent::Help(..) => panic!("unexpected help outcome"),
    }
}

#[test]
fn test_decrypt_before_any_encrypt_fails_eagerly() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    vault.init().expect("init");

    let event = run_retrieve(&vault);
    match event {
        CallbackEvent::Failure(message) => {
            assert!(message.contains("initialization vector"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    // The eager check must abort before any challenge is submitted.
    assert_eq!(platform.authenticator.challenge_count(), 0);
}

#[test]
fn test_decrypt_with_blob_removed_reports_no_data() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    vault.init().expect("init");

    run_store(&vault, "payload");
    platform.settings.remove(ENCRYPTED_DATA_SETTING).unwrap();

    match run_retrieve(&vault) {
        CallbackEvent::Failure(message) => {
            assert!(message.contains("no encrypted data"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_precondition_failures_are_distinct_and_never_reach_the_gate() {
    let deny: [(&str, fn(&MemoryAuthenticator)); 5] = [
        ("supported", |a| a.set_platform_supported(false)),
        ("hardware", |a| a.set_hardware_present(false)),
        ("keyguard", |a| a.set_keyguard_secure(false)),
        ("permission", |a| a.set_permission_granted(false)),
        ("enrolled", |a| a.set_biometrics_enrolled(false)),
    ];

    let mut reasons = Vec::new();
    for (name, apply) in deny {
        let platform = MemoryPlatform::new();
        apply(&platform.authenticator);
        let vault = platform.vault();

        let recorder = Arc::new(RecordingCallback::new());
        vault.retrieve(&CancellationSignal::new(), Arc::clone(&recorder) as _);

        // Precondition failures report synchronously.
        match recorder.events().as_slice() {
            [CallbackEvent::Failure(message)] => reasons.push(message.clone()),
            other => panic!("{name}: expected one synchronous failure, got {other:?}"),
        }
        assert_eq!(platform.authenticator.challenge_count(), 0, "{name}");
        assert!(vault.init().is_err(), "{name}");
    }

    for (i, a) in reasons.iter().enumerate() {
        for b in reasons.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_cancel_before_outcome_means_no_callback_at_all() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    vault.init().expect("init");
    run_store(&vault, "payload");

    platform
        .authenticator
        .set_response_delay(Duration::from_millis(100));

    let recorder = Arc::new(RecordingCallback::new());
    let signal = CancellationSignal::new();
    vault.retrieve(&signal, Arc::clone(&recorder) as _);
    signal.cancel();

    thread::sleep(Duration::from_millis(400));
    assert!(recorder.events().is_empty());
}

#[test]
fn test_authorize_reports_sentinel_and_touches_no_state() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    vault.init().expect("init");

    let recorder = Arc::new(RecordingCallback::new());
    vault.authorize(&CancellationSignal::new(), Arc::clone(&recorder) as _);

    assert_eq!(
        recorder.wait_for_event(WAIT),
        Some(CallbackEvent::Success(AUTHORIZED.to_string()))
    );
    assert!(platform.settings.get(LAST_IV_SETTING).unwrap().is_none());
    assert!(platform
        .settings
        .get(ENCRYPTED_DATA_SETTING)
        .unwrap()
        .is_none());
}

#[test]
fn test_biometric_mismatch_reports_failure() {
    let platform = MemoryPlatform::new();
    platform.authenticator.set_script(AuthScript::Fail);
    let vault = platform.vault();
    vault.init().expect("init");

    let recorder = Arc::new(RecordingCallback::new());
    vault.authorize(&CancellationSignal::new(), Arc::clone(&recorder) as _);

    match recorder.wait_for_event(WAIT) {
        Some(CallbackEvent::Failure(message)) => {
            assert!(message.contains("not recognized"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_platform_error_is_surfaced_verbatim() {
    let platform = MemoryPlatform::new();
    platform.authenticator.set_script(AuthScript::Error {
        code: 7,
        message: "Too many attempts. Try again later.".to_string(),
    });
    let vault = platform.vault();
    vault.init().expect("init");

    let recorder = Arc::new(RecordingCallback::new());
    vault.authorize(&CancellationSignal::new(), Arc::clone(&recorder) as _);

    match recorder.wait_for_event(WAIT) {
        Some(CallbackEvent::Failure(message)) => {
            assert!(message.contains("[7]"), "{message}");
            assert!(message.contains("Too many attempts"), "{message}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_help_hint_routes_to_on_help() {
    let platform = MemoryPlatform::new();
    platform.authenticator.set_script(AuthScript::Help {
        code: 2,
        message: "Sensor dirty, please clean it.".to_string(),
    });
    let vault = platform.vault();
    vault.init().expect("init");

    let recorder = Arc::new(RecordingCallback::new());
    vault.authorize(&CancellationSignal::new(), Arc::clone(&recorder) as _);

    assert_eq!(
        recorder.wait_for_event(WAIT),
        Some(CallbackEvent::Help(
            2,
            "Sensor dirty, please clean it.".to_string()
        ))
    );
    assert_eq!(recorder.events().len(), 1);
}

#[test]
fn test_store_without_init_reports_missing_key() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();
    // init() deliberately skipped: no device key exists yet.

    let recorder = Arc::new(RecordingCallback::new());
    vault.store(
        "payload",
        &CancellationSignal::new(),
        Arc::clone(&recorder) as _,
    );

    match recorder.events().as_slice() {
        [CallbackEvent::Failure(message)] => {
            assert!(message.contains("no key stored"), "{message}");
        }
        other => panic!("expected one synchronous failure, got {other:?}"),
    }
    assert_eq!(platform.authenticator.challenge_count(), 0);
}

#[test]
fn test_init_is_idempotent_and_keeps_the_key() {
    let platform = MemoryPlatform::new();
    let vault = platform.vault();

    vault.init().expect("first init");
    run_store(&vault, "payload");

    // A second init must not regenerate the key and orphan the blob.
    vault.init().expect("second init");
    assert_eq!(
        run_retrieve(&vault),
        CallbackEvent::Success("payload".to_string())
    );
}

#[test]
fn test_settings_survive_a_simulated_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sealkit-settings.json");

    let keystore = Arc::new(MemoryKeyStore::new());
    let authenticator = Arc::new(MemoryAuthenticator::new());

    {
        let settings = Arc::new(FileSettings::open(&path).unwrap());
        let vault = BiometricVault::new(
            Arc::clone(&keystore) as Arc<dyn SecureKeyStore>,
            Arc::clone(&authenticator) as Arc<dyn BiometricAuthenticator>,
            settings as Arc<dyn SettingsStore>,
        );
        vault.init().expect("init");
        run_store(&vault, "survives the restart");
    }

    // "Restart": fresh settings instance over the same document. The device
    // key survives in the (here: shared in-memory) keystore.
    let settings = Arc::new(FileSettings::open(&path).unwrap());
    let vault = BiometricVault::new(
        Arc::clone(&keystore) as Arc<dyn SecureKeyStore>,
        Arc::clone(&authenticator) as Arc<dyn BiometricAuthenticator>,
        settings as Arc<dyn SettingsStore>,
    );
    assert_eq!(
        run_retrieve(&vault),
        CallbackEvent::Success("survives the restart".to_string())
    );
}
