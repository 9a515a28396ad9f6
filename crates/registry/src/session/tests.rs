use std::sync::Arc;
use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::{InstanceCaching, MockSession, OptionsError, SessionOptions, Suite, SuiteConfig};
use crate::core::index::test_fixtures::{
	Clock, FIXED_CLOCK, FixedClock, Logger, Mailer, RECORDING_LOGGER, RecordingLogger,
	SCRIPTED_LOGGER, SILENT_LOGGER, TIMESTAMP_LOGGER,
};
use crate::core::{
	DeclineConflicts, DiscoveryError, ProviderDescriptor, ProviderTable, SliceScanner,
	StaticScanner,
};
use crate::{BehaviorMode, StubError};

fn session_with(descriptors: &[ProviderDescriptor], options: SessionOptions) -> MockSession {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	MockSession::discover(
		&StaticScanner::new(descriptors.iter().copied()),
		&DeclineConflicts,
		options,
	)
	.unwrap()
}

fn session(descriptors: &[ProviderDescriptor]) -> MockSession {
	session_with(descriptors, SessionOptions::new())
}

/// Repeated requests in one epoch return the same concrete fake.
#[test]
fn test_concrete_provider_is_stable_within_epoch() {
	let session = session(&[RECORDING_LOGGER]);

	let first = session.setup_mock::<dyn Logger>();
	let second = session.setup_mock::<dyn Logger>();
	first.log("hello".to_string());

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(second.lines(), vec!["hello".to_string()]);
}

/// Concurrent first requests still settle on one provider per epoch.
#[test]
fn test_concurrent_requests_share_one_provider() {
	let session = session(&[RECORDING_LOGGER]);

	let loggers: Vec<Arc<dyn Logger>> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..8)
			.map(|_| scope.spawn(|| session.setup_mock::<dyn Logger>()))
			.collect();
		handles
			.into_iter()
			.map(|h| h.join().expect("setup_mock thread"))
			.collect()
	});

	let cached: Arc<dyn Logger> = session.get_mock::<RecordingLogger, dyn Logger>().unwrap();
	for logger in &loggers {
		assert!(Arc::ptr_eq(logger, &cached));
	}
}

/// Reset drops provider instances but keeps the discovered table.
#[test]
fn test_reset_starts_new_epoch() {
	let mut session = session(&[RECORDING_LOGGER, FIXED_CLOCK]);
	let before = session.setup_mock::<dyn Logger>();
	before.log("stale".to_string());
	let entries_before = session.table().entries().len();

	session.reset();

	assert_eq!(session.epoch(), 1);
	assert!(session.get_mock::<RecordingLogger, dyn Logger>().is_none());
	let after = session.setup_mock::<dyn Logger>();
	assert!(!Arc::ptr_eq(&before, &after));
	assert!(after.lines().is_empty());
	assert_eq!(session.table().entries().len(), entries_before);
}

/// `get_mock` only sees providers materialized in the current epoch.
#[test]
fn test_get_mock_returns_materialized_provider() {
	let session = session(&[RECORDING_LOGGER]);
	assert!(session.get_mock::<RecordingLogger, dyn Logger>().is_none());

	let logger = session.setup_mock::<dyn Logger>();
	logger.log("via interface".to_string());

	let provider = session.get_mock::<RecordingLogger, dyn Logger>().unwrap();
	assert_eq!(provider.lines(), vec!["via interface".to_string()]);
	let provider: Arc<dyn Logger> = provider;
	assert!(Arc::ptr_eq(&provider, &logger));
}

/// Asking for the wrong provider type is a programming error.
#[test]
#[should_panic(expected = "is served by")]
fn test_get_mock_with_wrong_provider_type_panics() {
	let session = session(&[RECORDING_LOGGER]);
	let _logger = session.setup_mock::<dyn Logger>();
	let _ = session.get_mock::<FixedClock, dyn Logger>();
}

/// Interfaces without providers get a loose stub with property semantics.
#[test]
fn test_unregistered_interface_gets_stub() {
	let session = session(&[RECORDING_LOGGER]);

	let mailer = session.setup_mock::<dyn Mailer>();
	assert_eq!(mailer.subject(), "");
	mailer.set_subject("first".to_string());
	mailer.set_subject("second".to_string());

	assert_eq!(mailer.subject(), "second");
	assert!(!mailer.send("ops@example.com".to_string()));
	assert!(session.get_mock::<RecordingLogger, dyn Mailer>().is_none());
}

/// Every request for an unregistered interface builds an independent stub.
#[test]
fn test_unregistered_stubs_are_independent() {
	let session = MockSession::new(Arc::new(ProviderTable::empty()), SessionOptions::new());

	let a = session.setup_mock::<dyn Mailer>();
	let b = session.setup_mock::<dyn Mailer>();
	a.set_subject("only a".to_string());

	assert_eq!(b.subject(), "");
}

/// Mock providers configure the stub, and their fields stay live controls.
#[test]
fn test_mock_provider_configures_stub() {
	let session = session(&[FIXED_CLOCK]);

	let clock = session.setup_mock::<dyn Clock>();
	assert_eq!(clock.now(), 42);

	let provider = session.get_mock::<FixedClock, dyn Clock>().unwrap();
	provider.now.store(7, Ordering::SeqCst);
	assert_eq!(clock.now(), 7);

	// Configured getters shadow property writes.
	clock.set_now(100);
	assert_eq!(clock.now(), 7);
}

/// Members a mock provider leaves alone keep stub defaults.
#[test]
fn test_mock_provider_leaves_other_members_loose() {
	let session = session(&[SCRIPTED_LOGGER]);

	let logger = session.setup_mock::<dyn Logger>();
	logger.log("ignored".to_string());

	assert_eq!(logger.lines(), vec!["scripted".to_string()]);
}

/// Providers can request their own dependencies from the session.
#[test]
fn test_provider_resolves_dependencies_through_session() {
	let session = session(&[TIMESTAMP_LOGGER, FIXED_CLOCK]);

	let logger = session.setup_mock::<dyn Logger>();
	logger.log("boot".to_string());

	assert_eq!(logger.lines(), vec!["[42] boot".to_string()]);
	assert!(session.get_mock::<FixedClock, dyn Clock>().is_some());
}

/// Without caching every request materializes a new provider.
#[test]
fn test_disabled_caching_builds_fresh_providers() {
	let options = SessionOptions::new().with_caching(InstanceCaching::Disabled);
	let session = session_with(&[RECORDING_LOGGER], options);

	let first = session.setup_mock::<dyn Logger>();
	let second = session.setup_mock::<dyn Logger>();
	assert!(!Arc::ptr_eq(&first, &second));

	let latest: Arc<dyn Logger> = session.get_mock::<RecordingLogger, dyn Logger>().unwrap();
	assert!(Arc::ptr_eq(&latest, &second));
}

/// Strict stubs refuse members nobody configured.
#[test]
#[should_panic(expected = "has no setup for member `subject`")]
fn test_strict_stub_panics_on_unconfigured_member() {
	let options = SessionOptions::new().with_behavior(BehaviorMode::Strict);
	let session = session_with(&[], options);

	let mailer = session.setup_mock::<dyn Mailer>();
	let _ = mailer.subject();
}

/// Strict stubs still answer what a mock provider configured.
#[test]
fn test_strict_stub_serves_configured_members() {
	let options = SessionOptions::new().with_behavior(BehaviorMode::Strict);
	let session = session_with(&[FIXED_CLOCK], options);

	let clock = session.setup_mock::<dyn Clock>();
	assert_eq!(clock.now(), 42);
}

#[rstest]
#[case::unset(None, None, SessionOptions::new())]
#[case::strict(Some("strict"), None, SessionOptions::new().with_behavior(BehaviorMode::Strict))]
#[case::disabled(
	None,
	Some(" Off "),
	SessionOptions::new().with_caching(InstanceCaching::Disabled)
)]
fn test_options_apply_lookup(
	#[case] behavior: Option<&'static str>,
	#[case] caching: Option<&'static str>,
	#[case] expected: SessionOptions,
) {
	let options = SessionOptions::new()
		.apply_lookup(|var| match var {
			super::BEHAVIOR_ENV => behavior.map(str::to_string),
			super::CACHING_ENV => caching.map(str::to_string),
			_ => None,
		})
		.unwrap();
	assert_eq!(options, expected);
}

/// Invalid override values name the offending variable.
#[test]
fn test_options_apply_lookup_rejects_unknown_values() {
	let err = SessionOptions::new()
		.apply_lookup(|var| (var == super::BEHAVIOR_ENV).then(|| "chaotic".to_string()))
		.unwrap_err();

	assert_eq!(
		err,
		OptionsError::Env {
			var: super::BEHAVIOR_ENV,
			source: Box::new(OptionsError::Behavior(StubError::UnknownBehavior(
				"chaotic".to_string()
			))),
		}
	);
	assert!(err.to_string().starts_with("MOCKMOD_BEHAVIOR: unknown behavior mode"));
}

static SUITE_DESCRIPTORS: [ProviderDescriptor; 2] = [RECORDING_LOGGER, FIXED_CLOCK];
static SUITE_SCANNER: SliceScanner = SliceScanner(&SUITE_DESCRIPTORS);
static SUITE: Suite = Suite::new(SuiteConfig::new("unit").scanner(&SUITE_SCANNER));

/// A suite discovers once and every session shares the table.
#[test]
fn test_suite_discovers_once() {
	let first = SUITE.table().unwrap();
	let second = SUITE.table().unwrap();
	assert!(Arc::ptr_eq(&first, &second));

	let a = SUITE.session_or_panic();
	let b = SUITE.session_or_panic();
	assert_eq!(a.label(), "unit");

	let from_a = a.setup_mock::<dyn Logger>();
	let from_b = b.setup_mock::<dyn Logger>();
	assert!(!Arc::ptr_eq(&from_a, &from_b));
}

static CONFLICTING_DESCRIPTORS: [ProviderDescriptor; 2] = [RECORDING_LOGGER, SILENT_LOGGER];
static CONFLICTING_SCANNER: SliceScanner = SliceScanner(&CONFLICTING_DESCRIPTORS);
static CONFLICTING: Suite =
	Suite::new(SuiteConfig::new("conflicting").scanner(&CONFLICTING_SCANNER));

/// A misconfigured suite reports the same error to every test.
#[test]
fn test_suite_keeps_discovery_error() {
	let first = CONFLICTING.session().unwrap_err();
	let second = CONFLICTING.session().unwrap_err();

	assert!(matches!(first, DiscoveryError::Unresolved { .. }));
	assert_eq!(first, second);
}

#[test]
#[should_panic(expected = "suite conflicting:")]
fn test_suite_session_or_panic_reports_label() {
	let _ = CONFLICTING.session_or_panic();
}

/// Session options override the suite defaults per session.
#[test]
fn test_suite_session_with_options() {
	let session = SUITE
		.session_with(SessionOptions::new().with_behavior(BehaviorMode::Strict))
		.unwrap();
	assert_eq!(session.options().behavior, BehaviorMode::Strict);
	assert_eq!(SUITE.config().session_options(), SessionOptions::new());
}
