use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::core::{ConcreteProvider, MockProvider, ProviderDescriptor, ProviderKind};
use crate::session::MockSession;
use crate::{MockHandle, mockable};

const CRATE: &str = "mockmod-registry";

pub(crate) trait Logger: Send + Sync {
	fn log(&self, line: String);
	fn lines(&self) -> Vec<String>;
}

mockable! {
	pub(crate) LoggerStub for dyn Logger {
		fn log(&self, line: String);
		fn lines(&self) -> Vec<String>;
	}
}

pub(crate) trait Clock: Send + Sync {
	fn now(&self) -> u64;
	fn set_now(&self, now: u64);
}

mockable! {
	pub(crate) ClockStub for dyn Clock {
		#[get] fn now(&self) -> u64;
		#[set(now)] fn set_now(&self, now: u64);
	}
}

/// Interface with no provider anywhere.
pub(crate) trait Mailer: Send + Sync {
	fn subject(&self) -> String;
	fn set_subject(&self, subject: String);
	fn send(&self, to: String) -> bool;
}

mockable! {
	pub(crate) MailerStub for dyn Mailer {
		#[get] fn subject(&self) -> String;
		#[set(subject)] fn set_subject(&self, subject: String);
		fn send(&self, to: String) -> bool;
	}
}

/// Fake that keeps every logged line.
#[derive(Default)]
pub(crate) struct RecordingLogger {
	lines: Mutex<Vec<String>>,
}

impl Logger for RecordingLogger {
	fn log(&self, line: String) {
		self.lines.lock().push(line);
	}

	fn lines(&self) -> Vec<String> {
		self.lines.lock().clone()
	}
}

impl ConcreteProvider<dyn Logger> for RecordingLogger {
	fn implementation(self: Arc<Self>, _session: &MockSession) -> Arc<dyn Logger> {
		self
	}
}

/// Fake that prefixes lines with the current time from the session's clock.
#[derive(Default)]
pub(crate) struct TimestampLogger {
	lines: Mutex<Vec<String>>,
}

pub(crate) struct TimestampLoggerHandle {
	clock: Arc<dyn Clock>,
	inner: Arc<TimestampLogger>,
}

impl Logger for TimestampLoggerHandle {
	fn log(&self, line: String) {
		self.inner.lines.lock().push(format!("[{}] {line}", self.clock.now()));
	}

	fn lines(&self) -> Vec<String> {
		self.inner.lines.lock().clone()
	}
}

impl ConcreteProvider<dyn Logger> for TimestampLogger {
	fn implementation(self: Arc<Self>, session: &MockSession) -> Arc<dyn Logger> {
		Arc::new(TimestampLoggerHandle {
			clock: session.setup_mock::<dyn Clock>(),
			inner: self,
		})
	}
}

/// Fake that drops everything.
#[derive(Default)]
pub(crate) struct SilentLogger;

impl Logger for SilentLogger {
	fn log(&self, _line: String) {}

	fn lines(&self) -> Vec<String> {
		Vec::new()
	}
}

impl ConcreteProvider<dyn Logger> for SilentLogger {
	fn implementation(self: Arc<Self>, _session: &MockSession) -> Arc<dyn Logger> {
		self
	}
}

/// Stub configuration that answers `lines` with a canned transcript.
#[derive(Default)]
pub(crate) struct ScriptedLogger;

impl MockProvider<dyn Logger> for ScriptedLogger {
	fn configure(self: Arc<Self>, _session: &MockSession, mock: &mut MockHandle<dyn Logger>) {
		mock.on_call("lines", |(): ()| vec!["scripted".to_string()]);
	}
}

/// Stub configuration whose clock reading is controlled through the provider.
#[derive(Default)]
pub(crate) struct FixedClock {
	pub(crate) now: Arc<AtomicU64>,
}

impl MockProvider<dyn Clock> for FixedClock {
	fn configure(self: Arc<Self>, _session: &MockSession, mock: &mut MockHandle<dyn Clock>) {
		self.now.store(42, Ordering::SeqCst);
		let now = Arc::clone(&self.now);
		mock.returns_with("now", move || now.load(Ordering::SeqCst));
	}
}

/// Hand-written clock; exists to collide with [`FixedClock`].
#[derive(Default)]
pub(crate) struct FrozenClock;

impl Clock for FrozenClock {
	fn now(&self) -> u64 {
		7
	}

	fn set_now(&self, _now: u64) {}
}

impl ConcreteProvider<dyn Clock> for FrozenClock {
	fn implementation(self: Arc<Self>, _session: &MockSession) -> Arc<dyn Clock> {
		self
	}
}

/// Provider type that needs arguments to build.
#[allow(dead_code, reason = "registered by type only")]
pub(crate) struct ConfiguredLogger {
	path: String,
}

pub(crate) const RECORDING_LOGGER: ProviderDescriptor =
	ProviderDescriptor::concrete::<RecordingLogger, dyn Logger>(CRATE);
pub(crate) const TIMESTAMP_LOGGER: ProviderDescriptor =
	ProviderDescriptor::concrete::<TimestampLogger, dyn Logger>(CRATE);
pub(crate) const SILENT_LOGGER: ProviderDescriptor =
	ProviderDescriptor::concrete::<SilentLogger, dyn Logger>(CRATE);
pub(crate) const SCRIPTED_LOGGER: ProviderDescriptor =
	ProviderDescriptor::mock::<ScriptedLogger, dyn Logger>(CRATE);
pub(crate) const FIXED_CLOCK: ProviderDescriptor =
	ProviderDescriptor::mock::<FixedClock, dyn Clock>(CRATE);
pub(crate) const FROZEN_CLOCK: ProviderDescriptor =
	ProviderDescriptor::concrete::<FrozenClock, dyn Clock>(CRATE);
pub(crate) const CONFIGURED_LOGGER: ProviderDescriptor =
	ProviderDescriptor::without_constructor::<ConfiguredLogger, dyn Logger>(
		ProviderKind::Concrete,
		CRATE,
	);
