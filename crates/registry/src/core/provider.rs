use std::sync::Arc;

use mockmod_stub::{MockHandle, Mockable};

use crate::session::MockSession;

/// Supplies a reusable fake implementation of interface `I`.
///
/// The provider is materialized once per session epoch; every
/// [`MockSession::setup_mock`] call for `I` in that epoch goes through the same
/// instance. Returning a handle to `self` (or to state owned by `self`) keeps
/// the fake identity-stable.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct RecordingLogger { lines: Mutex<Vec<String>> }
///
/// impl ConcreteProvider<dyn Logger> for RecordingLogger {
///     fn implementation(self: Arc<Self>, _: &MockSession) -> Arc<dyn Logger> {
///         self
///     }
/// }
/// concrete_provider!(RecordingLogger, dyn Logger);
/// ```
pub trait ConcreteProvider<I: ?Sized + Mockable>: Send + Sync + 'static {
	/// Returns the implementation handed to the unit under test.
	///
	/// `session` resolves the fake's own dependencies.
	fn implementation(self: Arc<Self>, session: &MockSession) -> I::Object;
}

/// Pre-configures the auto-generated stub of interface `I`.
///
/// The provider instance outlives the stub objects it configures, so fields on
/// the provider (flags, counters) act as live controls when captured by the
/// member callbacks.
pub trait MockProvider<I: ?Sized + Mockable>: Send + Sync + 'static {
	/// Overrides members on a freshly created stub before it is finalized.
	fn configure(self: Arc<Self>, session: &MockSession, mock: &mut MockHandle<I>);
}
