use std::fmt;
use std::sync::{Arc, OnceLock};

use super::{MockSession, SessionOptions};
use crate::core::{
	ConflictResolver, DeclineConflicts, DiscoveryError, InventoryScanner, ProviderTable,
	TypeScanner,
};

/// Static configuration of a [`Suite`].
#[derive(Clone, Copy)]
pub struct SuiteConfig {
	label: &'static str,
	scanner: &'static dyn TypeScanner,
	resolver: &'static dyn ConflictResolver,
	options: SessionOptions,
}

impl SuiteConfig {
	/// Inventory scanning, no conflict resolution, default session options.
	pub const fn new(label: &'static str) -> Self {
		Self {
			label,
			scanner: &InventoryScanner,
			resolver: &DeclineConflicts,
			options: SessionOptions::new(),
		}
	}

	pub const fn scanner(mut self, scanner: &'static dyn TypeScanner) -> Self {
		self.scanner = scanner;
		self
	}

	pub const fn resolver(mut self, resolver: &'static dyn ConflictResolver) -> Self {
		self.resolver = resolver;
		self
	}

	pub const fn options(mut self, options: SessionOptions) -> Self {
		self.options = options;
		self
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	pub fn session_options(&self) -> SessionOptions {
		self.options
	}
}

impl fmt::Debug for SuiteConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SuiteConfig")
			.field("label", &self.label)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

/// A group of tests sharing one discovery result.
///
/// Discovery runs on first use and its outcome, success or error, is kept for
/// the life of the process. Each test then takes its own [`MockSession`].
///
/// ```rust,ignore
/// static PREFER: PreferProviders =
///     PreferProviders::new(&[Preference::new::<dyn Permissions, MockPermissionsV1>()]);
/// static SUITE: Suite = Suite::new(SuiteConfig::new("incrementer").resolver(&PREFER));
///
/// #[test]
/// fn increments_when_allowed() {
///     let session = SUITE.session_or_panic();
///     let permissions = session.setup_mock::<dyn Permissions>();
///     // ...
/// }
/// ```
pub struct Suite {
	config: SuiteConfig,
	table: OnceLock<Result<Arc<ProviderTable>, DiscoveryError>>,
}

impl Suite {
	pub const fn new(config: SuiteConfig) -> Self {
		Self {
			config,
			table: OnceLock::new(),
		}
	}

	/// The process-wide suite: inventory scanning, no conflict resolution.
	pub fn global() -> &'static Suite {
		static GLOBAL: Suite = Suite::new(SuiteConfig::new("global"));
		&GLOBAL
	}

	pub fn config(&self) -> &SuiteConfig {
		&self.config
	}

	/// Returns the discovered table, running discovery on first call.
	///
	/// # Errors
	///
	/// Returns the [`DiscoveryError`] discovery produced; later calls return it again.
	pub fn table(&self) -> Result<Arc<ProviderTable>, DiscoveryError> {
		self.table
			.get_or_init(|| {
				let result = crate::core::discover(self.config.scanner, self.config.resolver);
				match &result {
					Ok(table) => tracing::debug!(
						domain = "providers",
						suite = self.config.label,
						providers = table.len(),
						"suite discovery finished",
					),
					Err(e) => tracing::error!(
						domain = "providers",
						suite = self.config.label,
						error = %e,
						"suite discovery failed",
					),
				}
				result.map(Arc::new)
			})
			.clone()
	}

	/// Starts a session with the suite's options.
	///
	/// # Errors
	///
	/// Returns the suite's [`DiscoveryError`], if any.
	pub fn session(&self) -> Result<MockSession, DiscoveryError> {
		self.session_with(self.config.options)
	}

	/// Starts a session with explicit options.
	///
	/// # Errors
	///
	/// Returns the suite's [`DiscoveryError`], if any.
	pub fn session_with(&self, options: SessionOptions) -> Result<MockSession, DiscoveryError> {
		let table = self.table()?;
		Ok(MockSession::new(table, options).with_label(self.config.label))
	}

	/// Starts a session, panicking on configuration errors.
	///
	/// # Panics
	///
	/// Panics with the discovery error message when the suite is misconfigured.
	pub fn session_or_panic(&self) -> MockSession {
		self.session()
			.unwrap_or_else(|e| panic!("suite {}: {e}", self.config.label))
	}
}

impl fmt::Debug for Suite {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Suite")
			.field("config", &self.config)
			.field("discovered", &self.table.get().is_some())
			.finish()
	}
}
