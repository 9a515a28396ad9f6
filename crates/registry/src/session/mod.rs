//! Per-test sessions and the `setup_mock` facade.
//!
//! # Purpose
//!
//! A [`MockSession`] is the object fixtures talk to. It answers
//! [`MockSession::setup_mock`] for any interface by consulting a shared,
//! immutable [`ProviderTable`] and caching the provider instances it
//! materializes until [`MockSession::reset`].
//!
//! # Lifecycle
//!
//! 1. Discovery: a [`Suite`] computes its table once (first use) and shares it.
//! 2. Epoch: each test creates (or resets) a session; provider instances are
//!    materialized lazily on first request.
//! 3. Reset: the instance cache is cleared and the epoch counter advances; the
//!    table is untouched.
//!
//! # Concurrency
//!
//! Sessions are per test. The instance cache sits behind a mutex only so that
//! providers can call back into the session through `&MockSession`; the lock is
//! never held while provider code runs.

mod options;
mod suite;

use std::any::Any;
use std::sync::Arc;

use mockmod_stub::{Mockable, create_stub};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

pub use self::options::{BEHAVIOR_ENV, CACHING_ENV, InstanceCaching, OptionsError, SessionOptions};
pub use self::suite::{Suite, SuiteConfig};
use crate::core::{
	ConflictResolver, DiscoveryError, ErasedProvider, ProviderInstance, ProviderTable, TypeKey,
	TypeScanner,
};

/// Hands out providers and stubs for one test epoch.
pub struct MockSession {
	label: &'static str,
	table: Arc<ProviderTable>,
	options: SessionOptions,
	instances: Mutex<FxHashMap<TypeKey, ProviderInstance>>,
	epoch: u64,
}

impl MockSession {
	/// Creates a session over an already discovered table.
	pub fn new(table: Arc<ProviderTable>, options: SessionOptions) -> Self {
		Self {
			label: "session",
			table,
			options,
			instances: Mutex::new(FxHashMap::default()),
			epoch: 0,
		}
	}

	/// Runs discovery and wraps the result in a standalone session.
	///
	/// Prefer a [`Suite`] when many tests share the same providers; this
	/// re-runs discovery on every call.
	///
	/// # Errors
	///
	/// Returns the [`DiscoveryError`] raised by discovery.
	pub fn discover(
		scanner: &dyn TypeScanner,
		resolver: &dyn ConflictResolver,
		options: SessionOptions,
	) -> Result<Self, DiscoveryError> {
		let table = crate::core::discover(scanner, resolver)?;
		Ok(Self::new(Arc::new(table), options))
	}

	/// Sets the label used in log output.
	pub fn with_label(mut self, label: &'static str) -> Self {
		self.label = label;
		self
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	pub fn table(&self) -> &ProviderTable {
		&self.table
	}

	pub fn options(&self) -> SessionOptions {
		self.options
	}

	/// Number of resets since creation.
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Returns an implementation of interface `I`.
	///
	/// A registered concrete provider supplies the object directly. Otherwise a
	/// fresh stub is created and, if a mock provider is registered for `I`, that
	/// provider configures it first. Interfaces without any provider get a plain
	/// stub; that is not an error.
	///
	/// # Panics
	///
	/// Panics if a provider's erased entry point rejects `I`, which indicates a
	/// corrupted table rather than a configuration problem.
	pub fn setup_mock<I: ?Sized + Mockable>(&self) -> I::Object {
		let instance = self.materialize(TypeKey::of::<I>());

		match instance.as_ref().map(ProviderInstance::erased) {
			Some(ErasedProvider::Concrete(erased)) => {
				crate::core::implementation::<I>(erased.as_ref(), self).unwrap_or_else(|e| panic!("{e}"))
			}
			Some(ErasedProvider::Mock(erased)) => {
				let mut mock = create_stub::<I>(self.options.behavior);
				crate::core::configure(erased.as_ref(), self, &mut mock).unwrap_or_else(|e| panic!("{e}"));
				mock.object()
			}
			None => create_stub::<I>(self.options.behavior).object(),
		}
	}

	/// Returns the provider serving `I` in this epoch as `P`.
	///
	/// `None` if `I` has not been requested since the last reset (or has no
	/// provider at all).
	///
	/// # Panics
	///
	/// Panics if the provider serving `I` is not a `P`.
	pub fn get_mock<P, I>(&self) -> Option<Arc<P>>
	where
		P: Any + Send + Sync,
		I: ?Sized + 'static,
	{
		let instance = self.provider_instance::<I>()?;
		match instance.downcast::<P>() {
			Some(provider) => Some(provider),
			None => panic!(
				"{} is served by {}, not {}",
				instance.target(),
				instance.provider(),
				TypeKey::of::<P>()
			),
		}
	}

	/// Returns the materialized provider instance for `I`, if any.
	pub fn provider_instance<I: ?Sized + 'static>(&self) -> Option<ProviderInstance> {
		self.instances.lock().get(&TypeKey::of::<I>()).cloned()
	}

	/// Drops every materialized provider and starts a new epoch.
	pub fn reset(&mut self) {
		let instances = self.instances.get_mut();
		let dropped = instances.len();
		instances.clear();
		self.epoch += 1;
		tracing::debug!(
			domain = "providers",
			session = self.label,
			epoch = self.epoch,
			dropped,
			"session reset",
		);
	}

	/// Returns the provider instance for `target`, building it if needed.
	///
	/// The provider is constructed with the cache unlocked; when another caller
	/// cached one for the same target meanwhile, that instance wins.
	fn materialize(&self, target: TypeKey) -> Option<ProviderInstance> {
		let entry = self.table.lookup(target)?;
		let per_epoch = self.options.caching == InstanceCaching::PerEpoch;
		if per_epoch && let Some(existing) = self.instances.lock().get(&target) {
			return Some(existing.clone());
		}

		let built = entry.instantiate();
		let mut instances = self.instances.lock();
		if per_epoch && let Some(existing) = instances.get(&target) {
			return Some(existing.clone());
		}

		tracing::trace!(
			domain = "providers",
			session = self.label,
			epoch = self.epoch,
			kind = %built.kind(),
			provider = built.provider().name(),
			target = target.name(),
			"materialized provider",
		);
		instances.insert(target, built.clone());
		Some(built)
	}
}

impl std::fmt::Debug for MockSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MockSession")
			.field("label", &self.label)
			.field("epoch", &self.epoch)
			.field("options", &self.options)
			.field("materialized", &self.instances.lock().len())
			.finish()
	}
}

#[cfg(test)]
mod tests;
