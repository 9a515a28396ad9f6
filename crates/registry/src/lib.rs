//! Test-double provider registry.
//!
//! # Purpose
//!
//! Let a test ask for "an implementation of interface `I`" and get the right
//! double without wiring it by hand: a hand-written fake when one is
//! registered, a pre-configured stub when a mock provider is registered, and a
//! plain stub otherwise.
//!
//! # Mental Model
//!
//! - **Providers** are declared once with [`concrete_provider!`] or
//!   [`mock_provider!`] and collected at link time.
//! - **Discovery** ([`discover`]) builds an immutable [`ProviderTable`], asking a
//!   [`ConflictResolver`] whenever two providers claim one interface.
//! - **Sessions** ([`MockSession`]) serve [`MockSession::setup_mock`] and
//!   [`MockSession::get_mock`] from that table, caching provider instances
//!   until [`MockSession::reset`].
//! - **Suites** ([`Suite`]) run discovery once and hand a fresh session to each test.
//!
//! # Adding a Provider
//!
//! 1. Make the interface mockable with [`mockable!`].
//! 2. Implement [`ConcreteProvider<dyn Trait>`](ConcreteProvider) or
//!    [`MockProvider<dyn Trait>`](MockProvider) on a `Default` type.
//! 3. Register it with [`concrete_provider!`] or [`mock_provider!`].

pub mod core;
mod macros;
pub mod session;

#[doc(hidden)]
pub use inventory;
pub use mockmod_stub::{
	BehaviorMode, MockHandle, Mockable, Stub, StubError, create_stub, mockable,
};

pub use crate::core::{
	AdapterMismatch, Collision, Conflict, ConflictResolver, ConcreteProvider, Constructor,
	DeclineConflicts, DiscoveryError, InventoryScanner, MockProvider, Party, PreferProviders,
	Preference, ProviderDescriptor, ProviderEntry, ProviderInstance, ProviderKind, ProviderTable,
	Resolution, SliceScanner, StaticScanner, TypeKey, TypeScanner, discover,
};
pub use crate::session::{
	BEHAVIOR_ENV, CACHING_ENV, InstanceCaching, MockSession, OptionsError, SessionOptions, Suite,
	SuiteConfig,
};
