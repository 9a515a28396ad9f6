//! Provider discovery and conflict resolution.
//!
//! # Purpose
//!
//! Turn the descriptors a [`TypeScanner`](crate::core::TypeScanner) finds into a
//! conflict-free [`ProviderTable`]: at most one provider constructor per
//! interface, decided by a [`ConflictResolver`] whenever two providers claim the
//! same interface.
//!
//! # Mental Model
//!
//! 1. **Scan:** one scanner query per [`ProviderKind`](crate::core::ProviderKind),
//!    sorted by provider type name.
//! 2. **Insert:** each descriptor is validated (it must be constructible) and
//!    keyed by its target interface.
//! 3. **Resolve:** a key collision becomes a [`Conflict`]; the resolver names the
//!    winner or declines, and declining aborts discovery.
//! 4. **Cross-kind:** an interface served by both a concrete and a mock provider
//!    is resolved the same way; the losing kind drops the entry.
//!
//! # Invariants
//!
//! - Must bind each interface to at most one provider across both kinds.
//!   - Enforced in: `build::build_family`, `build::resolve_cross_kind`.
//!   - Tested by: `tests::test_cross_kind_collision_requires_resolution`
//!   - Failure symptom: `setup_mock` serves a fake where a configured stub was expected.
//!
//! - Must not depend on scan order.
//!   - Enforced in: `build::build_family` (sort + resolver as sole tie-breaker).
//!   - Tested by: `tests::test_scan_order_does_not_matter`
//!   - Failure symptom: a different provider wins after an unrelated crate is linked.
//!
//! - Must fail as a whole on configuration errors.
//!   - Enforced in: [`discover`] (first error returned, no table built).
//!   - Tested by: `tests::test_missing_constructor_is_fatal`

mod build;
mod collision;
mod error;
mod types;

pub use build::discover;
pub use collision::{
	Collision, Conflict, ConflictResolver, DeclineConflicts, Party, PreferProviders, Preference,
	Resolution,
};
pub use error::DiscoveryError;
pub use types::{ProviderEntry, ProviderTable};

#[cfg(test)]
pub(crate) mod test_fixtures;
