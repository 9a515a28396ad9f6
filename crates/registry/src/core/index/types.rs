use std::fmt;

use rustc_hash::FxHashMap;

use super::collision::{Collision, Party};
use super::error::DiscoveryError;
use crate::core::{Constructor, ProviderDescriptor, ProviderInstance, ProviderKind, TypeKey};

pub(super) type Map<K, V> = FxHashMap<K, V>;

/// A discovered provider: who serves which interface, and how to build it.
#[derive(Clone, Copy)]
pub struct ProviderEntry {
	provider: TypeKey,
	target: TypeKey,
	kind: ProviderKind,
	construct: Constructor,
}

impl ProviderEntry {
	/// Validates a descriptor into an entry.
	///
	/// # Errors
	///
	/// Returns [`DiscoveryError::MissingConstructor`] when the descriptor has no constructor.
	pub fn from_descriptor(descriptor: &ProviderDescriptor) -> Result<Self, DiscoveryError> {
		let Some(construct) = descriptor.constructor() else {
			return Err(DiscoveryError::MissingConstructor {
				kind: descriptor.kind(),
				provider: descriptor.provider(),
				target: descriptor.target(),
			});
		};
		Ok(Self {
			provider: descriptor.provider(),
			target: descriptor.target(),
			kind: descriptor.kind(),
			construct,
		})
	}

	#[inline]
	pub fn provider(&self) -> TypeKey {
		self.provider
	}

	#[inline]
	pub fn target(&self) -> TypeKey {
		self.target
	}

	#[inline]
	pub fn kind(&self) -> ProviderKind {
		self.kind
	}

	pub fn party(&self) -> Party {
		Party {
			provider: self.provider,
			kind: self.kind,
		}
	}

	/// Builds a fresh provider instance.
	pub fn instantiate(&self) -> ProviderInstance {
		(self.construct)()
	}
}

impl fmt::Debug for ProviderEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderEntry")
			.field("provider", &self.provider)
			.field("target", &self.target)
			.field("kind", &self.kind)
			.finish()
	}
}

/// Immutable result of discovery: one provider constructor per interface.
///
/// An interface appears in at most one of the two kind maps.
#[derive(Clone, Default)]
pub struct ProviderTable {
	pub(super) concrete: Map<TypeKey, ProviderEntry>,
	pub(super) mock: Map<TypeKey, ProviderEntry>,
	pub(super) collisions: Vec<Collision>,
}

impl ProviderTable {
	/// Returns a table with no providers; every request falls back to a plain stub.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Looks up the provider of `kind` for `target`.
	pub fn get(&self, kind: ProviderKind, target: TypeKey) -> Option<&ProviderEntry> {
		match kind {
			ProviderKind::Concrete => self.concrete.get(&target),
			ProviderKind::Mock => self.mock.get(&target),
		}
	}

	/// Looks up whichever provider serves `target`.
	pub fn lookup(&self, target: TypeKey) -> Option<&ProviderEntry> {
		self.concrete.get(&target).or_else(|| self.mock.get(&target))
	}

	/// Returns concrete entries sorted by interface.
	pub fn concrete(&self) -> Vec<&ProviderEntry> {
		sorted(self.concrete.values())
	}

	/// Returns mock entries sorted by interface.
	pub fn mock(&self) -> Vec<&ProviderEntry> {
		sorted(self.mock.values())
	}

	/// Returns every entry sorted by interface.
	pub fn entries(&self) -> Vec<&ProviderEntry> {
		sorted(self.concrete.values().chain(self.mock.values()))
	}

	/// Returns the collisions settled during discovery, in resolution order.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}

	pub fn len(&self) -> usize {
		self.concrete.len() + self.mock.len()
	}

	pub fn is_empty(&self) -> bool {
		self.concrete.is_empty() && self.mock.is_empty()
	}
}

impl fmt::Debug for ProviderTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderTable")
			.field("entries", &self.entries())
			.field("collisions", &self.collisions)
			.finish()
	}
}

fn sorted<'a>(entries: impl Iterator<Item = &'a ProviderEntry>) -> Vec<&'a ProviderEntry> {
	let mut entries: Vec<_> = entries.collect();
	entries.sort_by_key(|e| (e.target, e.kind));
	entries
}
