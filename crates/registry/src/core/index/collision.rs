//! Collision types and the resolution policy hook.
//!
//! # Role
//!
//! This module defines the vocabulary for provider conflicts and the
//! [`ConflictResolver`] seam through which a suite decides them.

use std::fmt;

use crate::core::{ProviderKind, TypeKey};

/// One side of a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Party {
	/// Provider type (NOT the contested interface).
	pub provider: TypeKey,
	pub kind: ProviderKind,
}

impl fmt::Display for Party {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.provider, self.kind)
	}
}

/// Two providers claiming the same interface during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
	/// The contested interface.
	pub target: TypeKey,
	/// Provider already holding the interface.
	pub existing: Party,
	/// Provider trying to claim it.
	pub incoming: Party,
}

impl Conflict {
	/// Returns true when a concrete and a mock provider collide.
	pub fn is_cross_kind(&self) -> bool {
		self.existing.kind != self.incoming.kind
	}

	/// Returns true if `provider` is one of the two parties.
	pub fn involves(&self, provider: TypeKey) -> bool {
		self.existing.provider == provider || self.incoming.provider == provider
	}
}

impl fmt::Display for Conflict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_cross_kind() {
			write!(
				f,
				"{} and {} both provide implementations of {}",
				self.existing, self.incoming, self.target
			)
		} else {
			write!(
				f,
				"{} and {} both provide {} implementations of {}",
				self.existing.provider, self.incoming.provider, self.existing.kind, self.target
			)
		}
	}
}

/// Outcome of a [`ConflictResolver`] decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Bind the interface to this provider type.
	Use(TypeKey),
	/// No decision; discovery fails.
	Unresolved,
}

impl Resolution {
	/// Shorthand for `Resolution::Use(TypeKey::of::<P>())`.
	pub fn prefer<P: ?Sized + 'static>() -> Self {
		Self::Use(TypeKey::of::<P>())
	}
}

/// Decides which provider wins a collision.
///
/// Queried only during discovery. The winner may be either party or any other
/// discovered provider targeting the same interface. Naming a provider of the
/// other kind in a same-kind conflict hands the interface to that kind. Deciding by [`Conflict::target`] alone keeps the outcome
/// independent of scan order.
///
/// Plain functions and closures of type `Fn(&Conflict) -> Resolution` are
/// resolvers too, so a suite can use `static R: fn(&Conflict) -> Resolution`.
pub trait ConflictResolver: Send + Sync {
	fn resolve(&self, conflict: &Conflict) -> Resolution;
}

impl<F> ConflictResolver for F
where
	F: Fn(&Conflict) -> Resolution + Send + Sync,
{
	fn resolve(&self, conflict: &Conflict) -> Resolution {
		self(conflict)
	}
}

/// Default policy: every collision is a configuration error.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclineConflicts;

impl ConflictResolver for DeclineConflicts {
	fn resolve(&self, _conflict: &Conflict) -> Resolution {
		Resolution::Unresolved
	}
}

/// A single "interface `I` is served by provider `P`" rule.
#[derive(Clone, Copy)]
pub struct Preference {
	target: fn() -> TypeKey,
	winner: fn() -> TypeKey,
}

impl Preference {
	/// Prefers provider `P` whenever interface `I` is contested.
	pub const fn new<I: ?Sized + 'static, P: ?Sized + 'static>() -> Self {
		Self {
			target: TypeKey::of::<I>,
			winner: TypeKey::of::<P>,
		}
	}

	pub fn target(&self) -> TypeKey {
		(self.target)()
	}

	pub fn winner(&self) -> TypeKey {
		(self.winner)()
	}
}

impl fmt::Debug for Preference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Preference")
			.field("target", &self.target())
			.field("winner", &self.winner())
			.finish()
	}
}

/// Resolves collisions from a static preference table; other interfaces stay unresolved.
///
/// ```rust,ignore
/// static PREFER: PreferProviders =
///     PreferProviders::new(&[Preference::new::<dyn Permissions, MockPermissionsV1>()]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PreferProviders {
	rules: &'static [Preference],
}

impl PreferProviders {
	pub const fn new(rules: &'static [Preference]) -> Self {
		Self { rules }
	}
}

impl ConflictResolver for PreferProviders {
	fn resolve(&self, conflict: &Conflict) -> Resolution {
		self.rules
			.iter()
			.find(|rule| rule.target() == conflict.target)
			.map_or(Resolution::Unresolved, |rule| Resolution::Use(rule.winner()))
	}
}

/// Diagnostic record of a collision that a resolver settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
	pub conflict: Conflict,
	pub winner: Party,
}
