use super::collision::Conflict;
use crate::core::{ProviderKind, TypeKey};

/// Fatal configuration errors raised while discovering providers.
///
/// Every variant names the provider type(s) and the interface involved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
	/// A provider type cannot be built without arguments.
	#[error("{kind} provider {provider} for {target} must have a parameterless constructor")]
	MissingConstructor {
		kind: ProviderKind,
		provider: TypeKey,
		target: TypeKey,
	},

	/// A collision the resolver declined to decide.
	#[error("{conflict}. Supply a ConflictResolver that chooses which one to use")]
	Unresolved { conflict: Conflict },

	/// The resolver chose a provider discovery does not know for this collision.
	#[error("conflict resolver chose {winner} for {target}, which is not a discovered candidate ({conflict})")]
	UnknownWinner {
		target: TypeKey,
		winner: TypeKey,
		conflict: Conflict,
	},

	/// The resolver chose a provider that backs another interface.
	#[error("conflict resolver chose {winner} for {target}, but it provides {winner_target}")]
	WinnerTargetMismatch {
		target: TypeKey,
		winner: TypeKey,
		winner_target: TypeKey,
	},
}
