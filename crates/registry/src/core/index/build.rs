use super::collision::{Collision, Conflict, ConflictResolver, Party, Resolution};
use super::error::DiscoveryError;
use super::types::{Map, ProviderEntry, ProviderTable};
use crate::core::{ProviderDescriptor, ProviderKind, TypeKey, TypeScanner};

/// Discovers every provider visible to `scanner` and resolves collisions with `resolver`.
///
/// # Errors
///
/// Returns the first [`DiscoveryError`] encountered; discovery never partially succeeds.
pub fn discover(
	scanner: &dyn TypeScanner,
	resolver: &dyn ConflictResolver,
) -> Result<ProviderTable, DiscoveryError> {
	let concrete_candidates = candidates(ProviderKind::Concrete, scanner);
	let mock_candidates = candidates(ProviderKind::Mock, scanner);
	let known: Map<TypeKey, ProviderDescriptor> = concrete_candidates
		.iter()
		.chain(&mock_candidates)
		.map(|d| (d.provider(), *d))
		.collect();

	let mut concrete = build_family(ProviderKind::Concrete, &concrete_candidates, &known, resolver)?;
	let mut mock = build_family(ProviderKind::Mock, &mock_candidates, &known, resolver)?;

	let mut collisions = std::mem::take(&mut concrete.collisions);
	collisions.append(&mut mock.collisions);
	resolve_cross_kind(&mut concrete.entries, &mut mock.entries, resolver, &mut collisions)?;

	tracing::debug!(
		domain = "providers",
		concrete = concrete.entries.len(),
		mock = mock.entries.len(),
		collisions = collisions.len(),
		"provider discovery complete",
	);

	Ok(ProviderTable {
		concrete: concrete.entries,
		mock: mock.entries,
		collisions,
	})
}

/// Scans one kind; link order is unspecified, so sort and let only the resolver decide ties.
fn candidates(kind: ProviderKind, scanner: &dyn TypeScanner) -> Vec<ProviderDescriptor> {
	let mut candidates = scanner.find(&|d| d.kind() == kind);
	candidates.sort_by_key(ProviderDescriptor::provider);
	candidates.dedup_by_key(|d| d.provider());
	candidates
}

/// Per-kind discovery output.
struct Family {
	entries: Map<TypeKey, ProviderEntry>,
	collisions: Vec<Collision>,
}

/// Who serves a target while a family is being built.
#[derive(Clone, Copy)]
enum Slot {
	Held(ProviderEntry),
	/// The resolver handed the target to a provider of the other kind.
	Ceded(Party),
}

impl Slot {
	fn party(self) -> Party {
		match self {
			Self::Held(entry) => entry.party(),
			Self::Ceded(party) => party,
		}
	}
}

fn build_family(
	kind: ProviderKind,
	candidates: &[ProviderDescriptor],
	known: &Map<TypeKey, ProviderDescriptor>,
	resolver: &dyn ConflictResolver,
) -> Result<Family, DiscoveryError> {
	let mut slots: Map<TypeKey, Slot> =
		Map::with_capacity_and_hasher(candidates.len(), Default::default());
	let mut collisions = Vec::new();

	for descriptor in candidates {
		let incoming = ProviderEntry::from_descriptor(descriptor)?;
		let target = incoming.target();
		tracing::trace!(
			domain = "providers",
			kind = %kind,
			provider = incoming.provider().name(),
			target = target.name(),
			crate_name = descriptor.crate_name(),
			"provider discovered",
		);

		let Some(existing) = slots.get(&target).copied() else {
			slots.insert(target, Slot::Held(incoming));
			continue;
		};
		if existing.party() == incoming.party() {
			continue;
		}

		let conflict = Conflict {
			target,
			existing: existing.party(),
			incoming: incoming.party(),
		};
		let winner = match resolver.resolve(&conflict) {
			Resolution::Unresolved => return Err(DiscoveryError::Unresolved { conflict }),
			Resolution::Use(w) if w == conflict.existing.provider => existing,
			Resolution::Use(w) if w == incoming.provider() => Slot::Held(incoming),
			Resolution::Use(w) => third_party(known, kind, &conflict, w)?,
		};

		tracing::debug!(
			domain = "providers",
			kind = %kind,
			target = target.name(),
			existing = conflict.existing.provider.name(),
			incoming = conflict.incoming.provider.name(),
			winner = winner.party().provider.name(),
			"provider collision resolved",
		);

		slots.insert(target, winner);
		collisions.push(Collision {
			conflict,
			winner: winner.party(),
		});
	}

	let entries = slots
		.into_iter()
		.filter_map(|(target, slot)| match slot {
			Slot::Held(entry) => Some((target, entry)),
			Slot::Ceded(_) => None,
		})
		.collect();
	Ok(Family {
		entries,
		collisions,
	})
}

/// Validates a resolver choice that is neither colliding party.
///
/// Any discovered provider for the same target qualifies; one of the other
/// kind takes the target away from this family.
fn third_party(
	known: &Map<TypeKey, ProviderDescriptor>,
	kind: ProviderKind,
	conflict: &Conflict,
	winner: TypeKey,
) -> Result<Slot, DiscoveryError> {
	let Some(descriptor) = known.get(&winner) else {
		return Err(DiscoveryError::UnknownWinner {
			target: conflict.target,
			winner,
			conflict: *conflict,
		});
	};
	let entry = ProviderEntry::from_descriptor(descriptor)?;
	if entry.target() != conflict.target {
		return Err(DiscoveryError::WinnerTargetMismatch {
			target: conflict.target,
			winner,
			winner_target: entry.target(),
		});
	}

	tracing::warn!(
		domain = "providers",
		target = conflict.target.name(),
		winner = winner.name(),
		winner_kind = %entry.kind(),
		"conflict resolver picked a provider outside the colliding pair",
	);
	if entry.kind() == kind {
		Ok(Slot::Held(entry))
	} else {
		Ok(Slot::Ceded(entry.party()))
	}
}

/// Enforces that an interface is served by at most one kind.
fn resolve_cross_kind(
	concrete: &mut Map<TypeKey, ProviderEntry>,
	mock: &mut Map<TypeKey, ProviderEntry>,
	resolver: &dyn ConflictResolver,
	collisions: &mut Vec<Collision>,
) -> Result<(), DiscoveryError> {
	let mut shared: Vec<TypeKey> = concrete
		.keys()
		.filter(|target| mock.contains_key(*target))
		.copied()
		.collect();
	shared.sort();

	for target in shared {
		let (Some(existing), Some(incoming)) = (concrete.get(&target).copied(), mock.get(&target).copied())
		else {
			continue;
		};
		let conflict = Conflict {
			target,
			existing: existing.party(),
			incoming: incoming.party(),
		};
		let winner = match resolver.resolve(&conflict) {
			Resolution::Unresolved => return Err(DiscoveryError::Unresolved { conflict }),
			Resolution::Use(w) if w == existing.provider() => {
				mock.remove(&target);
				existing
			}
			Resolution::Use(w) if w == incoming.provider() => {
				concrete.remove(&target);
				incoming
			}
			Resolution::Use(w) => {
				return Err(DiscoveryError::UnknownWinner {
					target,
					winner: w,
					conflict,
				});
			}
		};

		tracing::debug!(
			domain = "providers",
			target = target.name(),
			concrete = existing.provider().name(),
			mock = incoming.provider().name(),
			winner = winner.provider().name(),
			"cross-kind provider collision resolved",
		);
		collisions.push(Collision {
			conflict,
			winner: winner.party(),
		});
	}

	Ok(())
}
