//! Provider model: type keys, descriptors, provider traits, scanning and discovery.

mod adapter;
mod descriptor;
pub mod index;
mod key;
mod provider;
mod scanner;

pub(crate) use adapter::{ErasedProvider, configure, implementation};
pub use adapter::AdapterMismatch;
pub use descriptor::{Constructor, ProviderDescriptor, ProviderInstance, ProviderKind};
pub use index::{
	Collision, Conflict, ConflictResolver, DeclineConflicts, DiscoveryError, Party,
	PreferProviders, Preference, ProviderEntry, ProviderTable, Resolution, discover,
};
pub use key::TypeKey;
pub use provider::{ConcreteProvider, MockProvider};
pub use scanner::{InventoryScanner, SliceScanner, StaticScanner, TypeScanner};
