//! Provider discovery sources.

use super::descriptor::ProviderDescriptor;

/// Enumerates declared providers matching a predicate.
///
/// Implementations must be side-effect free and return the same set for the
/// lifetime of the process; discovery calls [`TypeScanner::find`] once per
/// provider kind.
pub trait TypeScanner: Send + Sync {
	/// Returns every known descriptor for which `predicate` holds.
	fn find(&self, predicate: &dyn Fn(&ProviderDescriptor) -> bool) -> Vec<ProviderDescriptor>;
}

/// Scans descriptors submitted with `inventory::submit!` anywhere in the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct InventoryScanner;

impl TypeScanner for InventoryScanner {
	fn find(&self, predicate: &dyn Fn(&ProviderDescriptor) -> bool) -> Vec<ProviderDescriptor> {
		inventory::iter::<ProviderDescriptor>
			.into_iter()
			.filter(|d| predicate(d))
			.copied()
			.collect()
	}
}

/// Serves an explicit descriptor list.
#[derive(Clone, Debug, Default)]
pub struct StaticScanner {
	descriptors: Vec<ProviderDescriptor>,
}

impl StaticScanner {
	pub fn new(descriptors: impl IntoIterator<Item = ProviderDescriptor>) -> Self {
		Self {
			descriptors: descriptors.into_iter().collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.descriptors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.descriptors.is_empty()
	}
}

impl TypeScanner for StaticScanner {
	fn find(&self, predicate: &dyn Fn(&ProviderDescriptor) -> bool) -> Vec<ProviderDescriptor> {
		self.descriptors
			.iter()
			.filter(|d| predicate(d))
			.copied()
			.collect()
	}
}

/// Serves a fixed descriptor slice; usable in `static` suite configuration.
#[derive(Clone, Copy, Debug)]
pub struct SliceScanner(pub &'static [ProviderDescriptor]);

impl TypeScanner for SliceScanner {
	fn find(&self, predicate: &dyn Fn(&ProviderDescriptor) -> bool) -> Vec<ProviderDescriptor> {
		self.0.iter().filter(|d| predicate(d)).copied().collect()
	}
}
