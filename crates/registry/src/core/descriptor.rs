use std::any::Any;
use std::fmt;
use std::sync::Arc;

use mockmod_stub::Mockable;

use super::adapter::{ConcreteAdapter, ErasedProvider, MockAdapter};
use super::key::TypeKey;
use super::provider::{ConcreteProvider, MockProvider};

/// The two provider families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
	/// Hand-written fake returned as is.
	Concrete,
	/// Configuration applied to an auto-generated stub.
	Mock,
}

impl fmt::Display for ProviderKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Concrete => write!(f, "concrete"),
			Self::Mock => write!(f, "mock"),
		}
	}
}

/// Zero-argument constructor of a provider.
pub type Constructor = fn() -> ProviderInstance;

/// Static description of a provider, collected by the type scanner.
///
/// Built with `const` constructors so descriptors can be submitted to
/// `inventory` (see [`concrete_provider!`](crate::concrete_provider) and
/// [`mock_provider!`](crate::mock_provider)).
#[derive(Clone, Copy)]
pub struct ProviderDescriptor {
	kind: ProviderKind,
	provider: fn() -> TypeKey,
	target: fn() -> TypeKey,
	construct: Option<Constructor>,
	crate_name: &'static str,
}

impl ProviderDescriptor {
	/// Describes concrete provider `P` for interface `I`.
	pub const fn concrete<P, I>(crate_name: &'static str) -> Self
	where
		P: ConcreteProvider<I> + Default,
		I: ?Sized + Mockable,
	{
		Self {
			kind: ProviderKind::Concrete,
			provider: TypeKey::of::<P>,
			target: TypeKey::of::<I>,
			construct: Some(construct_concrete::<P, I> as Constructor),
			crate_name,
		}
	}

	/// Describes mock provider `P` for interface `I`.
	pub const fn mock<P, I>(crate_name: &'static str) -> Self
	where
		P: MockProvider<I> + Default,
		I: ?Sized + Mockable,
	{
		Self {
			kind: ProviderKind::Mock,
			provider: TypeKey::of::<P>,
			target: TypeKey::of::<I>,
			construct: Some(construct_mock::<P, I> as Constructor),
			crate_name,
		}
	}

	/// Describes a provider type that cannot be built without arguments.
	///
	/// Discovery rejects such descriptors with
	/// [`DiscoveryError::MissingConstructor`](crate::DiscoveryError::MissingConstructor).
	pub const fn without_constructor<P, I>(kind: ProviderKind, crate_name: &'static str) -> Self
	where
		P: ?Sized + 'static,
		I: ?Sized + 'static,
	{
		Self {
			kind,
			provider: TypeKey::of::<P>,
			target: TypeKey::of::<I>,
			construct: None,
			crate_name,
		}
	}

	#[inline]
	pub fn kind(&self) -> ProviderKind {
		self.kind
	}

	/// Returns the provider type.
	#[inline]
	pub fn provider(&self) -> TypeKey {
		(self.provider)()
	}

	/// Returns the interface the provider backs.
	#[inline]
	pub fn target(&self) -> TypeKey {
		(self.target)()
	}

	#[inline]
	pub fn constructor(&self) -> Option<Constructor> {
		self.construct
	}

	/// Returns the crate that declared the provider.
	#[inline]
	pub fn crate_name(&self) -> &'static str {
		self.crate_name
	}
}

impl fmt::Debug for ProviderDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderDescriptor")
			.field("kind", &self.kind)
			.field("provider", &self.provider())
			.field("target", &self.target())
			.field("constructible", &self.construct.is_some())
			.field("crate_name", &self.crate_name)
			.finish()
	}
}

inventory::collect!(ProviderDescriptor);

fn construct_concrete<P, I>() -> ProviderInstance
where
	P: ConcreteProvider<I> + Default,
	I: ?Sized + Mockable,
{
	ProviderInstance::concrete::<P, I>(Arc::new(P::default()))
}

fn construct_mock<P, I>() -> ProviderInstance
where
	P: MockProvider<I> + Default,
	I: ?Sized + Mockable,
{
	ProviderInstance::mock::<P, I>(Arc::new(P::default()))
}

/// A materialized provider.
///
/// Holds the provider twice: as an [`Any`] handle for retrieval by concrete
/// type, and behind its erased adapter for dispatch.
#[derive(Clone)]
pub struct ProviderInstance {
	provider: TypeKey,
	target: TypeKey,
	handle: Arc<dyn Any + Send + Sync>,
	erased: ErasedProvider,
}

impl ProviderInstance {
	/// Wraps an existing concrete provider.
	pub fn concrete<P, I>(provider: Arc<P>) -> Self
	where
		P: ConcreteProvider<I>,
		I: ?Sized + Mockable,
	{
		Self {
			provider: TypeKey::of::<P>(),
			target: TypeKey::of::<I>(),
			handle: provider.clone(),
			erased: ErasedProvider::Concrete(Arc::new(ConcreteAdapter::<P, I>::new(provider))),
		}
	}

	/// Wraps an existing mock provider.
	pub fn mock<P, I>(provider: Arc<P>) -> Self
	where
		P: MockProvider<I>,
		I: ?Sized + Mockable,
	{
		Self {
			provider: TypeKey::of::<P>(),
			target: TypeKey::of::<I>(),
			handle: provider.clone(),
			erased: ErasedProvider::Mock(Arc::new(MockAdapter::<P, I>::new(provider))),
		}
	}

	#[inline]
	pub fn provider(&self) -> TypeKey {
		self.provider
	}

	#[inline]
	pub fn target(&self) -> TypeKey {
		self.target
	}

	pub fn kind(&self) -> ProviderKind {
		match self.erased {
			ErasedProvider::Concrete(_) => ProviderKind::Concrete,
			ErasedProvider::Mock(_) => ProviderKind::Mock,
		}
	}

	/// Returns the provider as `P`, or `None` if it is another type.
	pub fn downcast<P: Any + Send + Sync>(&self) -> Option<Arc<P>> {
		Arc::clone(&self.handle).downcast::<P>().ok()
	}

	pub(crate) fn erased(&self) -> &ErasedProvider {
		&self.erased
	}
}

impl fmt::Debug for ProviderInstance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderInstance")
			.field("kind", &self.kind())
			.field("provider", &self.provider)
			.field("target", &self.target)
			.finish()
	}
}
