//! Type-erased dispatch for providers.
//!
//! # Role
//!
//! The session stores providers of every interface in one table, so it can only
//! reach them through object-safe traits. [`ErasedConcrete`] and [`ErasedMock`]
//! are those entry points; [`implementation`] and [`configure`] restore the
//! static type at the call boundary with one checked downcast.
//!
//! # Invariants
//!
//! - An adapter only ever answers for the interface it was authored against.
//!   Anything else is an [`AdapterMismatch`], a bug in the caller rather than a
//!   user error.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use mockmod_stub::{MockHandle, Mockable};

use super::key::TypeKey;
use super::provider::{ConcreteProvider, MockProvider};
use crate::session::MockSession;

/// A provider was invoked for an interface it does not implement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provider {provider} is authored for {authored} but was invoked as {requested}")]
pub struct AdapterMismatch {
	pub provider: TypeKey,
	pub authored: TypeKey,
	pub requested: TypeKey,
}

pub(crate) trait ErasedConcrete: Send + Sync {
	fn provider(&self) -> TypeKey;

	fn target(&self) -> TypeKey;

	/// Returns a boxed `I::Object` when `requested` is the authored interface.
	fn implementation(
		&self,
		session: &MockSession,
		requested: TypeKey,
	) -> Result<Box<dyn Any>, AdapterMismatch>;
}

pub(crate) trait ErasedMock: Send + Sync {
	/// Configures `mock`, which must be a `MockHandle<I>` for the authored interface.
	fn configure(
		&self,
		session: &MockSession,
		requested: TypeKey,
		mock: &mut dyn Any,
	) -> Result<(), AdapterMismatch>;
}

#[derive(Clone)]
pub(crate) enum ErasedProvider {
	Concrete(Arc<dyn ErasedConcrete>),
	Mock(Arc<dyn ErasedMock>),
}

pub(crate) struct ConcreteAdapter<P, I: ?Sized> {
	provider: Arc<P>,
	_interface: PhantomData<fn() -> *const I>,
}

impl<P, I: ?Sized> ConcreteAdapter<P, I> {
	pub(crate) fn new(provider: Arc<P>) -> Self {
		Self {
			provider,
			_interface: PhantomData,
		}
	}
}

impl<P, I> ErasedConcrete for ConcreteAdapter<P, I>
where
	P: ConcreteProvider<I>,
	I: ?Sized + Mockable,
{
	fn provider(&self) -> TypeKey {
		TypeKey::of::<P>()
	}

	fn target(&self) -> TypeKey {
		TypeKey::of::<I>()
	}

	fn implementation(
		&self,
		session: &MockSession,
		requested: TypeKey,
	) -> Result<Box<dyn Any>, AdapterMismatch> {
		check::<P, I>(requested)?;
		let object = <P as ConcreteProvider<I>>::implementation(Arc::clone(&self.provider), session);
		Ok(Box::new(object))
	}
}

pub(crate) struct MockAdapter<P, I: ?Sized> {
	provider: Arc<P>,
	_interface: PhantomData<fn() -> *const I>,
}

impl<P, I: ?Sized> MockAdapter<P, I> {
	pub(crate) fn new(provider: Arc<P>) -> Self {
		Self {
			provider,
			_interface: PhantomData,
		}
	}
}

impl<P, I> ErasedMock for MockAdapter<P, I>
where
	P: MockProvider<I>,
	I: ?Sized + Mockable,
{
	fn configure(
		&self,
		session: &MockSession,
		requested: TypeKey,
		mock: &mut dyn Any,
	) -> Result<(), AdapterMismatch> {
		check::<P, I>(requested)?;
		let handle = mock
			.downcast_mut::<MockHandle<I>>()
			.ok_or_else(|| mismatch::<P, I>(requested))?;
		<P as MockProvider<I>>::configure(Arc::clone(&self.provider), session, handle);
		Ok(())
	}
}

fn check<P: 'static, I: ?Sized + 'static>(requested: TypeKey) -> Result<(), AdapterMismatch> {
	if requested.is::<I>() {
		Ok(())
	} else {
		Err(mismatch::<P, I>(requested))
	}
}

fn mismatch<P: 'static, I: ?Sized + 'static>(requested: TypeKey) -> AdapterMismatch {
	AdapterMismatch {
		provider: TypeKey::of::<P>(),
		authored: TypeKey::of::<I>(),
		requested,
	}
}

/// Calls a concrete provider through its erased entry point as interface `R`.
pub(crate) fn implementation<R: ?Sized + Mockable>(
	erased: &dyn ErasedConcrete,
	session: &MockSession,
) -> Result<R::Object, AdapterMismatch> {
	let requested = TypeKey::of::<R>();
	erased
		.implementation(session, requested)?
		.downcast::<R::Object>()
		.map(|object| *object)
		.map_err(|_| AdapterMismatch {
			provider: erased.provider(),
			authored: erased.target(),
			requested,
		})
}

/// Lets a mock provider configure `mock` through its erased entry point.
pub(crate) fn configure<R: ?Sized + Mockable>(
	erased: &dyn ErasedMock,
	session: &MockSession,
	mock: &mut MockHandle<R>,
) -> Result<(), AdapterMismatch> {
	erased.configure(session, TypeKey::of::<R>(), mock)
}
