use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::{BehaviorMode, Stub};

/// Binds an interface type to the object a stub turns into.
///
/// Implemented on the trait object type itself (`impl Mockable for dyn Permissions`),
/// normally through [`mockable!`](crate::mockable).
pub trait Mockable: 'static {
	/// What callers receive, e.g. `Arc<dyn Permissions>`.
	type Object: 'static;

	/// Wraps `stub` in the interface's stub adapter.
	fn from_stub(stub: Stub) -> Self::Object;
}

/// Creates a fresh, unconfigured stub handle for `I`.
pub fn create_stub<I: ?Sized + Mockable>(behavior: BehaviorMode) -> MockHandle<I> {
	MockHandle::new(behavior)
}

/// Typed configuration handle for a stub of interface `I`.
///
/// Objects handed out by [`MockHandle::object`] share the handle's member table,
/// so configuration applied after finalization is still observed.
pub struct MockHandle<I: ?Sized> {
	stub: Stub,
	_interface: PhantomData<fn() -> *const I>,
}

impl<I: ?Sized + Mockable> MockHandle<I> {
	/// Creates an unconfigured handle.
	pub fn new(behavior: BehaviorMode) -> Self {
		Self {
			stub: Stub::new(type_name::<I>(), behavior),
			_interface: PhantomData,
		}
	}

	/// Returns the behaviour mode the stub was created with.
	pub fn behavior(&self) -> BehaviorMode {
		self.stub.behavior()
	}

	/// Returns the underlying member table.
	pub fn stub(&self) -> &Stub {
		&self.stub
	}

	/// Makes every read of `member` return a clone of `value`.
	pub fn returns<V>(&mut self, member: &'static str, value: V) -> &mut Self
	where
		V: Clone + Send + Sync + 'static,
	{
		self.stub.set_getter(member, move || value.clone());
		self
	}

	/// Makes every read of `member` return the result of `f`.
	pub fn returns_with<V, F>(&mut self, member: &'static str, f: F) -> &mut Self
	where
		V: 'static,
		F: Fn() -> V + Send + Sync + 'static,
	{
		self.stub.set_getter(member, f);
		self
	}

	/// Routes calls of `member` to `f`.
	pub fn on_call<A, V, F>(&mut self, member: &'static str, f: F) -> &mut Self
	where
		A: 'static,
		V: 'static,
		F: Fn(A) -> V + Send + Sync + 'static,
	{
		self.stub.set_call(member, f);
		self
	}

	/// Seeds a property value; later writes through the object replace it.
	pub fn set_property<V: Send + Sync + 'static>(&mut self, member: &'static str, value: V) -> &mut Self {
		self.stub.set(member, value);
		self
	}

	/// Finalizes the stub into the interface object.
	pub fn object(&self) -> I::Object {
		I::from_stub(self.stub.clone())
	}
}

impl<I: ?Sized> fmt::Debug for MockHandle<I> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MockHandle").field("stub", &self.stub).finish()
	}
}
