//! Member table shared between a [`MockHandle`](crate::MockHandle) and the object built from it.
//!
//! # Invariants
//!
//! - Getter overrides shadow stored property values for the same member.
//! - The member lock is never held while a user callback runs.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{BehaviorMode, StubError};

type GetterFn = dyn Fn() -> Box<dyn Any> + Send + Sync;
type CallFn = dyn Fn(Box<dyn Any>) -> Option<Box<dyn Any>> + Send + Sync;

struct ValueSlot {
	value: Box<dyn Any + Send + Sync>,
	type_name: &'static str,
}

struct GetterSlot {
	f: Arc<GetterFn>,
	type_name: &'static str,
}

struct CallSlot {
	f: Arc<CallFn>,
	args: &'static str,
	ret: &'static str,
}

#[derive(Default)]
struct Members {
	values: FxHashMap<&'static str, ValueSlot>,
	getters: FxHashMap<&'static str, GetterSlot>,
	calls: FxHashMap<&'static str, CallSlot>,
}

struct StubState {
	interface: &'static str,
	behavior: BehaviorMode,
	members: Mutex<Members>,
}

/// Shared, cheaply cloneable member table backing a stub object.
///
/// Stub adapters read members by name: [`Stub::get`] for property reads,
/// [`Stub::set`] for property writes and [`Stub::call`] for everything else.
#[derive(Clone)]
pub struct Stub {
	state: Arc<StubState>,
}

impl Stub {
	/// Creates an empty stub for `interface`.
	pub fn new(interface: &'static str, behavior: BehaviorMode) -> Self {
		Self {
			state: Arc::new(StubState {
				interface,
				behavior,
				members: Mutex::new(Members::default()),
			}),
		}
	}

	/// Returns the interface name used in diagnostics.
	pub fn interface(&self) -> &'static str {
		self.state.interface
	}

	/// Returns the behaviour mode for unconfigured members.
	pub fn behavior(&self) -> BehaviorMode {
		self.state.behavior
	}

	/// Returns true if `member` has a stored value, getter or call handler.
	pub fn is_configured(&self, member: &str) -> bool {
		let members = self.state.members.lock();
		members.values.contains_key(member)
			|| members.getters.contains_key(member)
			|| members.calls.contains_key(member)
	}

	/// Stores a property value. Later writes replace earlier ones.
	pub fn set<V: Send + Sync + 'static>(&self, member: &'static str, value: V) {
		self.state.members.lock().values.insert(
			member,
			ValueSlot {
				value: Box::new(value),
				type_name: type_name::<V>(),
			},
		);
	}

	/// Overrides reads of `member` with a callback evaluated on every read.
	pub fn set_getter<V, F>(&self, member: &'static str, f: F)
	where
		V: 'static,
		F: Fn() -> V + Send + Sync + 'static,
	{
		self.state.members.lock().getters.insert(
			member,
			GetterSlot {
				f: Arc::new(move || Box::new(f()) as Box<dyn Any>),
				type_name: type_name::<V>(),
			},
		);
	}

	/// Handles calls to `member` with `f`. Arguments arrive as one value (a tuple for several).
	pub fn set_call<A, V, F>(&self, member: &'static str, f: F)
	where
		A: 'static,
		V: 'static,
		F: Fn(A) -> V + Send + Sync + 'static,
	{
		let handler = move |args: Box<dyn Any>| -> Option<Box<dyn Any>> {
			let args = args.downcast::<A>().ok()?;
			Some(Box::new(f(*args)))
		};
		self.state.members.lock().calls.insert(
			member,
			CallSlot {
				f: Arc::new(handler),
				args: type_name::<A>(),
				ret: type_name::<V>(),
			},
		);
	}

	/// Reads a property.
	///
	/// Getter overrides win over stored values. Unconfigured members yield
	/// `V::default()` for loose stubs.
	///
	/// # Errors
	///
	/// Returns [`StubError::Unconfigured`] for an unconfigured member of a strict
	/// stub and [`StubError::TypeMismatch`] when the member holds another type.
	pub fn try_get<V: Clone + Default + 'static>(&self, member: &'static str) -> Result<V, StubError> {
		let getter = {
			let members = self.state.members.lock();
			match members.getters.get(member) {
				Some(slot) => Some((Arc::clone(&slot.f), slot.type_name)),
				None => {
					if let Some(slot) = members.values.get(member) {
						return slot
							.value
							.downcast_ref::<V>()
							.cloned()
							.ok_or_else(|| self.mismatch(member, slot.type_name, type_name::<V>()));
					}
					None
				}
			}
		};

		match getter {
			Some((f, stored)) => f()
				.downcast::<V>()
				.map(|v| *v)
				.map_err(|_| self.mismatch(member, stored, type_name::<V>())),
			None => self.unconfigured(member),
		}
	}

	/// Reads a property, panicking on the errors [`Stub::try_get`] reports.
	///
	/// # Panics
	///
	/// Panics when a strict stub has no setup for `member` or when the
	/// configured type differs from `V`.
	pub fn get<V: Clone + Default + 'static>(&self, member: &'static str) -> V {
		self.try_get(member).unwrap_or_else(|e| panic!("{e}"))
	}

	/// Invokes the handler configured for `member`.
	///
	/// # Errors
	///
	/// Returns [`StubError::Unconfigured`] for an unhandled member of a strict
	/// stub and [`StubError::TypeMismatch`] when the argument or return type
	/// differs from the configured handler.
	pub fn try_call<A: 'static, V: Default + 'static>(
		&self,
		member: &'static str,
		args: A,
	) -> Result<V, StubError> {
		let handler = {
			let members = self.state.members.lock();
			members
				.calls
				.get(member)
				.map(|slot| (Arc::clone(&slot.f), slot.args, slot.ret))
		};

		let Some((f, stored_args, stored_ret)) = handler else {
			return self.unconfigured(member);
		};
		let Some(ret) = f(Box::new(args)) else {
			return Err(self.mismatch(member, stored_args, type_name::<A>()));
		};
		ret.downcast::<V>()
			.map(|v| *v)
			.map_err(|_| self.mismatch(member, stored_ret, type_name::<V>()))
	}

	/// Invokes a member, panicking on the errors [`Stub::try_call`] reports.
	///
	/// # Panics
	///
	/// Panics when a strict stub has no handler for `member` or the handler's
	/// types differ from `A`/`V`.
	pub fn call<A: 'static, V: Default + 'static>(&self, member: &'static str, args: A) -> V {
		self.try_call(member, args).unwrap_or_else(|e| panic!("{e}"))
	}

	fn unconfigured<V: Default>(&self, member: &'static str) -> Result<V, StubError> {
		match self.state.behavior {
			BehaviorMode::Loose => Ok(V::default()),
			BehaviorMode::Strict => Err(StubError::Unconfigured {
				interface: self.state.interface,
				member,
			}),
		}
	}

	fn mismatch(
		&self,
		member: &'static str,
		stored: &'static str,
		requested: &'static str,
	) -> StubError {
		tracing::warn!(
			domain = "stub",
			interface = self.state.interface,
			member,
			stored,
			requested,
			"stub member read with a different type than configured",
		);
		StubError::TypeMismatch {
			interface: self.state.interface,
			member,
			stored,
			requested,
		}
	}
}

impl fmt::Debug for Stub {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let members = self.state.members.lock();
		f.debug_struct("Stub")
			.field("interface", &self.state.interface)
			.field("behavior", &self.state.behavior)
			.field("values", &members.values.len())
			.field("getters", &members.getters.len())
			.field("calls", &members.calls.len())
			.finish()
	}
}
