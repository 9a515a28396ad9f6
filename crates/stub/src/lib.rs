//! Stateful stub objects for trait-object interfaces.
//!
//! # Purpose
//!
//! Build stand-in objects for an interface (a trait object type such as
//! `dyn Permissions`) without writing a fake by hand. A stub answers every
//! member it was not told about with a default value, remembers property
//! writes, and lets callers override individual members.
//!
//! # Mental Model
//!
//! 1. **Handle:** [`create_stub`] returns a [`MockHandle<I>`] wrapping a fresh [`Stub`].
//! 2. **Configuration:** [`MockHandle::returns`], [`MockHandle::returns_with`] and
//!    [`MockHandle::on_call`] override members by name.
//! 3. **Finalization:** [`MockHandle::object`] converts the stub into `I::Object`
//!    through the interface's [`Mockable`] adapter (usually generated by [`mockable!`]).
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Stub`] | Shared member table read by the generated adapter. |
//! | [`MockHandle`] | Typed configuration handle for one interface. |
//! | [`Mockable`] | Binds an interface type to its stub adapter. |
//! | [`BehaviorMode`] | Loose (defaults) or strict (panic on unconfigured reads). |

mod behavior;
mod error;
mod handle;
mod macros;
mod stub;

pub use behavior::BehaviorMode;
pub use error::StubError;
pub use handle::{MockHandle, Mockable, create_stub};
pub use stub::Stub;
