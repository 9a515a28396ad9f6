//! Stub adapter generation.

/// Generates a stub adapter for an interface and implements [`Mockable`](crate::Mockable) for it.
///
/// Each member is declared with its trait signature and mapped onto the stub:
///
/// - `#[get] fn name(&self) -> T;` reads property `name`.
/// - `#[set(prop)] fn name(&self, value: T);` writes property `prop`.
/// - `fn name(&self, a: A, b: B) -> T;` invokes member `name` with `(a, b)`.
///
/// Arguments must be owned (`'static`) values. The generated object type is
/// `Arc<dyn Trait>`.
///
/// ```rust,ignore
/// pub trait Permissions: Send + Sync {
///     fn is_allowed(&self) -> bool;
///     fn set_allowed(&self, allowed: bool);
/// }
///
/// mockable! {
///     pub PermissionsStub for dyn Permissions {
///         #[get] fn is_allowed(&self) -> bool;
///         #[set(is_allowed)] fn set_allowed(&self, allowed: bool);
///     }
/// }
/// ```
#[macro_export]
macro_rules! mockable {
	($vis:vis $stub:ident for dyn $iface:ident { $($members:tt)* }) => {
		$vis struct $stub($crate::Stub);

		impl $stub {
			/// Returns the member table behind this stub object.
			#[allow(dead_code, reason = "not every adapter is inspected directly")]
			pub fn stub(&self) -> &$crate::Stub {
				&self.0
			}
		}

		impl $iface for $stub {
			$crate::__stub_members! { $($members)* }
		}

		impl $crate::Mockable for dyn $iface {
			type Object = ::std::sync::Arc<dyn $iface>;

			fn from_stub(stub: $crate::Stub) -> Self::Object {
				::std::sync::Arc::new($stub(stub))
			}
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __stub_members {
	() => {};
	(#[get] fn $name:ident(&self) -> $ret:ty; $($rest:tt)*) => {
		fn $name(&self) -> $ret {
			self.0.get(stringify!($name))
		}
		$crate::__stub_members! { $($rest)* }
	};
	(#[set($prop:ident)] fn $name:ident(&self, $arg:ident: $ty:ty); $($rest:tt)*) => {
		fn $name(&self, $arg: $ty) {
			self.0.set(stringify!($prop), $arg)
		}
		$crate::__stub_members! { $($rest)* }
	};
	(fn $name:ident(&self $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?; $($rest:tt)*) => {
		fn $name(&self $(, $arg: $ty)*) $(-> $ret)? {
			self.0.call(stringify!($name), ($($arg,)*))
		}
		$crate::__stub_members! { $($rest)* }
	};
}
