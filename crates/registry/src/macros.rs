//! Provider registration macros.

/// Registers a concrete provider with the inventory scanner.
///
/// The provider type must implement `Default` and
/// [`ConcreteProvider`](crate::ConcreteProvider) for the interface.
///
/// ```rust,ignore
/// concrete_provider!(RecordingLogger, dyn Logger);
/// ```
#[macro_export]
macro_rules! concrete_provider {
	($provider:ty, $iface:ty $(,)?) => {
		$crate::inventory::submit! {
			$crate::ProviderDescriptor::concrete::<$provider, $iface>(env!("CARGO_PKG_NAME"))
		}
	};
}

/// Registers a mock provider with the inventory scanner.
///
/// The provider type must implement `Default` and
/// [`MockProvider`](crate::MockProvider) for the interface.
///
/// ```rust,ignore
/// mock_provider!(MockPermissionsV1, dyn Permissions);
/// ```
#[macro_export]
macro_rules! mock_provider {
	($provider:ty, $iface:ty $(,)?) => {
		$crate::inventory::submit! {
			$crate::ProviderDescriptor::mock::<$provider, $iface>(env!("CARGO_PKG_NAME"))
		}
	};
}
