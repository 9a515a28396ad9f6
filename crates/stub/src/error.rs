/// Failures raised by stub objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StubError {
	/// A strict stub was asked for a member nobody configured.
	#[error("strict stub for {interface} has no setup for member `{member}`")]
	Unconfigured {
		interface: &'static str,
		member: &'static str,
	},
	/// A member was configured with one type and read as another.
	#[error("member `{member}` of {interface} holds {stored}, read as {requested}")]
	TypeMismatch {
		interface: &'static str,
		member: &'static str,
		stored: &'static str,
		requested: &'static str,
	},
	/// A behaviour mode string did not name a known mode.
	#[error("unknown behavior mode {0:?} (expected \"loose\" or \"strict\")")]
	UnknownBehavior(String),
}
