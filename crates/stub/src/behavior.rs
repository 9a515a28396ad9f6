use std::fmt;
use std::str::FromStr;

use crate::StubError;

/// How a stub answers members nobody configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BehaviorMode {
	/// Unconfigured reads and calls return `Default::default()`; property writes are remembered.
	#[default]
	Loose,
	/// Unconfigured reads and calls panic. Property writes still count as configuration.
	Strict,
}

impl BehaviorMode {
	/// Returns the lowercase name used in configuration strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Loose => "loose",
			Self::Strict => "strict",
		}
	}
}

impl fmt::Display for BehaviorMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BehaviorMode {
	type Err = StubError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"loose" => Ok(Self::Loose),
			"strict" => Ok(Self::Strict),
			_ => Err(StubError::UnknownBehavior(s.to_string())),
		}
	}
}
