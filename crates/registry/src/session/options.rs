use std::fmt;
use std::str::FromStr;

use mockmod_stub::{BehaviorMode, StubError};

/// Environment variable overriding [`SessionOptions::behavior`].
pub const BEHAVIOR_ENV: &str = "MOCKMOD_BEHAVIOR";
/// Environment variable overriding [`SessionOptions::caching`].
pub const CACHING_ENV: &str = "MOCKMOD_CACHING";

/// Whether a session reuses provider instances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InstanceCaching {
	/// One instance per interface until [`MockSession::reset`](crate::MockSession::reset).
	#[default]
	PerEpoch,
	/// A fresh instance on every `setup_mock`; `get_mock` sees the latest one.
	Disabled,
}

impl InstanceCaching {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::PerEpoch => "per-epoch",
			Self::Disabled => "disabled",
		}
	}
}

impl fmt::Display for InstanceCaching {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for InstanceCaching {
	type Err = OptionsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"per-epoch" | "epoch" => Ok(Self::PerEpoch),
			"disabled" | "never" | "off" => Ok(Self::Disabled),
			_ => Err(OptionsError::UnknownCaching(s.to_string())),
		}
	}
}

/// Invalid session configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
	#[error("unknown caching mode {0:?} (expected \"per-epoch\" or \"disabled\")")]
	UnknownCaching(String),

	#[error(transparent)]
	Behavior(#[from] StubError),

	#[error("{var}: {source}")]
	Env {
		var: &'static str,
		#[source]
		source: Box<OptionsError>,
	},
}

/// Per-session settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionOptions {
	/// Behaviour of stubs built for interfaces without a concrete provider.
	pub behavior: BehaviorMode,
	pub caching: InstanceCaching,
}

impl SessionOptions {
	/// Loose stubs, per-epoch caching.
	pub const fn new() -> Self {
		Self {
			behavior: BehaviorMode::Loose,
			caching: InstanceCaching::PerEpoch,
		}
	}

	pub const fn with_behavior(mut self, behavior: BehaviorMode) -> Self {
		self.behavior = behavior;
		self
	}

	pub const fn with_caching(mut self, caching: InstanceCaching) -> Self {
		self.caching = caching;
		self
	}

	/// Applies [`BEHAVIOR_ENV`] and [`CACHING_ENV`] on top of `self`.
	///
	/// # Errors
	///
	/// Returns [`OptionsError::Env`] naming the variable whose value did not parse.
	pub fn apply_env(self) -> Result<Self, OptionsError> {
		self.apply_lookup(|var| std::env::var(var).ok())
	}

	/// Applies overrides read through `lookup`; unset variables keep the current value.
	///
	/// # Errors
	///
	/// Returns [`OptionsError::Env`] naming the variable whose value did not parse.
	pub fn apply_lookup(
		mut self,
		lookup: impl Fn(&'static str) -> Option<String>,
	) -> Result<Self, OptionsError> {
		if let Some(raw) = lookup(BEHAVIOR_ENV) {
			self.behavior = raw
				.parse::<BehaviorMode>()
				.map_err(|e| env_error(BEHAVIOR_ENV, e.into()))?;
		}
		if let Some(raw) = lookup(CACHING_ENV) {
			self.caching = raw
				.parse::<InstanceCaching>()
				.map_err(|e| env_error(CACHING_ENV, e))?;
		}
		Ok(self)
	}
}

fn env_error(var: &'static str, source: OptionsError) -> OptionsError {
	OptionsError::Env {
		var,
		source: Box::new(source),
	}
}
