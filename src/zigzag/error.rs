//! Error types, one per failure domain.

use thiserror::Error;

/// A plugin could not be resolved from its configuration.
#[derive(Debug, Error)]
pub enum PluginError {
	/// Nothing is registered under the id.
	#[error("no {category} plugin registered as `{id}`")]
	NotFound {
		/// `data`, `layout` or `render`.
		category: &'static str,
		/// The requested id.
		id: String,
	},
	/// The factory built a plugin that reports another id.
	#[error("plugin `{found}` is not the requested plugin `{expected}`")]
	IdentityMismatch {
		/// The requested id.
		expected: String,
		/// What the plugin calls itself.
		found: String,
	},
	/// The plugin's API version falls outside the required range.
	#[error("plugin `{id}` provides API v{provided}, which does not satisfy `{required}`")]
	VersionMismatch {
		/// The plugin.
		id: String,
		/// Version the plugin implements.
		provided: semver::Version,
		/// Range from the configuration.
		required: semver::VersionReq,
	},
	/// The plugin's settings did not decode.
	#[error("invalid configuration for plugin `{id}`: {source}")]
	InvalidConfig {
		/// The plugin.
		id: String,
		/// Decoding failure.
		#[source]
		source: serde_json::Error,
	},
}

/// A data plugin failed to produce devices.
#[derive(Debug, Error)]
pub enum DataError {
	/// The source could not be read.
	#[error("fetch failed: {0}")]
	Fetch(String),
	/// The source was read but is not a device dump.
	#[error("malformed device data: {0}")]
	Parse(#[from] serde_json::Error),
	/// The settings name no usable source.
	#[error("invalid data plugin configuration: {0}")]
	InvalidConfig(String),
}

/// The device data violates the graph's referential contract.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
	/// A zag names a device that is not in the zig list.
	#[error("no zig `{missing}` for zag {from} -> {ieee}")]
	UnknownZig {
		/// The zag's neighbor.
		ieee: String,
		/// The zag's reporter.
		from: String,
		/// Whichever of the two is absent.
		missing: String,
	},
	/// Two zigs share an address.
	#[error("zig `{ieee}` appears more than once")]
	DuplicateZig {
		/// The shared address.
		ieee: String,
	},
}

/// A persisted view state that does not decode.
#[derive(Debug, Error)]
#[error("corrupt view state: {0}")]
pub struct ViewStateError(#[from] pub serde_json::Error);

/// Why a session could not start.
#[derive(Debug, Error)]
pub enum StartError {
	/// The render plugin refused the container.
	#[error("render plugin could not be initialised against the container")]
	RenderInit,
	/// `start` was called on a running session.
	#[error("a session is already running")]
	AlreadyRunning,
	/// The fetched data is inconsistent.
	#[error(transparent)]
	Inconsistent(#[from] GraphError),
}
