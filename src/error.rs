//! Error types and result aliases
//!
//! Each module keeps its own error type; [`SubMapError`] aggregates them
//! for callers that want a single error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::registry::RegistryError;
use crate::topic::PatternError;

/// Comprehensive error type for all crate operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubMapError {
	/// Matcher configuration was rejected
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),

	/// Subscription pattern could not be parsed
	#[error("Pattern error: {0}")]
	Pattern(#[from] PatternError),

	/// Registry operation failed
	#[error("Registry error: {0}")]
	Registry(#[from] RegistryError),
}

/// Convenient Result type for crate operations
pub type SubMapResult<T> = Result<T, SubMapError>;

/// Convenient Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenient Result type for pattern parsing
pub type PatternResult<T> = Result<T, PatternError>;

/// Convenient Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
