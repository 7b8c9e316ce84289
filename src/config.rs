//! Configuration for the subscription matcher
//!
//! A [`MatcherConfig`] is built once, validated, and handed to
//! [`with_config`].
//! The registry never exposes setters, so the token sets a pattern was
//! classified with can't change while it is held in the trie.
//!
//! [`with_config`]: crate::SubscriptionRegistry::with_config

use std::fmt;

use arcstr::ArcStr;
use smallvec::SmallVec;
use thiserror::Error;

use crate::error::ConfigResult;

/// Default segment separator
pub const DEFAULT_SEPARATOR: &str = "/";
/// Default single-level wildcard token
pub const DEFAULT_SINGLE_LEVEL_WILDCARD: &str = "+";
/// Default multi-level wildcard token
pub const DEFAULT_MULTI_LEVEL_WILDCARD: &str = "#";

/// Wildcard class a token is mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardClass {
	/// Matches exactly one segment (`+`)
	SingleLevel,
	/// Matches any remaining segments (`#`)
	MultiLevel,
}

impl fmt::Display for WildcardClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			| WildcardClass::SingleLevel => {
				f.write_str("single-level wildcard")
			}
			| WildcardClass::MultiLevel => f.write_str("multi-level wildcard"),
		}
	}
}

/// Errors returned by [`MatcherConfigBuilder::build`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
	/// Separator is an empty string
	#[error("Segment separator cannot be empty")]
	EmptySeparator,

	/// No tokens were configured for a wildcard class
	#[error("At least one {class} token is required")]
	EmptyTokenSet {
		/// Class with no tokens
		class: WildcardClass,
	},

	/// A configured token is an empty string
	#[error("Empty {class} token")]
	EmptyToken {
		/// Class the empty token was given for
		class: WildcardClass,
	},

	/// A token or prefix contains the separator and could never be a segment
	#[error("'{token}' contains the segment separator '{separator}'")]
	ContainsSeparator {
		/// Offending token or prefix
		token: String,
		/// Configured separator
		separator: String,
	},

	/// Token is configured for both wildcard classes
	#[error(
		"Token '{token}' is configured as both single-level and multi-level \
		 wildcard"
	)]
	AmbiguousToken {
		/// Token present in both sets
		token: String,
	},

	/// Regex prefix is an empty string
	#[error("Regex prefix cannot be empty")]
	EmptyRegexPrefix,

	/// Regex prefix collides with a wildcard token
	#[error("Regex prefix '{prefix}' is also configured as a {class} token")]
	RegexPrefixConflict {
		/// Configured prefix
		prefix: String,
		/// Class of the colliding token
		class: WildcardClass,
	},
}

impl ConfigError {
	/// Creates a new ContainsSeparator error
	pub fn contains_separator(
		token: impl Into<String>,
		separator: impl Into<String>,
	) -> Self {
		Self::ContainsSeparator {
			token: token.into(),
			separator: separator.into(),
		}
	}
}

/// Ordered, deduplicated set of tokens aliasing one wildcard class.
///
/// The first token is the canonical spelling used when rendering patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
	tokens: SmallVec<[ArcStr; 2]>,
}

impl TokenSet {
	fn from_tokens<I, S>(tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<ArcStr>,
	{
		let mut set = SmallVec::<[ArcStr; 2]>::new();
		for token in tokens {
			let token = token.into();
			if !set.contains(&token) {
				set.push(token);
			}
		}
		Self { tokens: set }
	}

	/// Returns true if `segment` is one of the tokens
	pub fn contains(&self, segment: &str) -> bool {
		self.tokens.iter().any(|token| token.as_str() == segment)
	}

	/// Canonical token of the class
	pub fn canonical(&self) -> &str {
		self.tokens.first().map_or("", |token| token.as_str())
	}

	/// Iterates over tokens in configuration order
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(|token| token.as_str())
	}

}

/// Validated matcher configuration.
///
/// # Example
/// ```rust
/// use topic_submap::MatcherConfig;
///
/// let config = MatcherConfig::builder()
/// 	.separator(".")
/// 	.single_level_wildcards(["*", "+"])
/// 	.multi_level_wildcard(">")
/// 	.regex_prefix("~")
/// 	.build()?;
///
/// assert_eq!(config.separator(), ".");
/// assert_eq!(config.single_level_wildcards().canonical(), "*");
/// # Ok::<(), topic_submap::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
	separator: ArcStr,
	single_level_wildcards: TokenSet,
	multi_level_wildcards: TokenSet,
	regex_prefix: Option<ArcStr>,
	multi_level_matches_parent: bool,
}

impl Default for MatcherConfig {
	fn default() -> Self {
		Self {
			separator: ArcStr::from(DEFAULT_SEPARATOR),
			single_level_wildcards: TokenSet::from_tokens([
				DEFAULT_SINGLE_LEVEL_WILDCARD,
			]),
			multi_level_wildcards: TokenSet::from_tokens([
				DEFAULT_MULTI_LEVEL_WILDCARD,
			]),
			regex_prefix: None,
			multi_level_matches_parent: true,
		}
	}
}

impl MatcherConfig {
	/// Starts a builder populated with the defaults
	pub fn builder() -> MatcherConfigBuilder {
		MatcherConfigBuilder::default()
	}

	/// Segment separator
	pub fn separator(&self) -> &str {
		&self.separator
	}

	/// Tokens classified as single-level wildcards
	pub fn single_level_wildcards(&self) -> &TokenSet {
		&self.single_level_wildcards
	}

	/// Tokens classified as multi-level wildcards
	pub fn multi_level_wildcards(&self) -> &TokenSet {
		&self.multi_level_wildcards
	}

	/// Marker that turns a pattern segment into a regex, if enabled
	pub fn regex_prefix(&self) -> Option<&str> {
		self.regex_prefix.as_deref()
	}

	/// Whether `a/#` also matches the topic `a`
	pub fn multi_level_matches_parent(&self) -> bool {
		self.multi_level_matches_parent
	}
}

/// Builder for [`MatcherConfig`]
#[derive(Debug, Clone)]
pub struct MatcherConfigBuilder {
	separator: String,
	single_level_wildcards: Vec<String>,
	multi_level_wildcards: Vec<String>,
	regex_prefix: Option<String>,
	multi_level_matches_parent: bool,
}

impl Default for MatcherConfigBuilder {
	fn default() -> Self {
		Self {
			separator: DEFAULT_SEPARATOR.to_string(),
			single_level_wildcards: vec![
				DEFAULT_SINGLE_LEVEL_WILDCARD.to_string(),
			],
			multi_level_wildcards: vec![
				DEFAULT_MULTI_LEVEL_WILDCARD.to_string(),
			],
			regex_prefix: None,
			multi_level_matches_parent: true,
		}
	}
}

impl MatcherConfigBuilder {
	/// Sets the segment separator
	pub fn separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = separator.into();
		self
	}

	/// Replaces the single-level wildcard tokens with one token
	pub fn single_level_wildcard(mut self, token: impl Into<String>) -> Self {
		self.single_level_wildcards = vec![token.into()];
		self
	}

	/// Replaces the single-level wildcard tokens with aliases
	pub fn single_level_wildcards<I, S>(mut self, tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.single_level_wildcards =
			tokens.into_iter().map(Into::into).collect();
		self
	}

	/// Replaces the multi-level wildcard tokens with one token
	pub fn multi_level_wildcard(mut self, token: impl Into<String>) -> Self {
		self.multi_level_wildcards = vec![token.into()];
		self
	}

	/// Replaces the multi-level wildcard tokens with aliases
	pub fn multi_level_wildcards<I, S>(mut self, tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.multi_level_wildcards =
			tokens.into_iter().map(Into::into).collect();
		self
	}

	/// Enables regex segments marked by `prefix`
	pub fn regex_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.regex_prefix = Some(prefix.into());
		self
	}

	/// Controls whether a multi-level wildcard also matches its parent level
	pub fn multi_level_matches_parent(mut self, enabled: bool) -> Self {
		self.multi_level_matches_parent = enabled;
		self
	}

	/// Validates the settings and produces the configuration
	pub fn build(self) -> ConfigResult<MatcherConfig> {
		if self.separator.is_empty() {
			return Err(ConfigError::EmptySeparator);
		}

		self.validate_tokens(
			&self.single_level_wildcards,
			WildcardClass::SingleLevel,
		)?;
		self.validate_tokens(
			&self.multi_level_wildcards,
			WildcardClass::MultiLevel,
		)?;

		if let Some(token) = self
			.single_level_wildcards
			.iter()
			.find(|token| self.multi_level_wildcards.contains(token))
		{
			return Err(ConfigError::AmbiguousToken {
				token: token.clone(),
			});
		}

		if let Some(prefix) = &self.regex_prefix {
			if prefix.is_empty() {
				return Err(ConfigError::EmptyRegexPrefix);
			}
			if prefix.contains(self.separator.as_str()) {
				return Err(ConfigError::contains_separator(
					prefix.as_str(),
					self.separator.as_str(),
				));
			}
			let conflict = if self.single_level_wildcards.contains(prefix) {
				Some(WildcardClass::SingleLevel)
			} else if self.multi_level_wildcards.contains(prefix) {
				Some(WildcardClass::MultiLevel)
			} else {
				None
			};
			if let Some(class) = conflict {
				return Err(ConfigError::RegexPrefixConflict {
					prefix: prefix.clone(),
					class,
				});
			}
		}

		Ok(MatcherConfig {
			separator: ArcStr::from(self.separator),
			single_level_wildcards: TokenSet::from_tokens(
				self.single_level_wildcards,
			),
			multi_level_wildcards: TokenSet::from_tokens(
				self.multi_level_wildcards,
			),
			regex_prefix: self.regex_prefix.map(ArcStr::from),
			multi_level_matches_parent: self.multi_level_matches_parent,
		})
	}

	fn validate_tokens(
		&self,
		tokens: &[String],
		class: WildcardClass,
	) -> ConfigResult<()> {
		if tokens.is_empty() {
			return Err(ConfigError::EmptyTokenSet { class });
		}
		for token in tokens {
			if token.is_empty() {
				return Err(ConfigError::EmptyToken { class });
			}
			if token.contains(self.separator.as_str()) {
				return Err(ConfigError::contains_separator(
					token.as_str(),
					self.separator.as_str(),
				));
			}
		}
		Ok(())
	}
}
