//! Pattern segment classification

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use arcstr::Substr;
use regex::Regex;
use thiserror::Error;

use crate::config::MatcherConfig;
use crate::error::PatternResult;

/// Error types for subscription pattern parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
	/// Regex segment failed to compile
	#[error("Invalid regex '{segment}' at position {position}: {reason}")]
	InvalidRegex {
		/// Segment text including the prefix
		segment: String,
		/// Zero-based segment index in the pattern
		position: usize,
		/// Compiler message
		reason: String,
	},
}

impl PatternError {
	/// Creates a new InvalidRegex error
	pub fn invalid_regex(
		segment: impl Into<String>,
		position: usize,
		reason: impl Into<String>,
	) -> Self {
		Self::InvalidRegex {
			segment: segment.into(),
			position,
			reason: reason.into(),
		}
	}
}

/// Compiled regex matched against exactly one topic segment.
///
/// Two regex segments are equal when their source text is equal.
#[derive(Debug, Clone)]
pub struct RegexSegment {
	regex: Regex,
}

impl RegexSegment {
	/// Compiles `source`
	pub fn new(source: &str) -> Result<Self, regex::Error> {
		Ok(Self {
			regex: Regex::new(source)?,
		})
	}

	/// Source text the regex was compiled from
	pub fn source(&self) -> &str {
		self.regex.as_str()
	}

	/// Tests one literal topic segment
	pub fn is_match(&self, segment: &str) -> bool {
		self.regex.is_match(segment)
	}
}

impl PartialEq for RegexSegment {
	fn eq(&self, other: &Self) -> bool {
		self.source() == other.source()
	}
}

impl Eq for RegexSegment {}

impl Hash for RegexSegment {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.source().hash(state);
	}
}

/// One classified segment of a subscription pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
	/// Matched by exact string equality
	Literal(Substr),
	/// Matches any single segment (`+`)
	MatchAny,
	/// Matches the remaining segments (`#`)
	Wildcard,
	/// Matches a single segment accepted by the regex
	Regex(RegexSegment),
}

impl PatternSegment {
	/// Classifies one raw pattern segment.
	///
	/// Multi-level tokens win over single-level tokens, which win over the
	/// regex prefix. Everything else is a literal.
	pub fn classify(
		segment: Substr,
		position: usize,
		config: &MatcherConfig,
	) -> PatternResult<Self> {
		if config.multi_level_wildcards().contains(&segment) {
			return Ok(PatternSegment::Wildcard);
		}
		if config.single_level_wildcards().contains(&segment) {
			return Ok(PatternSegment::MatchAny);
		}
		if let Some(source) = config
			.regex_prefix()
			.and_then(|prefix| segment.strip_prefix(prefix))
		{
			return RegexSegment::new(source)
				.map(PatternSegment::Regex)
				.map_err(|err| {
					PatternError::invalid_regex(
						segment.as_str(),
						position,
						err.to_string(),
					)
				});
		}
		Ok(PatternSegment::Literal(segment))
	}

	/// Renders the segment with the canonical tokens of `config`
	pub fn render<'a>(&'a self, config: &'a MatcherConfig) -> Cow<'a, str> {
		match self {
			| PatternSegment::Literal(s) => Cow::Borrowed(s.as_str()),
			| PatternSegment::MatchAny => {
				Cow::Borrowed(config.single_level_wildcards().canonical())
			}
			| PatternSegment::Wildcard => {
				Cow::Borrowed(config.multi_level_wildcards().canonical())
			}
			| PatternSegment::Regex(regex) => Cow::Owned(format!(
				"{}{}",
				config.regex_prefix().unwrap_or_default(),
				regex.source()
			)),
		}
	}

	/// Returns true for `+` and `#` segments
	pub fn is_wildcard(&self) -> bool {
		matches!(self, PatternSegment::MatchAny | PatternSegment::Wildcard)
	}
}

impl fmt::Display for PatternSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			| PatternSegment::Literal(s) => f.write_str(s),
			| PatternSegment::MatchAny => f.write_str("<match-any>"),
			| PatternSegment::Wildcard => f.write_str("<wildcard>"),
			| PatternSegment::Regex(regex) => {
				write!(f, "<regex {}>", regex.source())
			}
		}
	}
}
