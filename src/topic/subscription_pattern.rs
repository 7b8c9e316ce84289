//! Subscription pattern parsing

use std::fmt;

use arcstr::ArcStr;
use smallvec::SmallVec;

use super::pattern_segment::PatternSegment;
use crate::config::MatcherConfig;
use crate::error::PatternResult;

/// Rendered segments identifying the trie entry a pattern occupies
pub type CanonicalKey = SmallVec<[ArcStr; 8]>;

/// Parsed subscription pattern.
///
/// Keeps the text the subscriber supplied alongside its classified segments
/// and a canonical key holding one rendered string per segment. Segments
/// after the first multi-level wildcard are dropped, so `a/#` and `a/#/b`
/// share a key, as do patterns spelled with aliasing wildcard tokens. The
/// key is never joined back into a string: with a multi-character separator
/// two different segment lists could join to the same text.
#[derive(Debug, Clone)]
pub struct SubscriptionPattern {
	pattern: ArcStr,
	canonical: CanonicalKey,
	segments: SmallVec<[PatternSegment; 8]>,
}

impl SubscriptionPattern {
	/// Splits and classifies `pattern` according to `config`.
	pub fn parse(
		pattern: impl Into<ArcStr>,
		config: &MatcherConfig,
	) -> PatternResult<Self> {
		let pattern = pattern.into();
		let mut segments = SmallVec::<[PatternSegment; 8]>::new();

		for (position, raw) in pattern.split(config.separator()).enumerate() {
			let segment = PatternSegment::classify(
				pattern.substr_from(raw),
				position,
				config,
			)?;
			let is_last = segment == PatternSegment::Wildcard;
			segments.push(segment);
			if is_last {
				break;
			}
		}

		let canonical = segments
			.iter()
			.map(|segment| ArcStr::from(segment.render(config).as_ref()))
			.collect();

		Ok(Self {
			pattern,
			canonical,
			segments,
		})
	}

	/// Pattern as supplied by the subscriber
	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	/// Shared handle to the supplied pattern text
	pub fn pattern(&self) -> &ArcStr {
		&self.pattern
	}

	/// Key identifying the trie entry this pattern occupies
	pub fn canonical(&self) -> &[ArcStr] {
		&self.canonical
	}

	/// Classified segments
	pub fn segments(&self) -> &[PatternSegment] {
		&self.segments
	}

	/// Returns true if any segment is a wildcard or a regex
	pub fn has_wildcards(&self) -> bool {
		self.segments.iter().any(|segment| {
			segment.is_wildcard() || matches!(segment, PatternSegment::Regex(_))
		})
	}
}

impl fmt::Display for SubscriptionPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}
