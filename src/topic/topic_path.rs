//! Published topic tokenization

use std::fmt;

use arcstr::{ArcStr, Substr};
use smallvec::SmallVec;

/// Published topic split into literal segments.
///
/// Segments are [`Substr`] views into the shared topic string, so splitting
/// never copies segment text. An empty topic is a single empty segment.
#[derive(Debug, Clone)]
pub struct TopicPath {
	path: ArcStr,
	segments: SmallVec<[Substr; 8]>,
}

impl TopicPath {
	/// Splits `path` on `separator`
	pub fn new(path: impl Into<ArcStr>, separator: &str) -> Self {
		let path = path.into();
		let segments = path
			.split(separator)
			.map(|segment| path.substr_from(segment))
			.collect();
		Self { path, segments }
	}

	/// Literal segments in order
	pub fn segments(&self) -> &[Substr] {
		&self.segments
	}

	/// Number of segments
	pub fn depth(&self) -> usize {
		self.segments.len()
	}
}

impl fmt::Display for TopicPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.path)
	}
}
