//! Topic handling module
//!
//! This module provides components for working with topics and subscription
//! patterns: splitting, segment classification, and the subscription trie
//! that matches published topics against held patterns.

pub mod pattern_segment;
pub mod subscription_pattern;
pub mod subscription_trie;
pub mod topic_path;

#[cfg(test)]
mod pattern_segment_tests;

pub use pattern_segment::{PatternError, PatternSegment, RegexSegment};
pub use subscription_pattern::{CanonicalKey, SubscriptionPattern};
pub use subscription_trie::SubscriptionTrie;
pub use topic_path::TopicPath;
