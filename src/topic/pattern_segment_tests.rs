//! Tests for segment classification and pattern parsing

use arcstr::{ArcStr, Substr};

use super::{PatternError, PatternSegment, SubscriptionPattern};
use crate::config::MatcherConfig;

fn regex_config() -> MatcherConfig {
	MatcherConfig::builder()
		.single_level_wildcards(["+", "*"])
		.multi_level_wildcards(["#", ">"])
		.regex_prefix("~")
		.build()
		.unwrap()
}

fn classify(segment: &str, config: &MatcherConfig) -> PatternSegment {
	PatternSegment::classify(Substr::from(segment), 0, config).unwrap()
}

fn canonical_key(pattern: &SubscriptionPattern) -> Vec<&str> {
	pattern.canonical().iter().map(ArcStr::as_str).collect()
}

#[test]
fn test_literal_segment() {
	let config = MatcherConfig::default();
	let segment = classify("sensors", &config);

	assert_eq!(segment, PatternSegment::Literal(Substr::from("sensors")));
	assert_eq!(segment.render(&config), "sensors");
	assert!(!segment.is_wildcard());
}

#[test]
fn test_default_wildcards() {
	let config = MatcherConfig::default();

	assert_eq!(classify("+", &config), PatternSegment::MatchAny);
	assert_eq!(classify("#", &config), PatternSegment::Wildcard);
	assert!(classify("+", &config).is_wildcard());
	assert!(classify("#", &config).is_wildcard());
}

#[test]
fn test_wildcard_tokens_inside_text_are_literal() {
	let config = MatcherConfig::default();

	assert_eq!(
		classify("a+b", &config),
		PatternSegment::Literal(Substr::from("a+b"))
	);
	assert_eq!(
		classify("##", &config),
		PatternSegment::Literal(Substr::from("##"))
	);
}

#[test]
fn test_aliased_tokens() {
	let config = regex_config();

	assert_eq!(classify("*", &config), PatternSegment::MatchAny);
	assert_eq!(classify(">", &config), PatternSegment::Wildcard);
	assert_eq!(classify("*", &config).render(&config), "+");
	assert_eq!(classify(">", &config).render(&config), "#");
}

#[test]
fn test_regex_segment() {
	let config = regex_config();
	let segment = classify(r"~^test\d+$", &config);

	let PatternSegment::Regex(regex) = &segment else {
		panic!("Expected regex segment, got {segment:?}");
	};
	assert_eq!(regex.source(), r"^test\d+$");
	assert!(regex.is_match("test1"));
	assert!(regex.is_match("test3333"));
	assert!(!regex.is_match("test3333a"));
	assert_eq!(segment.render(&config), r"~^test\d+$");
}

#[test]
fn test_regex_search_is_unanchored() {
	let config = regex_config();
	let PatternSegment::Regex(regex) = classify("~temp", &config) else {
		panic!("Expected regex segment");
	};
	assert!(regex.is_match("temperature"));
	assert!(regex.is_match("cpu-temp"));
}

#[test]
fn test_regex_disabled_without_prefix() {
	let config = MatcherConfig::default();
	assert_eq!(
		classify(r"~^test\d+$", &config),
		PatternSegment::Literal(Substr::from(r"~^test\d+$"))
	);
}

#[test]
fn test_regex_segments_compare_by_source() {
	let config = regex_config();
	assert_eq!(classify("~^a.*$", &config), classify("~^a.*$", &config));
	assert_ne!(classify("~^a.*$", &config), classify("~^a.+$", &config));
}

#[test]
fn test_invalid_regex_reports_position() {
	let config = regex_config();
	let result = SubscriptionPattern::parse("devices/~([a-z/status", &config);
	// the separator splits the broken group across two segments
	let Err(PatternError::InvalidRegex {
		segment, position, ..
	}) = result
	else {
		panic!("Expected InvalidRegex error");
	};
	assert_eq!(segment, "~([a-z");
	assert_eq!(position, 1);
}

#[test]
fn test_pattern_segments() {
	let config = regex_config();
	let pattern =
		SubscriptionPattern::parse(r"home/+/~^temp\d$/#", &config).unwrap();

	assert_eq!(pattern.as_str(), r"home/+/~^temp\d$/#");
	assert_eq!(pattern.segments().len(), 4);
	assert_eq!(
		pattern.segments()[0],
		PatternSegment::Literal(Substr::from("home"))
	);
	assert_eq!(pattern.segments()[1], PatternSegment::MatchAny);
	assert!(matches!(pattern.segments()[2], PatternSegment::Regex(_)));
	assert_eq!(pattern.segments()[3], PatternSegment::Wildcard);
	assert!(pattern.has_wildcards());
}

#[test]
fn test_segments_after_multi_level_wildcard_are_dropped() {
	let config = MatcherConfig::default();
	let truncated = SubscriptionPattern::parse("a/#/b/c", &config).unwrap();
	let plain = SubscriptionPattern::parse("a/#", &config).unwrap();

	assert_eq!(truncated.segments(), plain.segments());
	assert_eq!(truncated.canonical(), plain.canonical());
	assert_eq!(truncated.as_str(), "a/#/b/c");
}

#[test]
fn test_canonical_key_uses_first_alias() {
	let config = regex_config();
	let starred = SubscriptionPattern::parse("a/*/>", &config).unwrap();
	let plussed = SubscriptionPattern::parse("a/+/#", &config).unwrap();

	assert_eq!(canonical_key(&starred), ["a", "+", "#"]);
	assert_eq!(starred.canonical(), plussed.canonical());
}

#[test]
fn test_canonical_key_keeps_segment_boundaries() {
	let config = MatcherConfig::builder()
		.separator("::")
		.single_level_wildcards(["x:", "*"])
		.build()
		.unwrap();
	let aliased = SubscriptionPattern::parse("*::b", &config).unwrap();
	let literal = SubscriptionPattern::parse("x:::b", &config).unwrap();

	assert_eq!(canonical_key(&aliased), ["x:", "b"]);
	assert_eq!(canonical_key(&literal), ["x", ":b"]);
	assert_ne!(aliased.canonical(), literal.canonical());
}

#[test]
fn test_custom_separator() {
	let config = MatcherConfig::builder()
		.separator(".")
		.single_level_wildcard("*")
		.multi_level_wildcard(">")
		.build()
		.unwrap();
	let pattern = SubscriptionPattern::parse("orders.*.>", &config).unwrap();

	assert_eq!(pattern.segments().len(), 3);
	assert_eq!(pattern.segments()[1], PatternSegment::MatchAny);
	assert_eq!(pattern.segments()[2], PatternSegment::Wildcard);
	assert_eq!(canonical_key(&pattern), ["orders", "*", ">"]);

	// '/' carries no meaning with '.' as separator
	let literal = SubscriptionPattern::parse("a/b", &config).unwrap();
	assert_eq!(literal.segments().len(), 1);
}

#[test]
fn test_empty_pattern_is_one_empty_literal() {
	let config = MatcherConfig::default();
	let pattern = SubscriptionPattern::parse("", &config).unwrap();
	assert_eq!(
		pattern.segments(),
		&[PatternSegment::Literal(Substr::from(""))]
	);
	assert!(!pattern.has_wildcards());
}
