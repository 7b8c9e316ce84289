//! Randomised operation sequences checked against a naive model

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use regex::Regex;
use topic_submap::{MatcherConfig, SubscriptionRegistry};

const REGEX_PATTERNS: &[&str] = &[
	"a/b/c",
	"a/+/c",
	"a/#",
	"#",
	"+/b",
	"a/b",
	"a/+/#",
	r"~^b\d$/c",
	r"a/~^(b|x)$",
];

/// Several spellings share one canonical key under the aliased tokens
const ALIASED_PATTERNS: &[&str] = &[
	"a/b/c",
	"a/*/c",
	"a/+/c",
	"a/>",
	"a/#/b",
	"a/#",
	"#",
	">",
	"*/b",
	"+/b",
	"a/+/>",
	"a/b",
];

const TOPICS: &[&str] = &[
	"a", "a/b", "a/b/c", "a/x/c", "a/x", "b1/c", "b12/c", "x/b", "a/b/c/d",
];

#[derive(Debug, Clone)]
enum Op {
	Register(u8),
	Unregister(u8),
	Subscribe(u8, usize),
	Unsubscribe(u8, usize),
	UnsubscribeAll(u8),
}

fn op_strategy(pattern_count: usize) -> impl Strategy<Value = Op> {
	let client = 0u8 .. 4;
	let pattern = 0 .. pattern_count;
	prop_oneof![
		client.clone().prop_map(Op::Register),
		client.clone().prop_map(Op::Unregister),
		(client.clone(), pattern.clone())
			.prop_map(|(c, p)| Op::Subscribe(c, p)),
		(client.clone(), pattern).prop_map(|(c, p)| Op::Unsubscribe(c, p)),
		client.prop_map(Op::UnsubscribeAll),
	]
}

/// Spells aliases with the first token and drops levels after `#`
fn canonical(pattern: &str) -> String {
	let mut segments = Vec::new();
	for segment in pattern.split('/') {
		let segment = match segment {
			| "*" => "+",
			| ">" => "#",
			| other => other,
		};
		segments.push(segment);
		if segment == "#" {
			break;
		}
	}
	segments.join("/")
}

/// Segment-by-segment reference matcher over canonical patterns
fn reference_match(
	pattern: &[&str],
	topic: &[&str],
	matches_parent: bool,
) -> bool {
	match (pattern, topic) {
		| (["#", ..], []) => matches_parent,
		| (["#", ..], _) => true,
		| ([], []) => true,
		| ([], _) | (_, []) => false,
		| ([segment, pattern_rest @ ..], [level, topic_rest @ ..]) => {
			let matched = match segment.strip_prefix('~') {
				| Some(source) => Regex::new(source).unwrap().is_match(level),
				| None => *segment == "+" || segment == level,
			};
			matched && reference_match(pattern_rest, topic_rest, matches_parent)
		}
	}
}

fn expected_subscribers(
	model: &HashMap<u8, HashSet<String>>,
	topic: &str,
	matches_parent: bool,
) -> HashSet<u8> {
	let levels: Vec<&str> = topic.split('/').collect();
	model
		.iter()
		.filter(|(_, patterns)| {
			patterns.iter().any(|pattern| {
				let segments: Vec<&str> = pattern.split('/').collect();
				reference_match(&segments, &levels, matches_parent)
			})
		})
		.map(|(client, _)| *client)
		.collect()
}

fn check_against_model(
	config: MatcherConfig,
	patterns: &[&str],
	ops: Vec<Op>,
) -> Result<(), TestCaseError> {
	let matches_parent = config.multi_level_matches_parent();
	let mut registry = SubscriptionRegistry::with_config(config);
	let mut model: HashMap<u8, HashSet<String>> = HashMap::new();

	for op in ops {
		match op {
			| Op::Register(client) => {
				let fresh = !model.contains_key(&client);
				prop_assert_eq!(registry.register_client(client), fresh);
				model.entry(client).or_default();
			}
			| Op::Unregister(client) => {
				let known = model.remove(&client).is_some();
				prop_assert_eq!(registry.unregister_client(&client), known);
			}
			| Op::Subscribe(client, index) => {
				let pattern = patterns[index];
				let before = registry.subscription_count();
				let result = registry.subscribe(pattern, &client);
				match model.get_mut(&client) {
					| Some(held) => {
						prop_assert!(result);
						let added = held.insert(canonical(pattern));
						prop_assert_eq!(
							registry.subscription_count(),
							before + usize::from(added)
						);
					}
					| None => {
						prop_assert!(!result);
						prop_assert_eq!(registry.subscription_count(), before);
					}
				}
			}
			| Op::Unsubscribe(client, index) => {
				let pattern = patterns[index];
				let result = registry.unsubscribe(pattern, &client);
				match model.get_mut(&client) {
					| Some(held) => {
						prop_assert!(result);
						held.remove(&canonical(pattern));
					}
					| None => prop_assert!(!result),
				}
			}
			| Op::UnsubscribeAll(client) => {
				let result = registry.unsubscribe_all(&client);
				match model.get_mut(&client) {
					| Some(held) => {
						prop_assert!(result);
						held.clear();
					}
					| None => prop_assert!(!result),
				}
			}
		}

		let held: usize = model.values().map(HashSet::len).sum();
		prop_assert_eq!(registry.subscription_count(), held);
		let listed: usize = registry
			.list_clients()
			.map(|client| registry.list_topics(client).count())
			.sum();
		prop_assert_eq!(listed, held);
		prop_assert_eq!(registry.client_count(), model.len());
	}

	for topic in TOPICS {
		let expected = expected_subscribers(&model, topic, matches_parent);
		let actual = registry.get_subscribers(*topic);
		prop_assert_eq!(&actual, &expected, "topic {}", topic);
		prop_assert_eq!(
			registry.is_subscribed(*topic),
			!expected.is_empty()
		);
	}

	let clients: Vec<u8> = registry.list_clients().copied().collect();
	for client in clients {
		registry.unregister_client(&client);
	}
	prop_assert!(registry.trie().is_empty());
	prop_assert_eq!(registry.trie().node_count(), 1);
	prop_assert_eq!(registry.subscription_count(), 0);
	Ok(())
}

proptest! {
	#[test]
	fn registry_agrees_with_model(
		ops in prop::collection::vec(
			op_strategy(REGEX_PATTERNS.len()),
			0 .. 80,
		)
	) {
		let config = MatcherConfig::builder()
			.regex_prefix("~")
			.build()
			.unwrap();
		check_against_model(config, REGEX_PATTERNS, ops)?;
	}

	#[test]
	fn aliased_registry_agrees_with_model(
		ops in prop::collection::vec(
			op_strategy(ALIASED_PATTERNS.len()),
			0 .. 80,
		)
	) {
		let config = MatcherConfig::builder()
			.single_level_wildcards(["+", "*"])
			.multi_level_wildcards(["#", ">"])
			.multi_level_matches_parent(false)
			.build()
			.unwrap();
		check_against_model(config, ALIASED_PATTERNS, ops)?;
	}
}
