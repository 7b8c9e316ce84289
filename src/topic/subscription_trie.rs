//! Subscription trie keyed by pattern segments

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use arcstr::Substr;

use super::pattern_segment::{PatternSegment, RegexSegment};
use super::topic_path::TopicPath;
use crate::config::MatcherConfig;

/// Child reached through a regex segment
#[derive(Debug)]
struct RegexChild<C> {
	segment: RegexSegment,
	node: SubscriptionNode<C>,
}

/// Node in the subscription tree that represents one level of a pattern.
/// Used internally by [`SubscriptionTrie`].
#[derive(Debug)]
struct SubscriptionNode<C> {
	/// Clients whose pattern ends at this node
	exact_match_subscribers: HashSet<C>,

	/// Children nodes for exact matches of next segment
	exact_children: HashMap<Substr, SubscriptionNode<C>>,

	/// Node for '+' pattern wildcard match (single segment)
	single_level_wildcard_node: Option<Box<SubscriptionNode<C>>>,

	/// Regex children, unique by source text, in insertion order
	regex_children: Vec<RegexChild<C>>,

	/// Clients subscribed with '#' at this node
	multi_level_wildcard_subscribers: HashSet<C>,
}

impl<C> Default for SubscriptionNode<C> {
	fn default() -> Self {
		Self {
			exact_match_subscribers: HashSet::new(),
			exact_children: HashMap::new(),
			single_level_wildcard_node: None,
			regex_children: Vec::new(),
			multi_level_wildcard_subscribers: HashSet::new(),
		}
	}
}

impl<C: Eq + Hash> SubscriptionNode<C> {
	fn is_empty(&self) -> bool {
		self.exact_match_subscribers.is_empty()
			&& self.exact_children.is_empty()
			&& self.single_level_wildcard_node.is_none()
			&& self.regex_children.is_empty()
			&& self.multi_level_wildcard_subscribers.is_empty()
	}

	fn insert(&mut self, pattern: &[PatternSegment], client: C) -> bool {
		let mut current_node = self;

		for segment in pattern {
			match segment {
				| PatternSegment::Literal(s) => {
					current_node = current_node
						.exact_children
						.entry(s.clone())
						.or_default()
				}
				| PatternSegment::MatchAny => {
					current_node = current_node
						.single_level_wildcard_node
						.get_or_insert_with(Box::default)
				}
				| PatternSegment::Regex(regex) => {
					let index = match current_node
						.regex_children
						.iter()
						.position(|child| child.segment == *regex)
					{
						| Some(index) => index,
						| None => {
							current_node.regex_children.push(RegexChild {
								segment: regex.clone(),
								node: SubscriptionNode::default(),
							});
							current_node.regex_children.len() - 1
						}
					};
					current_node = &mut current_node.regex_children[index].node
				}
				| PatternSegment::Wildcard => {
					// '#' swallows the rest of the pattern
					return current_node
						.multi_level_wildcard_subscribers
						.insert(client);
				}
			}
		}
		current_node.exact_match_subscribers.insert(client)
	}

	/// Removes `client` and prunes children left empty on the way back up.
	fn remove(&mut self, pattern: &[PatternSegment], client: &C) -> bool {
		let [segment, rest @ ..] = pattern else {
			return self.exact_match_subscribers.remove(client);
		};

		match segment {
			| PatternSegment::Wildcard => {
				self.multi_level_wildcard_subscribers.remove(client)
			}
			| PatternSegment::Literal(s) => {
				let Some(child) = self.exact_children.get_mut(s) else {
					return false;
				};
				let removed = child.remove(rest, client);
				if child.is_empty() {
					self.exact_children.remove(s);
				}
				removed
			}
			| PatternSegment::MatchAny => {
				let Some(child) = self.single_level_wildcard_node.as_deref_mut()
				else {
					return false;
				};
				let removed = child.remove(rest, client);
				if child.is_empty() {
					self.single_level_wildcard_node = None;
				}
				removed
			}
			| PatternSegment::Regex(regex) => {
				let Some(index) = self
					.regex_children
					.iter()
					.position(|child| child.segment == *regex)
				else {
					return false;
				};
				let child = &mut self.regex_children[index].node;
				let removed = child.remove(rest, client);
				if child.is_empty() {
					self.regex_children.remove(index);
				}
				removed
			}
		}
	}

	/// Recursively collects every client whose pattern matches `topic`
	fn collect_subscribers<'a>(
		&'a self,
		topic: &[Substr],
		matches_parent: bool,
		result: &mut HashSet<&'a C>,
	) {
		match topic {
			| [] => {
				result.extend(&self.exact_match_subscribers);
				if matches_parent {
					result.extend(&self.multi_level_wildcard_subscribers);
				}
			}
			| [segment, rest @ ..] => {
				// '#' matches regardless of how many segments remain
				result.extend(&self.multi_level_wildcard_subscribers);

				if let Some(child) = self.exact_children.get(segment) {
					child.collect_subscribers(rest, matches_parent, result);
				}
				for child in &self.regex_children {
					if child.segment.is_match(segment) {
						child.node.collect_subscribers(
							rest,
							matches_parent,
							result,
						);
					}
				}
				if let Some(child) = &self.single_level_wildcard_node {
					child.collect_subscribers(rest, matches_parent, result);
				}
			}
		}
	}

	fn has_subscribers(&self, topic: &[Substr], matches_parent: bool) -> bool {
		match topic {
			| [] => {
				!self.exact_match_subscribers.is_empty()
					|| (matches_parent
						&& !self.multi_level_wildcard_subscribers.is_empty())
			}
			| [segment, rest @ ..] => {
				if !self.multi_level_wildcard_subscribers.is_empty() {
					return true;
				}
				let descend =
					|child: &Self| child.has_subscribers(rest, matches_parent);

				let regex_match = |child: &RegexChild<C>| {
					child.segment.is_match(segment) && descend(&child.node)
				};

				self.exact_children.get(segment).is_some_and(descend)
					|| self.regex_children.iter().any(regex_match)
					|| self
						.single_level_wildcard_node
						.as_deref()
						.is_some_and(descend)
			}
		}
	}

	fn node_count(&self) -> usize {
		1 + self.exact_children.values().map(Self::node_count).sum::<usize>()
			+ self
				.single_level_wildcard_node
				.as_deref()
				.map_or(0, Self::node_count)
			+ self
				.regex_children
				.iter()
				.map(|child| child.node.node_count())
				.sum::<usize>()
	}

	fn collect_active_patterns(
		&self,
		config: &MatcherConfig,
		current_path: &mut Vec<String>,
		result: &mut Vec<(String, usize)>,
	) {
		let separator = config.separator();
		if !self.exact_match_subscribers.is_empty() {
			result.push((
				current_path.join(separator),
				self.exact_match_subscribers.len(),
			));
		}
		if !self.multi_level_wildcard_subscribers.is_empty() {
			current_path
				.push(config.multi_level_wildcards().canonical().to_string());
			result.push((
				current_path.join(separator),
				self.multi_level_wildcard_subscribers.len(),
			));
			current_path.pop();
		}
		if let Some(child) = &self.single_level_wildcard_node {
			current_path
				.push(config.single_level_wildcards().canonical().to_string());
			child.collect_active_patterns(config, current_path, result);
			current_path.pop();
		}
		for child in &self.regex_children {
			current_path.push(format!(
				"{}{}",
				config.regex_prefix().unwrap_or_default(),
				child.segment.source()
			));
			child.node.collect_active_patterns(config, current_path, result);
			current_path.pop();
		}
		for (segment, child) in &self.exact_children {
			current_path.push(segment.to_string());
			child.collect_active_patterns(config, current_path, result);
			current_path.pop();
		}
	}
}

/// Subscription trie indexing client patterns by segment.
///
/// Matching walks every applicable branch at each level (literal, regex,
/// `+`, `#`) and returns the union of what it reaches, so a client reached
/// through several overlapping patterns is reported once.
#[derive(Debug)]
pub struct SubscriptionTrie<C> {
	root: SubscriptionNode<C>,
	multi_level_matches_parent: bool,
}

impl<C: Eq + Hash> Default for SubscriptionTrie<C> {
	fn default() -> Self {
		Self::new(true)
	}
}

impl<C: Eq + Hash> SubscriptionTrie<C> {
	/// Creates an empty trie.
	///
	/// With `multi_level_matches_parent` set, `a/#` also matches `a`.
	pub fn new(multi_level_matches_parent: bool) -> Self {
		Self {
			root: SubscriptionNode::default(),
			multi_level_matches_parent,
		}
	}

	/// Attaches `client` at the end of `pattern`, creating nodes as needed.
	/// Returns false if the client was already attached there.
	pub fn insert(&mut self, pattern: &[PatternSegment], client: C) -> bool {
		self.root.insert(pattern, client)
	}

	/// Detaches `client` from `pattern` and prunes emptied nodes.
	/// Returns false if the client was not attached there.
	pub fn remove(&mut self, pattern: &[PatternSegment], client: &C) -> bool {
		self.root.remove(pattern, client)
	}

	/// Finds all clients with a pattern matching `topic`
	pub fn subscribers(&self, topic: &TopicPath) -> HashSet<&C> {
		let mut result = HashSet::new();
		self.root.collect_subscribers(
			topic.segments(),
			self.multi_level_matches_parent,
			&mut result,
		);
		result
	}

	/// Returns true if at least one pattern matches `topic`
	pub fn has_subscribers(&self, topic: &TopicPath) -> bool {
		self.root
			.has_subscribers(topic.segments(), self.multi_level_matches_parent)
	}

	/// Returns true if the trie holds no subscriptions and no nodes besides
	/// the root
	pub fn is_empty(&self) -> bool {
		self.root.is_empty()
	}

	/// Number of live nodes, the root included
	pub fn node_count(&self) -> usize {
		self.root.node_count()
	}

	/// Reconstructs `(pattern, subscriber count)` for every occupied entry,
	/// with wildcards spelled using the canonical tokens of `config`.
	pub fn active_patterns(
		&self,
		config: &MatcherConfig,
	) -> Vec<(String, usize)> {
		let mut result = Vec::new();
		self.root
			.collect_active_patterns(config, &mut Vec::new(), &mut result);
		result
	}
}
