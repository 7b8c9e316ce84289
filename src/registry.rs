//! Client registry on top of the subscription trie

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use arcstr::ArcStr;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MatcherConfig;
use crate::error::RegistryResult;
use crate::topic::{
	CanonicalKey, PatternError, SubscriptionPattern, SubscriptionTrie,
	TopicPath,
};

/// Errors returned by the `try_*` registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// Client must be registered before it can hold subscriptions
	#[error("Client is not registered")]
	ClientNotRegistered,

	/// Pattern could not be parsed
	#[error("Invalid subscription pattern: {0}")]
	InvalidPattern(#[from] PatternError),
}

/// Patterns held by one client, keyed by canonical form
type ClientPatterns = HashMap<CanonicalKey, SubscriptionPattern>;

/// Tracks which patterns each client holds and routes topics to clients.
///
/// Every operation is synchronous; mutating calls take `&mut self`, so
/// sharing one registry between tasks needs an external lock or a single
/// owning task.
///
/// # Example
/// ```rust
/// use topic_submap::SubscriptionRegistry;
///
/// let mut registry = SubscriptionRegistry::new();
/// assert!(registry.register_client("kitchen-display"));
/// assert!(registry.subscribe("home/kitchen/+", &"kitchen-display"));
///
/// let subscribers = registry.get_subscribers("home/kitchen/temperature");
/// assert!(subscribers.contains("kitchen-display"));
/// assert_eq!(registry.subscription_count(), 1);
/// ```
#[derive(Debug)]
pub struct SubscriptionRegistry<C> {
	config: MatcherConfig,
	trie: SubscriptionTrie<C>,
	client_patterns: HashMap<C, ClientPatterns>,
	subscription_count: usize,
}

impl<C: Eq + Hash + Clone> Default for SubscriptionRegistry<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C: Eq + Hash + Clone> SubscriptionRegistry<C> {
	/// Creates a registry with the default configuration
	pub fn new() -> Self {
		Self::with_config(MatcherConfig::default())
	}

	/// Creates a registry matching with `config`
	pub fn with_config(config: MatcherConfig) -> Self {
		Self {
			trie: SubscriptionTrie::new(config.multi_level_matches_parent()),
			config,
			client_patterns: HashMap::new(),
			subscription_count: 0,
		}
	}

	/// Configuration the registry was built with
	pub fn config(&self) -> &MatcherConfig {
		&self.config
	}

	/// Read-only access to the trie
	pub fn trie(&self) -> &SubscriptionTrie<C> {
		&self.trie
	}

	/// Registers `client` with no subscriptions.
	/// Returns false if it is already registered.
	pub fn register_client(&mut self, client: C) -> bool {
		if self.client_patterns.contains_key(&client) {
			return false;
		}
		self.client_patterns.insert(client, ClientPatterns::new());
		debug!(clients = self.client_patterns.len(), "Client registered");
		true
	}

	/// Removes `client` and every subscription it holds.
	/// Returns false if it was not registered.
	pub fn unregister_client(&mut self, client: &C) -> bool {
		let Some(patterns) = self.client_patterns.remove(client) else {
			return false;
		};
		for pattern in patterns.values() {
			self.detach(pattern, client);
		}
		debug!(
			removed = patterns.len(),
			clients = self.client_patterns.len(),
			subscriptions = self.subscription_count,
			"Client unregistered"
		);
		true
	}

	/// Subscribes `client` to `pattern`.
	///
	/// Returns false if the client is not registered or the pattern is
	/// rejected; subscribing to a pattern already held returns true.
	pub fn subscribe(
		&mut self,
		pattern: impl Into<ArcStr>,
		client: &C,
	) -> bool {
		self.try_subscribe(pattern, client).is_ok()
	}

	/// Subscribes `client` to `pattern`.
	///
	/// Returns `Ok(true)` if the subscription was added and `Ok(false)` if
	/// the client already held an equivalent pattern. A malformed regex
	/// segment rejects the whole pattern before the trie is touched.
	pub fn try_subscribe(
		&mut self,
		pattern: impl Into<ArcStr>,
		client: &C,
	) -> RegistryResult<bool> {
		let patterns = self
			.client_patterns
			.get_mut(client)
			.ok_or(RegistryError::ClientNotRegistered)?;
		let pattern = SubscriptionPattern::parse(pattern, &self.config)
			.inspect_err(|err| warn!(error = %err, "Subscription rejected"))?;

		if patterns.contains_key(pattern.canonical()) {
			trace!(%pattern, "Pattern already held");
			return Ok(false);
		}

		let inserted = self.trie.insert(pattern.segments(), client.clone());
		debug_assert!(inserted, "BUG: trie already held pattern {pattern}");
		self.subscription_count += 1;
		debug!(
			%pattern,
			subscriptions = self.subscription_count,
			"Subscribed"
		);
		patterns.insert(pattern.canonical().into(), pattern);
		Ok(true)
	}

	/// Unsubscribes `client` from `pattern`.
	///
	/// Returns false if the client is not registered; unsubscribing a
	/// pattern that isn't held returns true.
	pub fn unsubscribe(
		&mut self,
		pattern: impl Into<ArcStr>,
		client: &C,
	) -> bool {
		match self.try_unsubscribe(pattern, client) {
			| Ok(_) | Err(RegistryError::InvalidPattern(_)) => true,
			| Err(RegistryError::ClientNotRegistered) => false,
		}
	}

	/// Unsubscribes `client` from `pattern`.
	///
	/// Returns `Ok(true)` if a subscription was removed and `Ok(false)` if
	/// none was held.
	pub fn try_unsubscribe(
		&mut self,
		pattern: impl Into<ArcStr>,
		client: &C,
	) -> RegistryResult<bool> {
		let patterns = self
			.client_patterns
			.get_mut(client)
			.ok_or(RegistryError::ClientNotRegistered)?;
		let pattern = SubscriptionPattern::parse(pattern, &self.config)?;

		let Some(held) = patterns.remove(pattern.canonical()) else {
			trace!(%pattern, "Pattern not held");
			return Ok(false);
		};
		let removed = self.trie.remove(held.segments(), client);
		debug_assert!(removed, "BUG: trie lost pattern {held}");
		self.subscription_count -= 1;
		debug!(
			pattern = %held,
			subscriptions = self.subscription_count,
			"Unsubscribed"
		);
		Ok(true)
	}

	/// Drops every subscription `client` holds but keeps it registered.
	/// Returns false if it was not registered.
	pub fn unsubscribe_all(&mut self, client: &C) -> bool {
		let Some(patterns) = self.client_patterns.get_mut(client) else {
			return false;
		};
		let held = std::mem::take(patterns);
		for pattern in held.values() {
			self.detach(pattern, client);
		}
		debug!(
			removed = held.len(),
			subscriptions = self.subscription_count,
			"Unsubscribed from all patterns"
		);
		true
	}

	/// Every client with a pattern matching `topic`, each reported once
	pub fn get_subscribers(&self, topic: impl Into<ArcStr>) -> HashSet<C> {
		let topic = TopicPath::new(topic, self.config.separator());
		let subscribers: HashSet<C> =
			self.trie.subscribers(&topic).into_iter().cloned().collect();
		trace!(%topic, matched = subscribers.len(), "Resolved subscribers");
		subscribers
	}

	/// Returns true if any client has a pattern matching `topic`
	pub fn is_subscribed(&self, topic: impl Into<ArcStr>) -> bool {
		let topic = TopicPath::new(topic, self.config.separator());
		self.trie.has_subscribers(&topic)
	}

	/// Registered clients, in no particular order
	pub fn list_clients(&self) -> impl Iterator<Item = &C> {
		self.client_patterns.keys()
	}

	/// Patterns held by `client`, spelled as they were subscribed.
	/// Yields nothing for an unknown client.
	pub fn list_topics(&self, client: &C) -> impl Iterator<Item = &ArcStr> {
		self.client_patterns
			.get(client)
			.into_iter()
			.flat_map(|patterns| patterns.values())
			.map(SubscriptionPattern::pattern)
	}

	/// Returns true if `client` is registered
	pub fn is_registered(&self, client: &C) -> bool {
		self.client_patterns.contains_key(client)
	}

	/// Number of live (client, pattern) subscriptions
	pub fn subscription_count(&self) -> usize {
		self.subscription_count
	}

	/// Number of registered clients
	pub fn client_count(&self) -> usize {
		self.client_patterns.len()
	}

	/// Returns true if no client is registered
	pub fn is_empty(&self) -> bool {
		self.client_patterns.is_empty()
	}

	/// `(canonical pattern, subscriber count)` for each occupied trie entry
	pub fn active_patterns(&self) -> Vec<(String, usize)> {
		self.trie.active_patterns(&self.config)
	}

	/// Drops every client and subscription
	pub fn clear(&mut self) {
		self.trie =
			SubscriptionTrie::new(self.config.multi_level_matches_parent());
		self.client_patterns.clear();
		self.subscription_count = 0;
		debug!("Registry cleared");
	}

	fn detach(&mut self, pattern: &SubscriptionPattern, client: &C) {
		let removed = self.trie.remove(pattern.segments(), client);
		debug_assert!(removed, "BUG: trie lost pattern {pattern}");
		self.subscription_count -= 1;
	}
}
