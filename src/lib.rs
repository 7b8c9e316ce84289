//! # Topic SubMap
//!
//! Subscription matching for publish/subscribe topic routing. Clients
//! register, hold subscription patterns, and published topics are resolved
//! to the set of clients whose patterns match.
//!
//! ## Features
//!
//! - **Wildcards**: single-level (`+`) and multi-level (`#`) segments, with
//!   configurable and aliasable tokens
//! - **Regex segments**: optional prefix-marked segments matched with the
//!   `regex` crate against one topic segment
//! - **Union matching**: a client reached through several overlapping
//!   patterns is reported once
//! - **Pruning**: the trie only ever holds nodes for live subscriptions
//! - **Idempotent bookkeeping**: duplicate subscribe/unsubscribe calls never
//!   double-count
//!
//! ## Quick Start
//!
//! ```rust
//! use topic_submap::{MatcherConfig, SubscriptionRegistry};
//!
//! let config = MatcherConfig::builder().regex_prefix("~").build()?;
//! let mut registry = SubscriptionRegistry::with_config(config);
//!
//! registry.register_client("alerts");
//! registry.register_client("archive");
//! registry.subscribe("sensors/+/temperature", &"alerts");
//! registry.subscribe(r"~^rack\d+$/#", &"archive");
//!
//! let subscribers = registry.get_subscribers("sensors/kitchen/temperature");
//! assert!(subscribers.contains("alerts"));
//! assert!(registry.is_subscribed("rack12/power/draw"));
//!
//! registry.unregister_client(&"archive");
//! assert!(!registry.is_subscribed("rack12/power/draw"));
//! # Ok::<(), topic_submap::ConfigError>(())
//! ```
//!
//! ## Pattern Matching
//!
//! - `+` matches exactly one topic level (`sensors/+/temperature`)
//! - `#` matches the remaining levels (`sensors/#`); by default it also
//!   matches its parent level (`sensors`)
//! - `~<regex>` (with a regex prefix configured) matches one level accepted
//!   by the regex

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod registry;
pub mod topic;


pub use config::{ConfigError, MatcherConfig, MatcherConfigBuilder};
pub use error::{SubMapError, SubMapResult};
pub use registry::{RegistryError, SubscriptionRegistry};
pub use topic::{PatternError, SubscriptionPattern, SubscriptionTrie, TopicPath};

/// Prelude module for convenient imports
///
/// ```rust
/// use topic_submap::prelude::*;
/// ```
pub mod prelude {
	//! Essential types for most applications

	pub use crate::{
		MatcherConfig, RegistryError, SubMapError, SubscriptionRegistry,
	};
}
