//! Publish-path routing demo
//!
//! Simulates a broker host: sessions connect and subscribe, a few messages
//! are routed to their subscribers, then a session disconnects.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example broker_router
//! ```

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use topic_submap::{
	MatcherConfig, RegistryError, SubMapResult, SubscriptionRegistry,
};

/// Setup tracing from RUST_LOG; stays silent when it is not set
fn setup_tracing() {
	if std::env::var("RUST_LOG_DISABLE").is_ok() {
		return;
	}
	let Ok(filter) = tracing_subscriber::EnvFilter::try_from_default_env()
	else {
		return;
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.init();
}

fn main() -> SubMapResult<()> {
	setup_tracing();

	let config = MatcherConfig::builder()
		.single_level_wildcards(["+", "*"])
		.regex_prefix("~")
		.build()?;
	let mut registry = SubscriptionRegistry::<String>::with_config(config);

	let sessions = [
		("dashboard", vec!["home/+/temperature", "home/alarm"]),
		("archiver", vec!["home/#"]),
		("rack-monitor", vec![r"~^rack\d+$/power/*"]),
		("broken", vec!["home/~(oops"]),
	];

	for (session, patterns) in &sessions {
		let session = session.to_string();
		registry.register_client(session.clone());
		for pattern in patterns {
			match registry.try_subscribe(*pattern, &session) {
				| Ok(_) => {}
				| Err(err @ RegistryError::InvalidPattern(_)) => {
					warn!(
						%session,
						%pattern,
						error = %err,
						"Subscribe refused"
					);
				}
				| Err(err) => return Err(err.into()),
			}
		}
	}

	info!(
		clients = registry.client_count(),
		subscriptions = registry.subscription_count(),
		"Sessions ready"
	);

	let published = [
		"home/kitchen/temperature",
		"home/alarm",
		"rack7/power/draw",
		"garden/sprinkler",
	];
	for topic in published {
		let mut targets: Vec<String> =
			registry.get_subscribers(topic).into_iter().collect();
		targets.sort();
		println!("{topic:<28} -> {targets:?}");
	}

	registry.unregister_client(&"archiver".to_string());
	println!(
		"after archiver disconnect, 'home/alarm' -> {:?}",
		registry.get_subscribers("home/alarm")
	);

	for (pattern, subscribers) in registry.active_patterns() {
		println!("{pattern:<28} {subscribers} subscriber(s)");
	}

	Ok(())
}
