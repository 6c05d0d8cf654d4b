//! Minimal embedding example for leaderwatch-core
//!
//! This example demonstrates using leaderwatch-core as a library in a
//! custom application. The tracker lifecycle is fully managed by the
//! application.

use std::sync::Arc;
use std::time::Duration;

use leaderwatch_core::traits::LogAbort;
use leaderwatch_core::{LeaderCache, LeaderWatchConfig, NodeTracker};
use leaderwatch_coord_memory::MemoryCoordinator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Embedded leaderwatch-core Example ===\n");

    // Create the coordination service (in-process for this example)
    let coordinator = MemoryCoordinator::new();

    // Create the tracker for the leader's well-known path
    println!("1. Creating tracker...");
    let config = LeaderWatchConfig::from_json_str(
        r#"{
            "session": { "type": "memory" },
            "watch": { "path": "/cluster/leader", "label": "leader-address" }
        }"#,
    )?;
    let (tracker, mut event_rx) = NodeTracker::new(config.watch, Arc::new(LogAbort))?;
    let tracker = Arc::new(tracker);

    // Spawn event listener (optional)
    let event_listener = tokio::spawn(async move {
        println!("2. Event listener started");
        while let Some(event) = event_rx.recv().await {
            println!("[Event] {:?}", event);
        }
        println!("Event listener stopped");
    });

    // Start tracking
    println!("3. Starting tracker...");
    tracker.start(Arc::new(coordinator.clone())).await?;

    // Wrap the tracker in the leader address cache
    let cache = LeaderCache::new(tracker.clone());
    println!(
        "4. No leader published yet: has_leader = {}",
        cache.has_leader()
    );

    // A leader publishes its address
    println!("\n5. Publishing leader address...");
    coordinator.publish("/cluster/leader", b"10.0.0.5:60000");

    let addr = cache
        .wait_for_address(Duration::from_secs(1))
        .await?
        .expect("leader should be visible within the deadline");
    println!("   Leader is at {}:{}", addr.host, addr.port);

    // The leader steps down
    println!("\n6. Deleting leader node...");
    coordinator.delete("/cluster/leader")?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    println!("   has_leader = {}", cache.has_leader());

    // Shutdown
    println!("\n7. Stopping tracker...");
    tracker.stop().await;
    let _ = tokio::time::timeout(Duration::from_millis(100), event_listener).await;

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- Tracker lifecycle is fully controlled by the application");
    println!("- The cache holds no state of its own");
    println!("- No global state");
    println!("- No reliance on process lifecycle");

    Ok(())
}
