//! Leader failover walkthrough
//!
//! Simulates a cluster member following the leader across a failover:
//! the first leader publishes its address, dies (its node is deleted),
//! and a replacement publishes a new address. The member's blocked wait
//! picks up each leader as it appears.

use std::sync::Arc;
use std::time::Duration;

use leaderwatch_core::traits::LogAbort;
use leaderwatch_core::{LeaderCache, NodeTracker, WatchConfig};
use leaderwatch_coord_memory::MemoryCoordinator;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const LEADER_PATH: &str = "/cluster/leader";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let coordinator = MemoryCoordinator::new();

    let config = WatchConfig::new(LEADER_PATH).with_label("leader-address");
    let (tracker, _event_rx) = NodeTracker::new(config, Arc::new(LogAbort))?;
    let tracker = Arc::new(tracker);
    tracker.start(Arc::new(coordinator.clone())).await?;

    let cache = Arc::new(LeaderCache::new(tracker.clone()));

    // the member blocks until the first leader appears
    let member = tokio::spawn({
        let cache = cache.clone();
        async move {
            let addr = cache
                .wait_for_address(Duration::ZERO)
                .await?
                .expect("an indefinite wait only returns with a value");
            info!(host = %addr.host, port = addr.port, "member found the first leader");
            Ok::<_, anyhow::Error>(addr)
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    info!("leader-0 publishing its address");
    coordinator.publish(LEADER_PATH, b"leader-0.cluster.internal:7000");
    member.await??;

    // leader-0 dies; its ephemeral node goes away
    info!("leader-0 died, node deleted");
    coordinator.delete(LEADER_PATH)?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    info!(has_leader = cache.has_leader(), "between leaders");

    // the member waits again while the replacement comes up
    let member = tokio::spawn({
        let cache = cache.clone();
        async move {
            let addr = cache
                .wait_for_address(Duration::ZERO)
                .await?
                .expect("an indefinite wait only returns with a value");
            info!(host = %addr.host, port = addr.port, "member found the new leader");
            Ok::<_, anyhow::Error>(addr)
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    info!("leader-1 publishing its address");
    coordinator.publish(LEADER_PATH, b"leader-1.cluster.internal:7000");
    let addr = member.await??;
    assert_eq!(addr.host, "leader-1.cluster.internal");

    tracker.stop().await;
    info!("done");
    Ok(())
}
