use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::models::DriveFileDeleted;

/// Downstream notification of drive changes. Delivery is best effort.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish_file_deleted(&self, event: DriveFileDeleted) -> anyhow::Result<()>;
}

/// In-process bus backed by a broadcast channel
#[derive(Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<DriveFileDeleted>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DriveFileDeleted> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl EventBus for BroadcastEventBus {
    async fn publish_file_deleted(&self, event: DriveFileDeleted) -> anyhow::Result<()> {
        self.sender
            .send(event)
            .map_err(|_| anyhow::anyhow!("no subscribers for drive events"))?;
        Ok(())
    }
}

/// Log every deletion event until the bus closes
pub async fn log_file_deletions(mut rx: broadcast::Receiver<DriveFileDeleted>) {
    loop {
        match rx.recv().await {
            Ok(event) => tracing::info!(
                file_id = %event.file_id,
                owner = ?event.owner_id,
                deleted_by = ?event.deleted_by,
                "drive file deleted"
            ),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Drive event logger lagged, {} events dropped", n)
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> DriveFileDeleted {
        DriveFileDeleted {
            file_id: id.to_string(),
            owner_id: None,
            deleted_by: None,
            deleted_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = BroadcastEventBus::new(4);
        let mut rx = bus.subscribe();
        bus.publish_file_deleted(event("f1")).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().file_id, "f1");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_reports_error() {
        let bus = BroadcastEventBus::new(4);
        assert!(bus.publish_file_deleted(event("f1")).await.is_err());
    }
}
