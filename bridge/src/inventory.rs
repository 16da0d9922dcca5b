//! Cached inventory of model identifiers.

use std::sync::Arc;

use tokio::sync::RwLock;

/// Ordered list of model identifiers known to the bridge.
///
/// The list is an immutable snapshot; a refresh builds a complete new list
/// and swaps the reference, so readers always see either the old or the new
/// inventory in full. Concurrent replacements are last-write-wins.
#[derive(Debug)]
pub struct ModelInventory {
    models: RwLock<Arc<[String]>>,
}

impl ModelInventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::with_models(Vec::new())
    }

    pub fn with_models(models: Vec<String>) -> Self {
        Self {
            models: RwLock::new(models.into()),
        }
    }

    /// Current snapshot. Cheap to clone, never changes under the caller.
    pub async fn snapshot(&self) -> Arc<[String]> {
        self.models.read().await.clone()
    }

    pub async fn contains(&self, model_id: &str) -> bool {
        self.models.read().await.iter().any(|m| m == model_id)
    }

    /// Replace the whole inventory, returning the new snapshot.
    pub async fn replace(&self, models: Vec<String>) -> Arc<[String]> {
        let snapshot: Arc<[String]> = models.into();
        *self.models.write().await = snapshot.clone();
        snapshot
    }
}

impl Default for ModelInventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_inventory() {
        let inventory = ModelInventory::new();
        assert!(inventory.snapshot().await.is_empty());
        assert!(!inventory.contains("llama3").await);
    }

    #[tokio::test]
    async fn test_replace_is_wholesale() {
        let inventory = ModelInventory::with_models(vec!["a".to_string(), "b".to_string()]);
        inventory.replace(vec!["c".to_string()]).await;

        assert_eq!(&*inventory.snapshot().await, &["c".to_string()]);
        assert!(!inventory.contains("a").await);
        assert!(inventory.contains("c").await);
    }

    #[tokio::test]
    async fn test_old_snapshot_is_unaffected_by_replace() {
        let inventory = ModelInventory::with_models(vec!["a".to_string()]);
        let before = inventory.snapshot().await;

        inventory.replace(vec!["x".to_string(), "y".to_string()]).await;

        assert_eq!(&*before, &["a".to_string()]);
        assert_eq!(inventory.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_replace_never_mixes_lists() {
        let inventory = Arc::new(ModelInventory::new());
        let left: Vec<String> = (0..50).map(|i| format!("left-{i}")).collect();
        let right: Vec<String> = (0..50).map(|i| format!("right-{i}")).collect();

        let mut handles = Vec::new();
        for round in 0..20 {
            let inventory = inventory.clone();
            let models = if round % 2 == 0 { left.clone() } else { right.clone() };
            handles.push(tokio::spawn(async move {
                inventory.replace(models).await;
                inventory.snapshot().await
            }));
        }

        for handle in handles {
            let snapshot = handle.await.unwrap();
            assert_eq!(snapshot.len(), 50);
            let prefix = if snapshot[0].starts_with("left") { "left" } else { "right" };
            assert!(snapshot.iter().all(|m| m.starts_with(prefix)));
        }
    }
}
