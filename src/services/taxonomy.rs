use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::models::TaxonomyOption;
use crate::services::store::{StoreError, TaxonomySource};

/// Taxonomy categories members may contribute custom options to
pub const CATEGORIES: [&str; 4] = ["profession", "goal", "interests", "hobbies"];

pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

#[derive(Debug, Default)]
struct Snapshot {
    by_category: HashMap<String, Vec<TaxonomyOption>>,
    refreshed_at: Option<DateTime<Utc>>,
}

/// Owned cache of taxonomy option labels, grouped by category
///
/// Contents change only through `refresh`, which replaces the whole snapshot.
#[derive(Debug, Default)]
pub struct TaxonomyCache {
    snapshot: RwLock<Snapshot>,
}

impl TaxonomyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload every option from `source`
    pub async fn refresh(&self, source: &dyn TaxonomySource) -> Result<usize, StoreError> {
        let options = source.list_options().await?;
        let count = options.len();

        let mut by_category: HashMap<String, Vec<TaxonomyOption>> = HashMap::new();
        for option in options {
            by_category.entry(option.category.clone()).or_default().push(option);
        }

        let mut snapshot = self.snapshot.write().await;
        snapshot.by_category = by_category;
        snapshot.refreshed_at = Some(Utc::now());

        tracing::debug!("Taxonomy cache refreshed with {} options", count);
        Ok(count)
    }

    /// Options for one category, in source order
    pub async fn options(&self, category: &str) -> Vec<TaxonomyOption> {
        self.snapshot
            .read()
            .await
            .by_category
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// Display label for a key, falling back to the key itself
    pub async fn label(&self, category: &str, key: &str) -> String {
        self.snapshot
            .read()
            .await
            .by_category
            .get(category)
            .and_then(|options| options.iter().find(|o| o.key == key))
            .map(|o| o.label.clone())
            .unwrap_or_else(|| key.to_string())
    }

    pub async fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.read().await.refreshed_at
    }
}
