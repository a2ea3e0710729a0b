//! Reference-data client with a per-collection TTL cache.
//!
//! Lists are cached by [`DictionaryKind`] and dropped on any write to the
//! same collection, so a create/update/delete is visible on the next read.

use super::api_client::{ApiClient, ApiError};
use crate::models::{DictionaryEntry, DictionaryKind};
use dashmap::DashMap;
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CachedList {
    fetched_at: Instant,
    entries: Arc<dyn Any + Send + Sync>,
}

pub struct DictionaryClient {
    api: Arc<ApiClient>,
    cache: DashMap<DictionaryKind, CachedList>,
    ttl: Duration,
}

impl DictionaryClient {
    pub fn new(api: Arc<ApiClient>, ttl: Duration) -> Self {
        Self {
            api,
            cache: DashMap::new(),
            ttl,
        }
    }

    /// All entries of `T`'s collection, served from cache while fresh.
    pub async fn list<T: DictionaryEntry>(&self) -> Result<Arc<Vec<T>>, ApiError> {
        if let Some(entries) = self.cached::<T>() {
            tracing::debug!(dictionary = %T::KIND, "Dictionary cache hit");
            return Ok(entries);
        }

        let entries: Arc<Vec<T>> = Arc::new(self.api.get(&collection_path(T::KIND)).await?);
        self.cache.insert(
            T::KIND,
            CachedList {
                fetched_at: Instant::now(),
                entries: entries.clone(),
            },
        );

        tracing::debug!(dictionary = %T::KIND, count = entries.len(), "Dictionary loaded");
        Ok(entries)
    }

    /// Look up one entry, using the cached list when it is fresh.
    pub async fn get<T: DictionaryEntry>(&self, id: &str) -> Result<T, ApiError> {
        if let Some(entries) = self.cached::<T>() {
            if let Some(entry) = entries.iter().find(|entry| entry.id() == id) {
                return Ok(entry.clone());
            }
        }

        self.api.get(&entry_path(T::KIND, id)).await
    }

    pub async fn create<T, B>(&self, body: &B) -> Result<T, ApiError>
    where
        T: DictionaryEntry,
        B: Serialize + ?Sized,
    {
        let created: T = self.api.post(&collection_path(T::KIND), body).await?;
        self.invalidate(T::KIND);
        Ok(created)
    }

    pub async fn update<T, B>(&self, id: &str, body: &B) -> Result<T, ApiError>
    where
        T: DictionaryEntry,
        B: Serialize + ?Sized,
    {
        let updated: T = self.api.put(&entry_path(T::KIND, id), body).await?;
        self.invalidate(T::KIND);
        Ok(updated)
    }

    pub async fn delete(&self, kind: DictionaryKind, id: &str) -> Result<(), ApiError> {
        self.api.delete(&entry_path(kind, id)).await?;
        self.invalidate(kind);
        Ok(())
    }

    pub fn invalidate(&self, kind: DictionaryKind) {
        if self.cache.remove(&kind).is_some() {
            tracing::debug!(dictionary = %kind, "Dictionary cache invalidated");
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    fn cached<T: DictionaryEntry>(&self) -> Option<Arc<Vec<T>>> {
        let fresh = self
            .cache
            .get(&T::KIND)
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.entries.clone());

        fresh.and_then(|entries| entries.downcast::<Vec<T>>().ok())
    }
}

fn collection_path(kind: DictionaryKind) -> String {
    format!("/dictionaries/{}", kind.path())
}

fn entry_path(kind: DictionaryKind, id: &str) -> String {
    format!("/dictionaries/{}/{}", kind.path(), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            collection_path(DictionaryKind::ExpenseArticles),
            "/dictionaries/expense-articles"
        );
        assert_eq!(
            entry_path(DictionaryKind::Normatives, "n-1"),
            "/dictionaries/normatives/n-1"
        );
    }
}
