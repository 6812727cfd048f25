mod dto;
mod members;
mod providers;
mod sample_data;

pub use dto::{
    CreateMember, CreateProvider, MemberDto, ProviderDto, UpdateMember, UpdateProvider,
};
pub use sample_data::SampleDataSummary;

use chrono::{Local, NaiveDate};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::RecordCache;
use crate::config::SearchConfig;
use crate::db::Database;
use crate::error::{CacheError, ServiceResult, format_error_chain};

/// Application service for member and provider records
pub struct PharmacyService {
    db: Arc<Database>,
    cache: Option<Arc<dyn RecordCache>>,
    search: SearchConfig,
}

impl PharmacyService {
    pub fn new(
        db: Arc<Database>,
        cache: Option<Arc<dyn RecordCache>>,
        search: SearchConfig,
    ) -> Self {
        info!(
            cache_enabled = cache.is_some(),
            default_page_size = search.default_page_size,
            max_page_size = search.max_page_size,
            "Initializing pharmacy service"
        );

        Self { db, cache, search }
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Local calendar date that anchors age calculations
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    // ==================== Cache ====================

    /// Look a value up in the cache. Misses, cache failures and undecodable
    /// entries all come back as `None`.
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cache = self.cache.as_ref()?;

        let decoded = cache.get(key).await.and_then(|entry| {
            entry
                .map(|json| serde_json::from_str(&json).map_err(CacheError::Serialization))
                .transpose()
        });
        match decoded {
            Ok(Some(value)) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %format_error_chain(&e), "Cache read failed");
                None
            }
        }
    }

    async fn cache_store<T: Serialize>(&self, key: &str, value: &T) {
        let Some(cache) = &self.cache else {
            return;
        };

        let stored = match serde_json::to_string(value) {
            Ok(json) => cache.set(key, json).await,
            Err(e) => Err(CacheError::Serialization(e)),
        };
        if let Err(e) = stored {
            warn!(key, error = %format_error_chain(&e), "Cache write failed");
        }
    }

    /// Cache `value`, then evict it again if `reload` no longer returns it.
    /// A write that committed after `value` was read has already refreshed
    /// or evicted the key before this store.
    async fn cache_fresh<T, F>(&self, key: &str, value: &T, reload: F) -> ServiceResult<()>
    where
        T: Serialize + PartialEq,
        F: FnOnce() -> ServiceResult<Option<T>>,
    {
        if self.cache.is_none() {
            return Ok(());
        }

        self.cache_store(key, value).await;
        if reload()?.as_ref() != Some(value) {
            debug!(key, "Record changed while caching; evicting");
            self.cache_evict(key).await;
        }
        Ok(())
    }

    async fn cache_evict(&self, key: &str) {
        if let Some(cache) = &self.cache
            && let Err(e) = cache.delete(key).await
        {
            warn!(key, error = %format_error_chain(&e), "Cache delete failed");
        }
    }
}

fn member_key(id: i64) -> String {
    format!("member:{}", id)
}

fn provider_key(id: i64) -> String {
    format!("provider:{}", id)
}
