// src/services/query_cache_tests.rs
//
// Query cache guarantees: dedup, staleness, retention, retry, watch, eviction

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::error::{AppError, AppResult};
    use crate::services::query_cache::{CachePolicies, QueryCache, QueryKey, QueryLoader};

    /// Counts loads and returns the load number; can be switched to fail
    #[derive(Default)]
    struct CountingLoader {
        loads: AtomicU32,
        /// Transient failures left before loads succeed again
        transient_failures: AtomicU32,
        permanent_failure: AtomicBool,
        not_found: AtomicBool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl QueryLoader<u32> for CountingLoader {
        async fn load(&self, _key: &QueryKey) -> AppResult<u32> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.not_found.load(Ordering::SeqCst) {
                return Err(AppError::NotFound {
                    table: "movie".to_string(),
                    column: "content_id".to_string(),
                    value: "gone".to_string(),
                });
            }
            if self.permanent_failure.load(Ordering::SeqCst) {
                return Err(AppError::Backend { status: 400, message: "bad request".to_string() });
            }
            let remaining = self.transient_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.transient_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(AppError::Backend { status: 503, message: "busy".to_string() });
            }

            Ok(n)
        }
    }

    impl CountingLoader {
        fn loads(&self) -> u32 {
            self.loads.load(Ordering::SeqCst)
        }
    }

    fn cache(loader: &Arc<CountingLoader>) -> Arc<QueryCache<u32>> {
        Arc::new(QueryCache::new(loader.clone(), CachePolicies::default()))
    }

    fn popular() -> QueryKey {
        QueryKey::ByFeature("Type Popular".to_string())
    }

    #[test]
    fn test_keys_render_like_query_names() {
        assert_eq!(QueryKey::AllContent.to_string(), "all-content");
        assert_eq!(popular().to_string(), "content-by-feature:Type Popular");
        assert_eq!(QueryKey::ByGenre("Drama".to_string()).to_string(), "content-by-genre:Drama");
    }

    #[test]
    fn test_default_policies() {
        let policies = CachePolicies::default();
        assert_eq!(policies.all_content.stale_time, Duration::from_secs(10));
        assert_eq!(policies.all_content.refetch_interval, Duration::from_secs(30));
        assert_eq!(policies.for_key(&popular()).stale_time, Duration::from_secs(30));
        assert_eq!(policies.by_genre.refetch_interval, Duration::from_secs(60));
        assert_eq!(policies.by_genre.gc_time, Duration::from_secs(300));
        assert_eq!(policies.by_feature.retry.max_retries, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_load() {
        let loader = Arc::new(CountingLoader {
            delay: Some(Duration::from_millis(200)),
            ..Default::default()
        });
        let cache = cache(&loader);
        let key = popular();

        let (first, second) = tokio::join!(cache.get(&key), cache.get(&key));

        assert_eq!(loader.loads(), 1);
        assert_eq!(*first.unwrap(), 1);
        assert_eq!(*second.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_a_failure() {
        let loader = Arc::new(CountingLoader {
            delay: Some(Duration::from_millis(200)),
            ..Default::default()
        });
        loader.permanent_failure.store(true, Ordering::SeqCst);
        let cache = cache(&loader);
        let key = popular();

        let (first, second) = tokio::join!(cache.get(&key), cache.get(&key));

        assert_eq!(loader.loads(), 1);
        assert!(first.is_err());
        assert!(second.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_value_is_served_from_memory() {
        let loader = Arc::new(CountingLoader::default());
        let cache = cache(&loader);
        let key = popular();

        cache.get(&key).await.unwrap();
        tokio::time::advance(Duration::from_secs(29)).await;
        let value = cache.get(&key).await.unwrap();

        assert_eq!(*value, 1);
        assert_eq!(loader.loads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_value_is_served_while_refreshing() {
        let loader = Arc::new(CountingLoader::default());
        let cache = cache(&loader);
        let key = QueryKey::AllContent;

        cache.get(&key).await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;

        let stale = cache.get(&key).await.unwrap();
        assert_eq!(*stale, 1);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(loader.loads(), 2);
        assert_eq!(cache.peek(&key).map(|v| *v), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidated_value_is_refreshed() {
        let loader = Arc::new(CountingLoader::default());
        let cache = cache(&loader);
        let key = popular();

        cache.get(&key).await.unwrap();
        cache.invalidate(&key);
        assert_eq!(*cache.get(&key).await.unwrap(), 1);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*cache.get(&key).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_good_value() {
        let loader = Arc::new(CountingLoader::default());
        let cache = cache(&loader);
        let key = popular();

        cache.get(&key).await.unwrap();
        loader.permanent_failure.store(true, Ordering::SeqCst);

        assert!(cache.refresh(&key).await.is_err());
        assert_eq!(cache.peek(&key).map(|v| *v), Some(1));
        assert_eq!(*cache.get(&key).await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let loader = Arc::new(CountingLoader::default());
        loader.transient_failures.store(2, Ordering::SeqCst);
        let cache = cache(&loader);

        let value = cache.get(&popular()).await.unwrap();

        assert_eq!(*value, 3);
        assert_eq!(loader.loads(), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_returned_without_retry() {
        let loader = Arc::new(CountingLoader::default());
        loader.not_found.store(true, Ordering::SeqCst);
        let cache = cache(&loader);

        let err = cache.get(&popular()).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(loader.loads(), 1);
    }

    #[tokio::test]
    async fn test_peek_does_not_load() {
        let loader = Arc::new(CountingLoader::default());
        let cache = cache(&loader);

        assert!(cache.peek(&popular()).is_none());
        assert_eq!(loader.loads(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_refreshes_until_dropped() {
        let loader = Arc::new(CountingLoader::default());
        let cache = cache(&loader);
        let key = QueryKey::AllContent;

        let watch = cache.watch(key.clone());
        tokio::time::sleep(Duration::from_secs(65)).await;
        assert_eq!(loader.loads(), 2);

        drop(watch);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(loader.loads(), 2);
        assert_eq!(cache.peek(&key).map(|v| *v), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_entries_are_evicted() {
        let loader = Arc::new(CountingLoader::default());
        let cache = cache(&loader);
        let genre = QueryKey::ByGenre("Drama".to_string());

        cache.get(&genre).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.evict_idle(), 0);

        tokio::time::advance(Duration::from_secs(5 * 60)).await;
        assert_eq!(cache.evict_idle(), 1);
        assert!(cache.peek(&genre).is_none());
    }
}
