use crate::cache::CacheSlot;
use crate::domain::{RatingOutcome, RatingPayload};
use crate::ports::PlacesApi;
use chrono::Utc;
use shared::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Freshness-bounded view of the configured place's rating.
///
/// Concurrent requests that miss the cache each call upstream; whichever
/// fetch finishes last wins the slot. The fetch runs on its own task, so a
/// caller that goes away does not abort it and the slot is still filled.
pub struct RatingService {
    places: Arc<dyn PlacesApi>,
    cache: Arc<CacheSlot>,
}

impl RatingService {
    pub fn new(places: Arc<dyn PlacesApi>, ttl: Duration) -> Self {
        Self {
            places,
            cache: Arc::new(CacheSlot::new(ttl)),
        }
    }

    pub fn cache(&self) -> &CacheSlot {
        &self.cache
    }

    pub async fn get_rating(&self) -> RatingOutcome {
        let requested_at = Instant::now();

        if let Some(payload) = self.cache.fresh().await {
            debug!("Serving rating from cache");
            return RatingOutcome::Fresh(payload);
        }

        let fetch = tokio::spawn(Self::refresh(
            self.places.clone(),
            self.cache.clone(),
            requested_at,
        ));
        let fetched = fetch
            .await
            .unwrap_or_else(|e| Err(Error::Transport(format!("fetch task failed: {}", e))));

        match fetched {
            Ok(payload) => RatingOutcome::Fresh(payload),
            Err(e) => {
                match &e {
                    Error::UpstreamStatus { status, body } => {
                        error!("Places API error: status={} body={}", status, body)
                    }
                    other => error!("Places API request failed: {}", other),
                }

                match self.cache.snapshot().await {
                    Some(entry) => {
                        warn!(
                            "Serving stale rating cached {}s ago",
                            (Utc::now() - entry.cached_at).num_seconds()
                        );
                        RatingOutcome::Stale(entry.payload.clone())
                    }
                    None => RatingOutcome::Failed(e),
                }
            }
        }
    }

    /// One upstream call; on success the slot expires `ttl` after `requested_at`
    async fn refresh(
        places: Arc<dyn PlacesApi>,
        cache: Arc<CacheSlot>,
        requested_at: Instant,
    ) -> Result<RatingPayload> {
        let payload = RatingPayload::from(places.fetch_place().await?);
        cache.store(payload.clone(), requested_at).await;
        info!(
            "Fetched rating={:?} count={:?}, cached for {:?}",
            payload.rating,
            payload.count,
            cache.ttl()
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlaceDetails;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays scripted upstream results in order and counts calls
    struct ScriptedPlaces {
        responses: Mutex<VecDeque<Result<PlaceDetails>>>,
        calls: AtomicUsize,
    }

    impl ScriptedPlaces {
        fn new(responses: Vec<Result<PlaceDetails>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlacesApi for ScriptedPlaces {
        async fn fetch_place(&self) -> Result<PlaceDetails> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Transport("script exhausted".into())))
        }
    }

    fn place(rating: f64, count: u64) -> PlaceDetails {
        PlaceDetails {
            rating: Some(rating),
            user_rating_count: Some(count),
            google_maps_uri: Some("https://maps.google.com/x".into()),
        }
    }

    fn forbidden() -> Error {
        Error::UpstreamStatus {
            status: 403,
            body: "PERMISSION_DENIED".into(),
        }
    }

    fn service(places: &Arc<ScriptedPlaces>, ttl: Duration) -> RatingService {
        RatingService::new(places.clone(), ttl)
    }

    #[tokio::test]
    async fn test_first_call_fetches_and_normalizes() {
        let places = ScriptedPlaces::new(vec![Ok(place(4.8, 1274))]);
        let svc = service(&places, Duration::from_secs(1800));

        match svc.get_rating().await {
            RatingOutcome::Fresh(payload) => {
                assert_eq!(payload.rating, Some(4.8));
                assert_eq!(payload.count, Some(1274));
                assert_eq!(payload.url.as_deref(), Some("https://maps.google.com/x"));
            }
            other => panic!("expected fresh outcome, got {:?}", other),
        }
        assert_eq!(places.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_within_ttl_do_not_hit_upstream() {
        let places = ScriptedPlaces::new(vec![Ok(place(4.8, 1274))]);
        let svc = service(&places, Duration::from_secs(1800));

        let first = svc.get_rating().await;
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(60)).await;
            match (svc.get_rating().await, &first) {
                (RatingOutcome::Fresh(again), RatingOutcome::Fresh(original)) => {
                    assert_eq!(&again, original)
                }
                other => panic!("unexpected outcomes {:?}", other),
            }
        }
        assert_eq!(places.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetches_after_ttl() {
        let places = ScriptedPlaces::new(vec![Ok(place(4.1, 10)), Ok(place(4.2, 11))]);
        let svc = service(&places, Duration::from_secs(1800));

        svc.get_rating().await;
        tokio::time::advance(Duration::from_secs(1800)).await;

        match svc.get_rating().await {
            RatingOutcome::Fresh(payload) => assert_eq!(payload.count, Some(11)),
            other => panic!("expected fresh outcome, got {:?}", other),
        }
        assert_eq!(places.calls(), 2);
    }

    #[tokio::test]
    async fn test_upstream_error_with_empty_cache_fails() {
        let places = ScriptedPlaces::new(vec![Err(forbidden())]);
        let svc = service(&places, Duration::from_secs(1800));

        match svc.get_rating().await {
            RatingOutcome::Failed(e) => assert_eq!(e.status_code(), Some(403)),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(svc.cache().snapshot().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_falls_back_to_stale() {
        let places = ScriptedPlaces::new(vec![Ok(place(4.8, 1274)), Err(forbidden())]);
        let svc = service(&places, Duration::from_secs(60));

        svc.get_rating().await;
        tokio::time::advance(Duration::from_secs(61)).await;

        match svc.get_rating().await {
            RatingOutcome::Stale(payload) => assert_eq!(payload.count, Some(1274)),
            other => panic!("expected stale outcome, got {:?}", other),
        }
        assert_eq!(places.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_fallback_does_not_refresh_expiry() {
        let places = ScriptedPlaces::new(vec![
            Ok(place(4.8, 1274)),
            Err(Error::Transport("connection refused".into())),
            Err(Error::Transport("connection refused".into())),
        ]);
        let svc = service(&places, Duration::from_secs(60));

        svc.get_rating().await;
        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(matches!(svc.get_rating().await, RatingOutcome::Stale(_)));
        assert!(matches!(svc.get_rating().await, RatingOutcome::Stale(_)));
        // Every expired request retries upstream exactly once
        assert_eq!(places.calls(), 3);
    }

    #[tokio::test]
    async fn test_transport_error_with_empty_cache_fails() {
        let places = ScriptedPlaces::new(vec![Err(Error::Transport("dns".into()))]);
        let svc = service(&places, Duration::from_secs(1800));

        match svc.get_rating().await {
            RatingOutcome::Failed(Error::Transport(_)) => {}
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_place_is_cached_as_nulls() {
        let places = ScriptedPlaces::new(vec![Ok(PlaceDetails::default())]);
        let svc = service(&places, Duration::from_secs(1800));

        svc.get_rating().await;
        assert_eq!(
            svc.cache().fresh().await,
            Some(RatingPayload {
                rating: None,
                count: None,
                url: None,
            })
        );
    }

    /// Takes `delay` before answering, counting finished calls
    struct SlowPlaces {
        delay: Duration,
        completed: AtomicUsize,
    }

    #[async_trait]
    impl PlacesApi for SlowPlaces {
        async fn fetch_place(&self) -> Result<PlaceDetails> {
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(place(4.6, 88))
        }
    }

    fn slow_places(delay: Duration) -> Arc<SlowPlaces> {
        Arc::new(SlowPlaces {
            delay,
            completed: AtomicUsize::new(0),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_request_still_fills_cache() {
        let places = slow_places(Duration::from_secs(5));
        let svc = RatingService::new(places.clone(), Duration::from_secs(1800));

        let abandoned = tokio::time::timeout(Duration::from_secs(1), svc.get_rating()).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(places.completed.load(Ordering::SeqCst), 1);
        assert_eq!(svc.cache().fresh().await.and_then(|p| p.count), Some(88));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_counts_from_request_start() {
        let places = slow_places(Duration::from_secs(5));
        let svc = RatingService::new(places.clone(), Duration::from_secs(60));

        assert!(matches!(svc.get_rating().await, RatingOutcome::Fresh(_)));

        // 5s spent fetching, so 55s more reaches the 60s TTL
        tokio::time::advance(Duration::from_secs(54)).await;
        assert!(svc.cache().fresh().await.is_some());
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(svc.cache().fresh().await.is_none());
    }
}
