// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bangs_engine::{
    Bang, BangRegistry, BangService, BangSuggester, BangsConfig, Results, SuggestError, Suggestion,
};
use tokio_util::sync::CancellationToken;

/// Test double answering every prefix with the same hits
struct StaticSuggester {
    hits: Vec<&'static str>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticSuggester {
    fn new(hits: Vec<&'static str>) -> Self {
        Self {
            hits,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(hits: Vec<&'static str>, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(hits)
        }
    }
}

#[async_trait]
impl BangSuggester for StaticSuggester {
    async fn index_exists(&self) -> Result<bool, SuggestError> {
        Ok(true)
    }

    async fn delete_index(&self) -> Result<(), SuggestError> {
        Ok(())
    }

    async fn setup(&self, _bangs: &[Bang]) -> Result<(), SuggestError> {
        Ok(())
    }

    async fn suggest_results(&self, _prefix: &str, limit: usize) -> Result<Results, SuggestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Results {
            suggestions: self
                .hits
                .iter()
                .take(limit)
                .map(|t| Suggestion::raw(*t))
                .collect(),
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Test double that always fails
struct FailingSuggester;

#[async_trait]
impl BangSuggester for FailingSuggester {
    async fn index_exists(&self) -> Result<bool, SuggestError> {
        Err(SuggestError::Transport("connection refused".to_string()))
    }

    async fn delete_index(&self) -> Result<(), SuggestError> {
        Err(SuggestError::Transport("connection refused".to_string()))
    }

    async fn setup(&self, _bangs: &[Bang]) -> Result<(), SuggestError> {
        Err(SuggestError::Transport("connection refused".to_string()))
    }

    async fn suggest_results(&self, _prefix: &str, _limit: usize) -> Result<Results, SuggestError> {
        Err(SuggestError::ApiError {
            status: 503,
            message: "cluster unavailable".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

fn service_with(suggester: Arc<dyn BangSuggester>, timeout_ms: u64) -> BangService {
    let config = BangsConfig {
        suggest_timeout_ms: timeout_ms,
        ..Default::default()
    };
    let registry = BangRegistry::builtin().expect("builtin bangs should load");
    BangService::new(Arc::new(registry), suggester, &config)
}

fn pairs(results: &Results) -> Vec<(&str, &str)> {
    results
        .suggestions
        .iter()
        .map(|s| (s.trigger.as_str(), s.name.as_str()))
        .collect()
}

#[tokio::test]
async fn test_suggest_names_hits_in_backend_order() {
    let service = service_with(Arc::new(StaticSuggester::new(vec!["gi", "g", "xyz"])), 1000);

    let results = service
        .suggest("!g", 10, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        pairs(&results),
        vec![("gi", "Google Images"), ("g", "Google"), ("xyz", "")]
    );
}

#[tokio::test]
async fn test_suggest_propagates_backend_error() {
    let service = service_with(Arc::new(FailingSuggester), 1000);

    let err = service
        .suggest("!g", 10, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SuggestError::ApiError { status: 503, .. }));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = Arc::new(StaticSuggester::slow(vec!["g"], Duration::from_secs(10)));
    let service = service_with(backend, 50);

    let started = Instant::now();
    let err = service
        .suggest("!g", 10, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SuggestError::Timeout { timeout_ms: 50 }));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancel_in_flight_suggest() {
    let backend = Arc::new(StaticSuggester::slow(vec!["g"], Duration::from_secs(10)));
    let service = service_with(backend.clone(), 30_000);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = service.suggest("!g", 10, &cancel).await.unwrap_err();

    assert!(matches!(err, SuggestError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_autocomplete_routes_queries() {
    let backend = Arc::new(StaticSuggester::new(vec!["so"]));
    let service = service_with(backend.clone(), 1000);
    let cancel = CancellationToken::new();

    // Lone marker answers locally
    let defaults = service.autocomplete("!", &cancel).await.unwrap().unwrap();
    assert_eq!(defaults.len(), 5);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

    let hits = service.autocomplete("!s", &cancel).await.unwrap().unwrap();
    assert_eq!(pairs(&hits), vec![("so", "Stack Overflow")]);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

    // Surrounding whitespace is trimmed before routing
    let padded = service.autocomplete("  !s ", &cancel).await.unwrap().unwrap();
    assert_eq!(pairs(&padded), vec![("so", "Stack Overflow")]);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);

    // Plain queries are left to the caller
    assert!(service.autocomplete("rust", &cancel).await.unwrap().is_none());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_autocomplete_with_no_hits_falls_through() {
    let service = service_with(Arc::new(StaticSuggester::new(vec![])), 1000);

    let result = service
        .autocomplete("!zz", &CancellationToken::new())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_concurrent_suggest_on_cloned_service() {
    let service = service_with(Arc::new(StaticSuggester::new(vec!["w", "wt"])), 1000);
    let mut handles = Vec::new();

    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.suggest("!w", 10, &CancellationToken::new()).await
        }));
    }

    for handle in handles {
        let results = handle.await.unwrap().unwrap();
        assert_eq!(
            pairs(&results),
            vec![("w", "Wikipedia"), ("wt", "Wiktionary")]
        );
    }
}

#[tokio::test]
async fn test_rebuild_index_surfaces_backend_error() {
    let service = service_with(Arc::new(FailingSuggester), 1000);

    let err = service.rebuild_index().await.unwrap_err();
    assert!(matches!(err, SuggestError::Transport(_)));
}
