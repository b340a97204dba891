//! Tests for the cache manager

use super::*;
use crate::config::{BackendKind, CacheConfig, KeyStrategy};
use crate::core::traits::BatchEmbedder;
use crate::utils::error::CacheError;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn config(query: bool, embedding: bool, result: bool) -> CacheConfig {
    CacheConfig {
        query_cache_enabled: query,
        embedding_cache_enabled: embedding,
        result_cache_enabled: result,
        cache_key_strategy: KeyStrategy::Exact,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_query_hit_computes_once() {
    let manager = CacheManager::new(config(true, false, false), None).unwrap();
    let calls = AtomicUsize::new(0);
    let compute = |input: ComputeInput| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, CacheError>(format!("answer: {}", input.query)) }
    };

    let first: String = manager
        .get_or_compute("What is RAG?", compute, Resolvers::default())
        .await
        .unwrap();
    let second: String = manager
        .get_or_compute("What is RAG?", compute, Resolvers::default())
        .await
        .unwrap();

    assert_eq!(first, "answer: What is RAG?");
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let metrics = manager.metrics();
    assert_eq!(metrics.hits(CacheLayer::Query), 1);
    assert_eq!(metrics.misses(CacheLayer::Query), 1);
    assert!((metrics.hit_rate(CacheLayer::Query) - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_embedding_cache_avoids_second_embed() {
    let manager = CacheManager::new(config(false, true, false), None).unwrap();
    let embeds = AtomicUsize::new(0);
    let embedder = |_text: String| {
        embeds.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, CacheError>(vec![0.5f32, 0.5]) }
    };
    let compute = |input: ComputeInput| async move {
        assert_eq!(input.embedding, Some(vec![0.5, 0.5]));
        assert_eq!(input.result, None);
        Ok::<_, CacheError>(input.query.len())
    };

    for _ in 0..2 {
        let len: usize = manager
            .get_or_compute("hello", compute, Resolvers::new().with_embedder(&embedder))
            .await
            .unwrap();
        assert_eq!(len, 5);
    }

    assert_eq!(embeds.load(Ordering::SeqCst), 1);
    assert_eq!(manager.metrics().hits(CacheLayer::Embedding), 1);
    assert_eq!(manager.metrics().misses(CacheLayer::Embedding), 1);
    assert_eq!(manager.metrics().layer(CacheLayer::Query), LayerStats::default());
}

#[tokio::test]
async fn test_result_cache_shared_across_queries_with_same_embedding() {
    let manager = CacheManager::new(config(true, true, true), None).unwrap();
    let embedder = |_text: String| async { Ok::<_, CacheError>(vec![0.1f32, 0.2]) };
    let retrievals = AtomicUsize::new(0);
    let retriever = |_embedding: Vec<f32>| {
        retrievals.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, CacheError>(json!(["doc-1", "doc-2"])) }
    };
    let compute = |input: ComputeInput| async move {
        assert_eq!(input.result, Some(json!(["doc-1", "doc-2"])));
        Ok::<_, CacheError>(format!("{} from 2 docs", input.query))
    };

    for query in ["first question", "second question"] {
        let resolvers = Resolvers::new()
            .with_embedder(&embedder)
            .with_retriever(&retriever);
        let answer: String = manager
            .get_or_compute(query, compute, resolvers)
            .await
            .unwrap();
        assert_eq!(answer, format!("{} from 2 docs", query));
    }

    assert_eq!(retrievals.load(Ordering::SeqCst), 1);
    let metrics = manager.metrics();
    assert_eq!(metrics.misses(CacheLayer::Query), 2);
    assert_eq!(metrics.misses(CacheLayer::Embedding), 2);
    assert_eq!(metrics.misses(CacheLayer::Result), 1);
    assert_eq!(metrics.hits(CacheLayer::Result), 1);
}

#[tokio::test]
async fn test_retriever_skipped_without_result_cache() {
    let manager = CacheManager::new(config(false, true, false), None).unwrap();
    let embedder = |_text: String| async { Ok::<_, CacheError>(vec![1.0f32]) };
    let retrievals = AtomicUsize::new(0);
    let retriever = |_embedding: Vec<f32>| {
        retrievals.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, CacheError>(json!([])) }
    };
    let compute = |input: ComputeInput| async move {
        Ok::<_, CacheError>((input.embedding.is_some(), input.result.is_none()))
    };

    let resolvers = Resolvers::new()
        .with_embedder(&embedder)
        .with_retriever(&retriever);
    let seen: (bool, bool) = manager
        .get_or_compute("q", compute, resolvers)
        .await
        .unwrap();

    assert_eq!(seen, (true, true));
    assert_eq!(retrievals.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_savings_accumulate_on_hits_only() {
    let manager = CacheManager::new(config(true, false, false), None).unwrap();
    let estimates = SavingsEstimates::default()
        .with_latency(CacheLayer::Query, 50.0)
        .with_cost(CacheLayer::Query, 0.01);
    let compute = |_input: ComputeInput| async { Ok::<_, CacheError>(json!({"answer": 42})) };

    for _ in 0..3 {
        let answer: Value = manager
            .get_or_compute("q", compute, Resolvers::new().with_estimates(&estimates))
            .await
            .unwrap();
        assert_eq!(answer["answer"], 42);
    }

    let metrics = manager.metrics();
    assert_eq!(metrics.hits(CacheLayer::Query), 2);
    assert!((metrics.latency_saved_total_ms() - 100.0).abs() < 1e-9);
    assert!((metrics.cost_saved_total() - 0.02).abs() < 1e-9);
}

#[tokio::test]
async fn test_compute_error_is_not_cached() {
    let manager = CacheManager::new(config(true, false, false), None).unwrap();
    let failing = |_input: ComputeInput| async { Err::<String, _>(CacheError::compute("llm down")) };

    let err = manager
        .get_or_compute("q", failing, Resolvers::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::Compute(_)));

    let cached: Option<String> = manager.query_cache().unwrap().get("q").await.unwrap();
    assert_eq!(cached, None);
}

#[tokio::test]
async fn test_semantic_strategy_through_manager() {
    let embedder: Arc<dyn BatchEmbedder> = Arc::new(|texts: Vec<String>| async move {
        Ok::<_, CacheError>(
            texts
                .iter()
                .map(|t| match t.to_lowercase().as_str() {
                    "how to secure api?" => vec![1.0f32, 0.0],
                    "how to protect api endpoints?" => vec![0.95, 0.05],
                    _ => vec![0.0, 1.0],
                })
                .collect(),
        )
    });
    let config = CacheConfig {
        cache_key_strategy: KeyStrategy::Semantic,
        semantic_cache_threshold: 0.9,
        embedding_cache_enabled: false,
        result_cache_enabled: false,
        ..Default::default()
    };
    let manager = CacheManager::new(config, Some(embedder)).unwrap();
    assert!(manager.semantic_matcher().is_some());

    let calls = AtomicUsize::new(0);
    let compute = |_input: ComputeInput| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, CacheError>("use API keys".to_string()) }
    };

    let first: String = manager
        .get_or_compute("How to secure API?", compute, Resolvers::default())
        .await
        .unwrap();
    let second: String = manager
        .get_or_compute("How to protect API endpoints?", compute, Resolvers::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_matcher_requires_semantic_strategy() {
    let embedder: Arc<dyn BatchEmbedder> =
        Arc::new(|texts: Vec<String>| async move { Ok::<_, CacheError>(vec![vec![1.0f32]; texts.len()]) });
    let manager = CacheManager::new(config(true, false, false), Some(embedder)).unwrap();
    assert!(manager.semantic_matcher().is_none());
}

#[tokio::test]
async fn test_warmup_populates_query_cache() {
    let config = CacheConfig {
        warmup_queries: vec!["what is rag".to_string(), "what is a vector".to_string()],
        ..config(true, false, false)
    };
    let manager = CacheManager::new(config, None).unwrap();
    let calls = AtomicUsize::new(0);
    let compute = |input: ComputeInput| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, CacheError>(input.query.to_uppercase()) }
    };

    assert_eq!(manager.warmup(compute).await.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let answer: String = manager
        .get_or_compute("what is rag", compute, Resolvers::default())
        .await
        .unwrap();
    assert_eq!(answer, "WHAT IS RAG");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_warmup_disabled() {
    let config = CacheConfig {
        warmup_enabled: false,
        warmup_queries: vec!["q".to_string()],
        ..config(true, false, false)
    };
    let manager = CacheManager::new(config, None).unwrap();
    let compute = |_input: ComputeInput| async { Ok::<_, CacheError>(0u8) };

    assert_eq!(manager.warmup(compute).await.unwrap(), 0);
    assert_eq!(manager.metrics().misses(CacheLayer::Query), 0);
}

#[tokio::test]
async fn test_warmup_skips_failing_queries() {
    let config = CacheConfig {
        warmup_queries: vec!["good one".to_string(), "bad".to_string(), "good two".to_string()],
        ..config(true, false, false)
    };
    let manager = CacheManager::new(config, None).unwrap();
    let calls = AtomicUsize::new(0);
    let compute = |input: ComputeInput| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if input.query == "bad" {
                Err(CacheError::compute("model unavailable"))
            } else {
                Ok(input.query.len())
            }
        }
    };

    assert_eq!(manager.warmup(compute).await.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let cached: usize = manager
        .get_or_compute("good two", compute, Resolvers::default())
        .await
        .unwrap();
    assert_eq!(cached, 8);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_clear_all_forces_recompute() {
    let manager = CacheManager::new(config(true, true, true), None).unwrap();
    let calls = AtomicUsize::new(0);
    let compute = |_input: ComputeInput| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, CacheError>(1u32) }
    };

    let _: u32 = manager
        .get_or_compute("q", compute, Resolvers::default())
        .await
        .unwrap();
    manager.clear_all().await.unwrap();
    let _: u32 = manager
        .get_or_compute("q", compute, Resolvers::default())
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_remote_backend_without_url_is_config_error() {
    let config = CacheConfig {
        cache_backend: BackendKind::Remote,
        remote_url: None,
        ..Default::default()
    };
    let err = CacheManager::new(config, None).unwrap_err();
    assert!(matches!(err, CacheError::Config(_)));
}

#[test]
fn test_metrics_accounting() {
    let metrics = CacheMetrics::new();
    assert_eq!(metrics.hit_rate(CacheLayer::Result), 0.0);

    metrics.record_hit(CacheLayer::Embedding, 10.0, 0.001);
    metrics.record_hit(CacheLayer::Embedding, 0.0, 0.0);
    metrics.record_miss(CacheLayer::Embedding);
    metrics.record_miss(CacheLayer::Result);

    assert!((metrics.hit_rate(CacheLayer::Embedding) - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(metrics.hit_rate(CacheLayer::Result), 0.0);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.layers.len(), 2);
    assert_eq!(snapshot.layers[&CacheLayer::Embedding].hits, 2);
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"embedding_cache\""));
    assert!(json.contains("\"result_cache\""));

    metrics.reset();
    assert_eq!(metrics.hits(CacheLayer::Embedding), 0);
    assert_eq!(metrics.latency_saved_total_ms(), 0.0);
}

#[test]
fn test_layer_names() {
    let names: Vec<String> = CacheLayer::ALL.iter().map(|l| l.to_string()).collect();
    assert_eq!(names, vec!["query_cache", "embedding_cache", "result_cache"]);
}
