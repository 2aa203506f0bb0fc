mod common;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use shortlink_pipeline::application::services::{ClickDisposition, ClickIngestor, IngestConfig};
use shortlink_pipeline::domain::click_event::ClickEvent;
use shortlink_pipeline::domain::click_queue::{EnqueueOutcome, click_queue};
use shortlink_pipeline::domain::click_worker::ClickWorkerPool;
use shortlink_pipeline::infrastructure::persistence::InMemoryStore;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_full_queue_drops_and_keeps_first_k() {
    let store = Arc::new(InMemoryStore::new());
    let link = common::create_test_link(&store, "cap001", "https://example.com/cap").await;

    let (sender, receiver) = click_queue(3);

    let outcomes: Vec<EnqueueOutcome> = (0..5)
        .map(|i| {
            sender.try_enqueue(ClickEvent::new(
                link.id,
                None,
                Some(format!("agent-{i}").as_str()),
            ))
        })
        .collect();

    assert_eq!(
        outcomes,
        vec![
            EnqueueOutcome::Queued,
            EnqueueOutcome::Queued,
            EnqueueOutcome::Queued,
            EnqueueOutcome::Dropped,
            EnqueueOutcome::Dropped,
        ]
    );

    let pool = ClickWorkerPool::spawn(receiver, store.clone(), 2, CancellationToken::new());
    let report = pool.shutdown(Duration::from_secs(5)).await;

    assert_eq!(report.aborted, 0);

    let agents: HashSet<String> = store
        .clicks()
        .await
        .into_iter()
        .map(|c| c.user_agent)
        .collect();
    let expected: HashSet<String> = (0..3).map(|i| format!("agent-{i}")).collect();

    assert_eq!(agents, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_every_queued_event_persisted_once() {
    const PRODUCERS: usize = 8;
    const EVENTS_PER_PRODUCER: usize = 250;

    let store = Arc::new(InMemoryStore::new());
    let mut link_ids = Vec::with_capacity(PRODUCERS);
    for p in 0..PRODUCERS {
        let link = common::create_test_link(
            &store,
            &format!("prod{p:02}"),
            &format!("https://example.com/{p}"),
        )
        .await;
        link_ids.push(link.id);
    }

    let (ingestor, workers) = ClickIngestor::start(
        IngestConfig {
            queue_capacity: 64,
            worker_count: 4,
            shutdown_grace: Duration::from_secs(10),
        },
        store.clone(),
        CancellationToken::new(),
    );

    let mut producers = tokio::task::JoinSet::new();
    for (p, link_id) in link_ids.iter().copied().enumerate() {
        let ingestor = ingestor.clone();
        producers.spawn(async move {
            let mut queued = Vec::new();
            for i in 0..EVENTS_PER_PRODUCER {
                let agent = format!("p{p}-e{i}");
                let event = ClickEvent::new(link_id, Some("10.0.0.1".to_string()), Some(&agent));
                match ingestor.record(event).await {
                    ClickDisposition::Queued => queued.push((agent, link_id)),
                    ClickDisposition::Dropped => {}
                    other => panic!("unexpected disposition {other:?}"),
                }
                if i % 16 == 0 {
                    tokio::task::yield_now().await;
                }
            }
            queued
        });
    }

    let mut expected: HashMap<String, i64> = HashMap::new();
    while let Some(result) = producers.join_next().await {
        expected.extend(result.unwrap());
    }

    let report = workers.shutdown(Duration::from_secs(10)).await;
    assert_eq!(report.aborted, 0);

    let clicks = store.clicks().await;
    assert_eq!(clicks.len(), expected.len());

    let mut seen = HashSet::new();
    for click in clicks {
        assert_eq!(expected.get(&click.user_agent), Some(&click.link_id));
        assert!(seen.insert(click.user_agent), "click persisted twice");
    }
}

#[tokio::test]
async fn test_shutdown_flushes_queue() {
    let store = Arc::new(InMemoryStore::new());
    let link = common::create_test_link(&store, "flush1", "https://example.com/flush").await;

    let (ingestor, workers) = ClickIngestor::start(
        IngestConfig {
            queue_capacity: 100,
            worker_count: 2,
            shutdown_grace: Duration::from_secs(5),
        },
        store.clone(),
        CancellationToken::new(),
    );

    for _ in 0..100 {
        assert_eq!(
            ingestor.record(ClickEvent::new(link.id, None, None)).await,
            ClickDisposition::Queued
        );
    }

    workers.shutdown(Duration::from_secs(5)).await;

    assert_eq!(store.clicks().await.len(), 100);
}

#[tokio::test]
async fn test_failed_persist_does_not_stop_workers() {
    let store = Arc::new(InMemoryStore::new());
    let link = common::create_test_link(&store, "fail01", "https://example.com/fail").await;

    let (ingestor, workers) = ClickIngestor::start(
        IngestConfig {
            queue_capacity: 10,
            worker_count: 1,
            shutdown_grace: Duration::from_secs(5),
        },
        store.clone(),
        CancellationToken::new(),
    );

    ingestor.record(ClickEvent::new(9999, None, None)).await;
    ingestor.record(ClickEvent::new(link.id, None, None)).await;

    workers.shutdown(Duration::from_secs(5)).await;

    let clicks = store.clicks().await;
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].link_id, link.id);
}
