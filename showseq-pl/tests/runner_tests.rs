//! Entry runner tests
//!
//! Runs entries on a short tick against the scripted session and checks
//! the outcome, the events on the bus and the published status.

mod helpers;

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use helpers::{Harness, RecordingPublisher};
use serde_json::json;
use showseq_common::events::{EntryOutcome, EventBus, ShowEvent};
use showseq_pl::entry::{EntryContext, LifecycleState, SequenceEntry};
use showseq_pl::error::Error;
use showseq_pl::fseq::FseqHeaderReader;
use showseq_pl::playback::{PlaybackArbiter, TimedSequencePlayer};
use showseq_pl::runner::{log_events, EntryRunner};
use tokio::sync::broadcast;

fn runner(bus: &EventBus) -> EntryRunner {
    EntryRunner::new(bus.clone(), Duration::from_millis(5), Duration::from_millis(10))
}

fn drain(rx: &mut broadcast::Receiver<ShowEvent>) -> Vec<ShowEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn ended_outcome(events: &[ShowEvent]) -> Option<EntryOutcome> {
    events.iter().find_map(|event| match event {
        ShowEvent::EntryEnded { outcome, .. } => Some(*outcome),
        _ => None,
    })
}

#[tokio::test]
async fn test_runner_reports_natural_finish() {
    let h = Harness::new(&[("show.fseq", 120_000)]);
    let mut entry = h.entry("show.fseq");
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();

    let playback = h.playback.clone();
    let ender = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        playback.set_running(false);
    });

    let outcome = runner(&bus).run(&mut entry, pending()).await.unwrap();
    ender.await.unwrap();

    assert_eq!(outcome, EntryOutcome::Finished);
    assert_eq!(entry.lifecycle_state(), LifecycleState::Idle);
    assert!(!entry.is_prepared());
    assert_eq!(h.publisher.payloads(), vec!["show.fseq", ""]);

    let events = drain(&mut rx);
    assert_eq!(events.first().map(|e| e.event_type()), Some("EntryStarted"));
    assert_eq!(events.last().map(|e| e.event_type()), Some("EntryEnded"));
    assert_eq!(ended_outcome(&events), Some(EntryOutcome::Finished));
}

#[tokio::test]
async fn test_runner_stops_on_shutdown() {
    let h = Harness::new(&[("show.fseq", 120_000)]);
    let mut entry = h.entry("show.fseq");
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();

    let shutdown = tokio::time::sleep(Duration::from_millis(30));
    let outcome = runner(&bus).run(&mut entry, shutdown).await.unwrap();

    assert_eq!(outcome, EntryOutcome::Stopped);
    assert_eq!(entry.last_outcome(), Some(EntryOutcome::Stopped));
    assert!(h.playback.state().open.is_none());
    assert_eq!(h.publisher.payloads(), vec!["show.fseq", ""]);
    assert_eq!(ended_outcome(&drain(&mut rx)), Some(EntryOutcome::Stopped));
}

#[tokio::test]
async fn test_event_log_drains_final_events() {
    let h = Harness::new(&[("show.fseq", 120_000)]);
    let mut entry = h.entry("show.fseq");
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();
    let logger = tokio::spawn(log_events(bus.subscribe()));
    let entry_runner = runner(&bus);
    drop(bus);

    let shutdown = tokio::time::sleep(Duration::from_millis(30));
    let outcome = entry_runner.run(&mut entry, shutdown).await.unwrap();
    assert_eq!(outcome, EntryOutcome::Stopped);

    // Last sender goes away with the runner; the logger must still see EntryEnded
    drop(entry_runner);
    let logged = logger.await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(logged, events.len());
    assert_eq!(events.last().map(|e| e.event_type()), Some("EntryEnded"));
}

#[tokio::test]
async fn test_runner_emits_progress_while_playing() {
    let h = Harness::new(&[("show.fseq", 120_000)]);
    let mut entry = h.entry("show.fseq");
    let bus = EventBus::new(256);
    let mut rx = bus.subscribe();

    let shutdown = tokio::time::sleep(Duration::from_millis(60));
    runner(&bus).run(&mut entry, shutdown).await.unwrap();

    let events = drain(&mut rx);
    let progress: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            ShowEvent::EntryProgress { timing, .. } => Some(*timing),
            _ => None,
        })
        .collect();
    assert!(!progress.is_empty());
    assert!(progress.iter().all(|t| t.total_ms == 120_000));
}

#[tokio::test]
async fn test_runner_skips_unplayable_entry() {
    let h = Harness::new(&[("show.fseq", 120_000)]);
    let mut entry = SequenceEntry::bind(
        &json!({ "sequenceName": "show.fseq", "enabled": false }),
        &h.ctx,
    )
    .unwrap();
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();

    let outcome = runner(&bus).run(&mut entry, pending()).await.unwrap();

    assert_eq!(outcome, EntryOutcome::Skipped);
    assert_eq!(h.playback.state().open_calls, 0);
    assert!(h.publisher.messages().is_empty());

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(ended_outcome(&events), Some(EntryOutcome::Skipped));
}

#[tokio::test]
async fn test_runner_returns_prepare_failure() {
    let h = Harness::new(&[]);
    let mut entry = h.entry("missing.fseq");
    let bus = EventBus::new(64);
    let mut rx = bus.subscribe();

    let result = runner(&bus).run(&mut entry, pending()).await;

    assert!(matches!(result, Err(Error::PrepareFailed { .. })));
    assert_eq!(entry.lifecycle_state(), LifecycleState::Idle);
    assert!(drain(&mut rx).is_empty());
    assert!(h.publisher.messages().is_empty());
}

#[tokio::test]
async fn test_runner_plays_real_sequence_to_end() {
    let h = Harness::new(&[]);
    // 4 frames at 5ms
    h.fixtures.sequence("short.fseq", 4, 5).unwrap();

    let reader = Arc::new(FseqHeaderReader);
    let player = TimedSequencePlayer::new(h.fixtures.dir(), reader.clone());
    let publisher = Arc::new(RecordingPublisher::default());
    let ctx = EntryContext::new(
        PlaybackArbiter::new(player),
        reader,
        publisher.clone(),
        h.fixtures.dir(),
        "playlist",
    );
    let mut entry = SequenceEntry::bind(&json!({ "sequenceName": "short.fseq" }), &ctx).unwrap();
    let bus = EventBus::new(64);

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        runner(&bus).run(&mut entry, pending()),
    )
    .await
    .expect("sequence did not finish")
    .unwrap();

    assert_eq!(outcome, EntryOutcome::Finished);
    assert_eq!(entry.cached_duration_ms(), Some(20));
    assert_eq!(publisher.payloads(), vec!["short.fseq", ""]);
    assert!(ctx.player.holder().is_none());
}
