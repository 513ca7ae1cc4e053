use std::env;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::sync::mpsc::error::TryRecvError;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::config_option::ConfigOption;
use crate::forwarder::{ForwardSummary, Forwarder};
use crate::OutgoingQueueError;

fn init_tracing() {
  env::set_var("RUST_LOG", "debug");
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();
}

#[derive(Debug, Clone, PartialEq)]
struct Small {
  s: String,
  i: i32,
}

fn make_small(i: i32) -> Small {
  Small {
    s: "something".to_string(),
    i,
  }
}

#[tokio::test]
async fn test_forwards_in_order_to_slow_consumer() {
  init_tracing();
  const COUNT: i32 = 1_000;
  let (in_tx, in_rx) = mpsc::channel(1);
  let (out_tx, mut out_rx) = mpsc::channel(1);

  let handle = Forwarder::default().spawn(in_rx, out_tx);

  // The producer finishes without waiting for the consumer.
  for i in 0..COUNT {
    in_tx.send(make_small(i)).await.unwrap();
  }
  drop(in_tx);

  for i in 0..COUNT {
    if i % 100 == 0 {
      tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(out_rx.recv().await, Some(make_small(i)));
  }

  let summary = handle.join().await.unwrap();
  assert_eq!(summary.delivered, COUNT as u64);
  assert_eq!(summary.discarded, 0);
  assert!(summary.high_water_mark >= 1);
}

#[tokio::test]
async fn test_producer_never_blocks_on_stalled_sink() {
  const COUNT: u64 = 10_000;
  let (in_tx, in_rx) = mpsc::channel(1);
  let (out_tx, mut out_rx) = mpsc::channel(1);

  let handle = Forwarder::new(Config::from(vec![ConfigOption::with_warn_threshold(1_000)])).spawn(in_rx, out_tx);

  let produce = async {
    for i in 0..COUNT {
      in_tx.send(i).await.unwrap();
    }
  };
  tokio::time::timeout(Duration::from_secs(5), produce)
    .await
    .expect("producer blocked on a stalled sink");

  for i in 0..COUNT {
    assert_eq!(out_rx.recv().await, Some(i));
  }
  drop(in_tx);

  let summary = handle.join().await.unwrap();
  assert_eq!(summary.delivered, COUNT);
  assert!(summary.high_water_mark > 1);
}

#[tokio::test]
async fn test_shutdown_discards_buffered_elements() {
  init_tracing();
  let (in_tx, in_rx) = mpsc::channel(1);
  let (out_tx, mut out_rx) = mpsc::channel(1);

  let handle = Forwarder::default().spawn(in_rx, out_tx);
  // Nobody reads the sink, so only the first element fits into it.
  for i in 0..5u32 {
    in_tx.send(i).await.unwrap();
  }

  let summary = handle.shutdown().await.unwrap();
  assert_eq!(summary.delivered, 1);
  assert!(summary.discarded >= 3);
  assert!(summary.delivered + summary.discarded as u64 <= 5);

  assert_eq!(out_rx.recv().await, Some(0));
  assert_eq!(out_rx.try_recv(), Err(TryRecvError::Disconnected));
}

#[tokio::test]
async fn test_dropping_shutdown_sender_stops_loop() {
  let (_in_tx, in_rx) = mpsc::channel::<u32>(1);
  let (out_tx, _out_rx) = mpsc::channel(1);
  let (shutdown_tx, shutdown_rx) = oneshot::channel();

  let task = tokio::spawn(Forwarder::default().run(in_rx, out_tx, shutdown_rx));
  drop(shutdown_tx);

  let summary = tokio::time::timeout(Duration::from_secs(1), task)
    .await
    .expect("forwarder did not stop")
    .unwrap()
    .unwrap();
  assert_eq!(summary, ForwardSummary::default());
}

#[tokio::test]
async fn test_closed_input_with_empty_queue_exits() {
  let (in_tx, in_rx) = mpsc::channel::<u32>(1);
  let (out_tx, _out_rx) = mpsc::channel(1);
  drop(in_tx);

  let handle = Forwarder::default().spawn(in_rx, out_tx);
  let summary = tokio::time::timeout(Duration::from_secs(1), handle.join())
    .await
    .expect("forwarder did not exit")
    .unwrap();
  assert_eq!(summary.delivered, 0);
}

#[tokio::test]
async fn test_closed_sink_is_reported() {
  let (in_tx, in_rx) = mpsc::channel(1);
  let (out_tx, out_rx) = mpsc::channel(1);
  drop(out_rx);

  let handle = Forwarder::default().spawn(in_rx, out_tx);
  let _ = in_tx.send(1u32).await;

  match handle.join().await {
    Err(OutgoingQueueError::SinkClosed { pending }) => assert_eq!(pending, 1),
    other => panic!("Expected SinkClosed, got {:?}", other),
  }
}

#[tokio::test]
async fn test_forwards_payloads_that_are_not_sync() {
  use std::cell::Cell;

  let (in_tx, in_rx) = mpsc::channel(1);
  let (out_tx, mut out_rx) = mpsc::channel(1);

  let handle = Forwarder::default().spawn(in_rx, out_tx);
  for i in 0..3u32 {
    in_tx.send((i % 2 == 0, 'x', Cell::new(i))).await.unwrap();
  }
  drop(in_tx);

  for i in 0..3u32 {
    assert_eq!(out_rx.recv().await, Some((i % 2 == 0, 'x', Cell::new(i))));
  }

  let summary = handle.join().await.unwrap();
  assert_eq!(summary.delivered, 3);
}
