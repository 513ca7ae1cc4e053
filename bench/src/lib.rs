//! Payloads and forwarding loops shared by the benchmarks.

use chanq_rs::Forwarder;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone)]
pub struct Small {
  pub s: String,
  pub i: i64,
}

#[derive(Debug, Clone)]
pub struct Large {
  pub s1: Small,
  pub s2: Small,
  pub s3: Small,
  pub s4: Small,
  pub s5: Small,
}

pub fn make_small() -> Small {
  Small {
    s: "something".to_string(),
    i: 42,
  }
}

pub fn make_large() -> Large {
  Large {
    s1: make_small(),
    s2: make_small(),
    s3: make_small(),
    s4: make_small(),
    s5: make_small(),
  }
}

pub fn new_small() -> Box<Small> {
  Box::new(make_small())
}

pub fn new_large() -> Box<Large> {
  Box::new(make_large())
}

/// Baseline without buffering: blocks on the sink inside the loop.
pub async fn direct_forward<E>(
  mut input: mpsc::Receiver<E>,
  sink: mpsc::Sender<E>,
  mut shutdown: oneshot::Receiver<()>,
) {
  loop {
    tokio::select! {
      biased;
      _ = &mut shutdown => return,
      element = input.recv() => match element {
        Some(element) => {
          if sink.send(element).await.is_err() {
            return;
          }
        }
        None => return,
      },
    }
  }
}

pub async fn queued_forward<E: Send + 'static>(
  input: mpsc::Receiver<E>,
  sink: mpsc::Sender<E>,
  shutdown: oneshot::Receiver<()>,
) {
  if let Err(err) = Forwarder::default().run(input, sink, shutdown).await {
    tracing::error!(error = %err, "Forwarder failed");
  }
}
