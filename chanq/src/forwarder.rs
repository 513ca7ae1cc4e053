use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::collections::{OutgoingQueue, OutgoingQueueError};
use crate::config::Config;

#[cfg(test)]
mod tests;

/// Counters reported when a forwarding loop exits.<br/>
/// 転送ループ終了時に報告されるカウンタ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardSummary {
  /// Elements accepted by the sink.
  pub delivered: u64,
  /// Elements still buffered when shutdown was requested. They are dropped.
  pub discarded: usize,
  /// Largest buffer length observed.
  pub high_water_mark: usize,
}

/// Forwards everything received from `input` into `sink` without ever blocking on `sink`.<br/>
/// `sink` でブロックすることなく、`input` から受信したものをすべて `sink` へ転送します。
///
/// Elements that the sink cannot accept yet are buffered in an [`OutgoingQueue`].
#[derive(Debug, Clone, Default)]
pub struct Forwarder {
  config: Config,
}

impl Forwarder {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Spawns the forwarding loop onto the current tokio runtime.<br/>
  /// 現在の tokio ランタイム上で転送ループを起動します。
  pub fn spawn<E: Send + 'static>(self, input: mpsc::Receiver<E>, sink: mpsc::Sender<E>) -> ForwarderHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(self.run(input, sink, shutdown_rx));
    ForwarderHandle {
      shutdown: shutdown_tx,
      handle,
    }
  }

  /// Runs the forwarding loop until it is shut down, `input` is closed and drained, or the
  /// sink goes away.<br/>
  /// シャットダウンされるか、`input` が閉じて排出されるか、シンクが失われるまで転送ループを実行します。
  ///
  /// Dropping the sending half of `shutdown` counts as a shutdown request. On shutdown any
  /// buffered elements are discarded.
  ///
  /// # Return Value / 戻り値
  /// - `Ok(summary)` - The loop exited normally. / ループが正常に終了した場合。
  /// - `Err(OutgoingQueueError::SinkClosed { .. })` - The sink receiver was dropped while elements were pending. / 要素の保留中にシンクの受信側が破棄された場合。
  pub async fn run<E: Send + 'static>(
    self,
    mut input: mpsc::Receiver<E>,
    sink: mpsc::Sender<E>,
    mut shutdown: oneshot::Receiver<()>,
  ) -> Result<ForwardSummary, OutgoingQueueError> {
    let mut queue = OutgoingQueue::with_capacity(sink, self.config.initial_capacity());
    let mut summary = ForwardSummary::default();
    let mut input_open = true;
    let mut warned = false;

    tracing::debug!(initial_capacity = self.config.initial_capacity(), "Forwarder started");

    loop {
      if !input_open && queue.is_empty() {
        tracing::debug!(delivered = summary.delivered, "Forwarder input closed and drained");
        break;
      }

      tokio::select! {
        biased;
        _ = &mut shutdown => {
          summary.discarded = queue.len();
          tracing::debug!(
            delivered = summary.delivered,
            discarded = summary.discarded,
            "Forwarder shut down"
          );
          break;
        }
        permit = queue.reserve() => match permit {
          Ok(permit) => {
            queue.send(permit);
            summary.delivered += 1;
            if queue.is_empty() {
              warned = false;
            }
          }
          Err(err) => {
            tracing::error!(error = %err, "Forwarder lost its sink");
            return Err(err);
          }
        },
        element = input.recv(), if input_open => match element {
          Some(element) => {
            queue.enqueue(element);
            summary.high_water_mark = summary.high_water_mark.max(queue.len());
            if let Some(threshold) = self.config.warn_threshold() {
              if !warned && queue.len() >= threshold {
                warned = true;
                tracing::warn!(len = queue.len(), threshold, "Forwarder buffer crossed warning threshold");
              }
            }
          }
          None => {
            tracing::trace!(pending = queue.len(), "Forwarder input closed");
            input_open = false;
          }
        },
      }
    }

    Ok(summary)
  }
}

/// Handle to a forwarding loop started with [`Forwarder::spawn`].<br/>
/// [`Forwarder::spawn`] で起動した転送ループへのハンドル。
///
/// Dropping the handle shuts the loop down.
#[derive(Debug)]
pub struct ForwarderHandle {
  shutdown: oneshot::Sender<()>,
  handle: JoinHandle<Result<ForwardSummary, OutgoingQueueError>>,
}

impl ForwarderHandle {
  /// Requests shutdown and waits for the loop to exit. Buffered elements are discarded.<br/>
  /// シャットダウンを要求し、ループの終了を待ちます。バッファ中の要素は破棄されます。
  pub async fn shutdown(self) -> Result<ForwardSummary, OutgoingQueueError> {
    let _ = self.shutdown.send(());
    self.handle.await?
  }

  /// Waits for the loop to exit on its own, which happens once the input is closed and drained.<br/>
  /// 入力が閉じて排出された後、ループが自然に終了するのを待ちます。
  pub async fn join(self) -> Result<ForwardSummary, OutgoingQueueError> {
    let ForwarderHandle { shutdown, handle } = self;
    let result = handle.await?;
    drop(shutdown);
    result
  }

  pub fn is_finished(&self) -> bool {
    self.handle.is_finished()
  }
}
