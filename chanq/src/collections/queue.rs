use thiserror::Error;

mod outgoing_queue;

pub use self::outgoing_queue::*;

/// An error that occurs when forwarding out of a queue fails.<br/>
/// キューからの転送に失敗した場合に発生するエラー。
#[derive(Error, Debug)]
pub enum OutgoingQueueError {
  /// The receiving half of the sink was dropped while the queue was still in use.<br/>
  /// キューの使用中にシンクの受信側が破棄された。
  #[error("sink closed with {pending} element(s) pending")]
  SinkClosed { pending: usize },
  /// The task running the forwarding loop panicked or was aborted.<br/>
  /// 転送ループを実行するタスクがパニックまたは中断した。
  #[error("forwarder task failed: {0}")]
  TaskFailed(#[from] tokio::task::JoinError),
}
