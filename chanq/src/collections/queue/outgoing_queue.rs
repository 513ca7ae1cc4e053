use std::collections::VecDeque;
use std::future::Future;

use futures::future;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{self, OwnedPermit};

use crate::collections::OutgoingQueueError;


/// An outgoing queue that makes a bounded sink behave as if it had an unlimited buffer.<br/>
/// 有界なシンクを無制限のバッファを持つかのように扱うための送信キュー。
///
/// The queue is meant to be owned by a single `tokio::select!` loop. Elements are fed in
/// with [`enqueue`](Self::enqueue) and handed out one at a time through the
/// [`ready_gate`](Self::ready_gate) / [`ready_item`](Self::ready_item) pair, which is only
/// populated while something is pending.<br/>
/// 単一の `tokio::select!` ループが所有することを前提としたキュー。
///
/// The sink is owned by the caller. The queue never closes it and assumes its receiver stays
/// alive for as long as the queue is in use.
#[derive(Debug)]
pub struct OutgoingQueue<T> {
  sink: mpsc::Sender<T>,
  pending: VecDeque<T>,
}

impl<T> OutgoingQueue<T> {
  /// Creates an empty queue bound to the given sink.<br/>
  /// 指定されたシンクに束縛された空のキューを生成します。
  pub fn new(sink: mpsc::Sender<T>) -> Self {
    Self {
      sink,
      pending: VecDeque::new(),
    }
  }

  /// Creates an empty queue whose buffer can hold `capacity` elements before reallocating.<br/>
  /// 再確保なしに `capacity` 個の要素を保持できる空のキューを生成します。
  ///
  /// This is a sizing hint only, the queue still grows without limit.
  pub fn with_capacity(sink: mpsc::Sender<T>, capacity: usize) -> Self {
    Self {
      sink,
      pending: VecDeque::with_capacity(capacity),
    }
  }

  /// Appends an element to the tail of the queue.<br/>
  /// 要素をキューの末尾に追加します。
  ///
  /// If the queue was empty the element becomes the ready item and the gate opens.
  pub fn enqueue(&mut self, element: T) {
    self.pending.push_back(element);
    if self.pending.len() == 1 {
      tracing::trace!("OutgoingQueue gate opened");
    }
  }

  /// Removes the element that was just handed to the sink and returns it.<br/>
  /// シンクに渡したばかりの要素を削除して返します。
  ///
  /// Must only be called after the ready item was accepted by the sink, otherwise that element
  /// is lost. Prefer [`send`](Self::send), which couples acceptance and removal.
  ///
  /// # Panics
  /// Panics if the queue is empty.
  pub fn dequeue(&mut self) -> T {
    Self::take_front(&mut self.pending)
  }

  /// Returns the element currently offered to the sink, if any.<br/>
  /// 現在シンクに提示している要素を返します。
  pub fn ready_item(&self) -> Option<&T> {
    self.pending.front()
  }

  /// Returns the sink while there is something to offer, `None` otherwise.<br/>
  /// 提示する要素がある間はシンクを、ない場合は `None` を返します。
  pub fn ready_gate(&self) -> Option<&mpsc::Sender<T>> {
    if self.pending.is_empty() {
      None
    } else {
      Some(&self.sink)
    }
  }

  pub fn is_offering(&self) -> bool {
    !self.pending.is_empty()
  }

  pub fn len(&self) -> usize {
    self.pending.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }

  /// Reserves a slot in the sink for the ready item.<br/>
  /// 提示中の要素のためにシンクのスロットを予約します。
  ///
  /// The returned future does not borrow the queue and never resolves while the queue is empty,
  /// so it can be used as a `tokio::select!` branch next to branches that mutate the queue.
  /// Dropping it before completion leaves the queue untouched.
  ///
  /// # Return Value / 戻り値
  /// - `Ok(permit)` - A slot is reserved, pass it to [`send`](Self::send). / スロットを予約した場合。
  /// - `Err(OutgoingQueueError::SinkClosed { .. })` - The sink receiver was dropped. / シンクの受信側が破棄された場合。
  pub fn reserve(&self) -> impl Future<Output = Result<OwnedPermit<T>, OutgoingQueueError>> + Send + 'static
  where
    T: Send + 'static, {
    let gate = self.ready_gate().cloned();
    let pending = self.pending.len();
    async move {
      match gate {
        Some(sink) => sink
          .reserve_owned()
          .await
          .map_err(|_| OutgoingQueueError::SinkClosed { pending }),
        None => future::pending().await,
      }
    }
  }

  /// Hands the ready item to the sink through a reserved slot and removes it from the queue.<br/>
  /// 予約済みスロットを通じて提示中の要素をシンクに渡し、キューから削除します。
  ///
  /// # Panics
  /// Panics if the queue is empty.
  pub fn send(&mut self, permit: OwnedPermit<T>) {
    let element = self.dequeue();
    permit.send(element);
  }

  /// Attempts to hand the ready item to the sink without waiting.<br/>
  /// 待機せずに提示中の要素をシンクへ渡すことを試みます。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(true)` - The ready item was accepted and removed. / 要素が受け入れられ削除された場合。
  /// - `Ok(false)` - Nothing is offered or the sink is full. / 提示する要素がないかシンクが満杯の場合。
  /// - `Err(OutgoingQueueError::SinkClosed { .. })` - The sink receiver was dropped. / シンクの受信側が破棄された場合。
  pub fn try_forward(&mut self) -> Result<bool, OutgoingQueueError> {
    if self.pending.is_empty() {
      return Ok(false);
    }
    match self.sink.try_reserve() {
      Ok(permit) => {
        permit.send(Self::take_front(&mut self.pending));
        Ok(true)
      }
      Err(TrySendError::Full(())) => Ok(false),
      Err(TrySendError::Closed(())) => Err(OutgoingQueueError::SinkClosed {
        pending: self.pending.len(),
      }),
    }
  }

  fn take_front(pending: &mut VecDeque<T>) -> T {
    let Some(element) = pending.pop_front() else {
      panic!("OutgoingQueue::dequeue called on an empty queue");
    };
    if pending.is_empty() {
      tracing::trace!("OutgoingQueue gate closed");
    }
    element
  }
}
