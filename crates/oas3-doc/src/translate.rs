//! Order-preserving parallel translation utilities.
//!
//! `translate_slice_parallel` fans translation out over worker tasks and
//! delivers results to the consumer in input order regardless of
//! completion order. `translate_pipeline` is the single-producer,
//! single-consumer variant over bounded channels.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;

/// Outcome of translating one element.
pub enum Translated<U> {
  Value(U),
  /// No value for this element; skip delivery and keep going.
  Skip,
  /// Stop producing; everything translated so far still counts.
  Done,
}

/// Outcome of consuming one translated value.
pub enum Consumed {
  Accepted,
  /// Stop delivering; no further consume calls happen.
  Done,
}

fn worker_count() -> usize {
  std::thread::available_parallelism().map_or(4, std::num::NonZero::get)
}

/// Applies `translate` to every element in parallel and feeds the results
/// to `consume` in input order.
///
/// The first translation error cancels remaining delivery: once an error
/// is returned, `consume` is never invoked again. `Translated::Done` and
/// `Consumed::Done` end the run successfully with partial output.
pub async fn translate_slice_parallel<T, U, Tr, Co>(
  items: Vec<T>,
  translate: Tr,
  mut consume: Co,
) -> anyhow::Result<()>
where
  T: Send + 'static,
  U: Send + 'static,
  Tr: Fn(usize, T) -> anyhow::Result<Translated<U>> + Send + Sync + 'static,
  Co: FnMut(U) -> anyhow::Result<Consumed>,
{
  let translate = Arc::new(translate);
  let mut results = futures::stream::iter(items.into_iter().enumerate().map(|(index, item)| {
    let translate = translate.clone();
    tokio::spawn(async move { translate(index, item) })
  }))
  .buffered(worker_count());

  while let Some(joined) = results.next().await {
    match joined?? {
      Translated::Value(value) => match consume(value)? {
        Consumed::Accepted => {}
        Consumed::Done => return Ok(()),
      },
      Translated::Skip => {}
      Translated::Done => return Ok(()),
    }
  }
  Ok(())
}

/// Streams items from `input` through `translate` onto `output`.
///
/// Errors cancel both ends: the receiver is dropped so blocked producers
/// observe a closed channel, and the sender is dropped so the consumer's
/// stream ends. A consumer that hangs up ends the pipeline successfully.
pub async fn translate_pipeline<T, U, Tr>(
  mut input: mpsc::Receiver<T>,
  output: mpsc::Sender<U>,
  translate: Tr,
) -> anyhow::Result<()>
where
  Tr: Fn(T) -> anyhow::Result<Translated<U>>,
{
  while let Some(item) = input.recv().await {
    match translate(item)? {
      Translated::Value(value) => {
        if output.send(value).await.is_err() {
          // consumer hung up; treat as end of input
          return Ok(());
        }
      }
      Translated::Skip => {}
      Translated::Done => return Ok(()),
    }
  }
  Ok(())
}
