//! Indexed fan-out with a join barrier.
//!
//! Each unit of work runs as its own task. Results are published once, when
//! the task finishes, into a slot keyed by submission index, so the joined
//! output order depends only on the order of submission and never on which
//! task completed first. A task that panics fills its slot with
//! [`RankError::Task`] instead of tearing down its siblings.
//!
//! The tasks live in a [`JoinSet`]: dropping the joining future aborts every
//! task still in flight.

use std::collections::HashMap;
use std::future::Future;

use tokio::task::{Id, JoinSet};

use crate::error::RankError;

pub(crate) struct IndexedTasks<T> {
    set: JoinSet<T>,
    slots: HashMap<Id, usize>,
    len: usize,
}

impl<T: Send + 'static> IndexedTasks<T> {
    pub(crate) fn new() -> Self {
        Self {
            set: JoinSet::new(),
            slots: HashMap::new(),
            len: 0,
        }
    }

    /// Spawn `future`; its output lands in the next free slot.
    pub(crate) fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let handle = self.set.spawn(future);
        self.slots.insert(handle.id(), self.len);
        self.len += 1;
    }

    /// Wait for every task, then return outputs in submission order.
    pub(crate) async fn join_all(mut self) -> Vec<Result<T, RankError>> {
        let mut results: Vec<Option<Result<T, RankError>>> =
            std::iter::repeat_with(|| None).take(self.len).collect();

        while let Some(joined) = self.set.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, value)) => (id, Ok(value)),
                Err(err) => {
                    let what = if err.is_panic() { "panicked" } else { "was cancelled" };
                    (err.id(), Err(what))
                }
            };
            let Some(&index) = self.slots.get(&id) else {
                continue;
            };
            results[index] = Some(outcome.map_err(|what| {
                RankError::Task(format!("task {index} {what}"))
            }));
        }

        results
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| Err(RankError::Task(format!("task {index} never reported"))))
            })
            .collect()
    }
}

/// Run `future` as its own task and wait for it.
///
/// A panic inside `future` comes back as [`RankError::Task`] instead of
/// unwinding into the caller.
pub(crate) async fn run_isolated<F>(future: F) -> Result<F::Output, RankError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let mut tasks = IndexedTasks::new();
    tasks.spawn(future);
    tasks
        .join_all()
        .await
        .pop()
        .unwrap_or_else(|| Err(RankError::Task("task 0 never reported".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn outputs_follow_submission_order_not_completion_order() {
        let mut tasks = IndexedTasks::new();
        for (i, delay) in [30u64, 0, 15].into_iter().enumerate() {
            tasks.spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                i
            });
        }

        let joined: Vec<usize> = tasks
            .join_all()
            .await
            .into_iter()
            .map(|r| r.expect("task succeeds"))
            .collect();
        assert_eq!(joined, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn panicking_task_reports_error_in_its_slot() {
        let mut tasks = IndexedTasks::new();
        tasks.spawn(async { 1u32 });
        tasks.spawn(async {
            if true {
                panic!("boom");
            }
            2u32
        });
        tasks.spawn(async { 3u32 });

        let joined = tasks.join_all().await;
        assert_eq!(joined.len(), 3);
        assert_eq!(*joined[0].as_ref().expect("first succeeds"), 1);
        let err = joined[1].as_ref().unwrap_err();
        assert!(err.to_string().contains("task 1 panicked"));
        assert_eq!(*joined[2].as_ref().expect("third succeeds"), 3);
    }

    #[tokio::test]
    async fn isolated_task_returns_output() {
        let value = run_isolated(async { 7u8 }).await.expect("task succeeds");
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn isolated_panic_becomes_error() {
        let result = run_isolated(async {
            if true {
                panic!("collaborator bug");
            }
            0u8
        })
        .await;
        assert!(matches!(result, Err(RankError::Task(_))));
    }

    #[tokio::test]
    async fn empty_set_joins_immediately() {
        let tasks: IndexedTasks<()> = IndexedTasks::new();
        assert!(tasks.join_all().await.is_empty());
    }
}
