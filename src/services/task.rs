// src/services/task.rs
// DOCUMENTATION: Background query tasks
// PURPOSE: Run a query on the shared runtime and deliver exactly one result

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::errors::MapError;

/// Handle to a query running in the background
/// DOCUMENTATION: Await it for the single result. Cancelling or dropping the
/// handle aborts the task so no result is delivered.
#[derive(Debug)]
pub struct QueryTask<T> {
    handle: JoinHandle<Result<T, MapError>>,
}

impl<T: Send + 'static> QueryTask<T> {
    pub fn spawn<F>(runtime: &Handle, query: F) -> Self
    where
        F: Future<Output = Result<T, MapError>> + Send + 'static,
    {
        Self {
            handle: runtime.spawn(query),
        }
    }
}

impl<T> QueryTask<T> {
    /// Abort the query; consuming the handle guarantees nothing is delivered
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for QueryTask<T> {
    type Output = Result<T, MapError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => {
                log::error!("Background query did not complete: {}", e);
                Poll::Ready(Err(MapError::Network))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for QueryTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_delivers_single_result() {
        let task = QueryTask::spawn(&Handle::current(), async { Ok::<_, MapError>(vec![1, 2]) });
        assert_eq!(assert_ok!(task.await), vec![1, 2]);

        let failing = QueryTask::spawn(&Handle::current(), async {
            Err::<Vec<u8>, _>(MapError::PoiFetch)
        });
        assert_eq!(assert_err!(failing.await), MapError::PoiFetch);
    }

    #[tokio::test]
    async fn test_is_finished_after_completion() {
        let task = QueryTask::spawn(&Handle::current(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, MapError>(7)
        });
        assert!(!task.is_finished());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(task.is_finished());
        assert_eq!(assert_ok!(task.await), 7);
    }

    #[tokio::test]
    async fn test_cancel_stops_delivery() {
        let delivered = Arc::new(AtomicBool::new(false));
        let flag = delivered.clone();
        let task = QueryTask::spawn(&Handle::current(), async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, MapError>(())
        });

        task.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!delivered.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_drop_aborts() {
        let delivered = Arc::new(AtomicBool::new(false));
        let flag = delivered.clone();
        {
            let _task = QueryTask::spawn(&Handle::current(), async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, MapError>(())
            });
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!delivered.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_query_is_network_error() {
        let task: QueryTask<()> = QueryTask::spawn(&Handle::current(), async {
            let missing: Option<()> = None;
            missing.expect("query blew up");
            Ok(())
        });
        assert_eq!(assert_err!(task.await), MapError::Network);
    }
}
