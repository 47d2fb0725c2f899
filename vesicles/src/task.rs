//! Running a segmentation off the caller's thread.
//!
//! The pipeline is CPU bound, so it runs on tokio's blocking pool. A task
//! delivers exactly one result: either through [`SegmentationTask::join`] or
//! through the callback given to [`SegmentationTask::spawn_with_callback`].
//! There is no cancellation and no progress reporting.

use num_traits::AsPrimitive;
use tokio::task::JoinHandle;
use tracing::error;

use crate::config::SegmentationConfig;
use crate::error::{Error, Result};
use crate::pipeline::{segment, Segmentation};
use crate::stack::Stack;

#[derive(Debug)]
pub struct SegmentationTask {
    handle: JoinHandle<Result<Segmentation>>,
}

impl SegmentationTask {
    /// Start segmenting `stack` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T>(stack: Stack<T>, name: impl Into<String>, config: SegmentationConfig) -> Self
    where
        T: AsPrimitive<f64> + Send + Sync,
    {
        let name = name.into();
        let handle = tokio::task::spawn_blocking(move || segment(&stack, &name, &config));
        Self { handle }
    }

    /// Start segmenting `stack` and hand the result to `callback` once done.
    pub fn spawn_with_callback<T, Callback>(
        stack: Stack<T>,
        name: impl Into<String>,
        config: SegmentationConfig,
        callback: Callback,
    ) -> JoinHandle<()>
    where
        T: AsPrimitive<f64> + Send + Sync,
        Callback: FnOnce(Result<Segmentation>) + Send + 'static,
    {
        let task = Self::spawn(stack, name, config);
        tokio::spawn(async move {
            let result = task.join().await;
            if let Err(err) = &result {
                error!("Segmentation failed: {err}");
            }
            callback(result);
        })
    }

    /// Wait for the result.
    pub async fn join(self) -> Result<Segmentation> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => Err(Error::TaskFailed(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::testing::SyntheticFrame;

    fn exact_config() -> SegmentationConfig {
        SegmentationConfig {
            membrane_erosion: 0,
            n_sigma: 0.0,
            downsizing_ratio: 1,
            ..Default::default()
        }
    }

    fn spot_stack() -> Stack<f64> {
        SyntheticFrame::new(60, 60, 0.0)
            .disk(30, 30, 20, 0.4)
            .disk(30, 30, 2, 1.0)
            .repeat(2)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_join_returns_segmentation() {
        let task = SegmentationTask::spawn(spot_stack(), "bg", exact_config());
        let result = task.join().await.unwrap();
        assert_eq!(result.name, "bg_vesicle");
        assert_eq!(result.labels.num_labels(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_delivered() {
        let config = SegmentationConfig {
            downsizing_ratio: 0,
            ..Default::default()
        };
        let err = SegmentationTask::spawn(spot_stack(), "bg", config)
            .join()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }), "unexpected error: {err}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_callback_runs_exactly_once() {
        let (tx, rx) = mpsc::channel();
        let handle = SegmentationTask::spawn_with_callback(spot_stack(), "bg", exact_config(), move |result| {
            tx.send(result.map(|s| s.labels.num_labels())).unwrap();
        });
        handle.await.unwrap();

        let delivered: Vec<_> = rx.try_iter().collect();
        assert_eq!(delivered.len(), 1);
        assert_eq!(*delivered[0].as_ref().unwrap(), 1);
    }
}
