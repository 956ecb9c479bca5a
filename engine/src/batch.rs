use rayon::prelude::*;
use shared::{BatchItem, BatchOutcome, BatchResult, PredictionResult};

use crate::config::BatchConfig;
use crate::error::InferenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStrategy {
    Sequential,
    Parallel,
}

/// Runs the single-image pipeline over a collection. Items fail on their own:
/// the result always has one entry per input, in input order.
pub struct BatchCoordinator {
    pool: Option<rayon::ThreadPool>,
    parallel_threshold: usize,
}

impl BatchCoordinator {
    pub fn new(config: &BatchConfig) -> Self {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("batch-worker-{}", i))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("Failed to start batch worker pool, batches will run sequentially: {}", e);
                None
            }
        };
        Self {
            pool,
            parallel_threshold: config.parallel_threshold.max(1),
        }
    }

    pub fn strategy(&self, len: usize) -> ProcessingStrategy {
        if self.pool.is_some() && len >= self.parallel_threshold {
            ProcessingStrategy::Parallel
        } else {
            ProcessingStrategy::Sequential
        }
    }

    pub fn run<T, F>(&self, inputs: &[T], classify: F) -> BatchResult
    where
        T: AsRef<[u8]> + Sync,
        F: Fn(&[u8]) -> Result<PredictionResult, InferenceError> + Sync,
    {
        if inputs.is_empty() {
            log::warn!("Received an empty batch");
            return BatchResult::from_items(Vec::new());
        }

        let process = |(index, input): (usize, &T)| -> BatchItem {
            let outcome = match classify(input.as_ref()) {
                Ok(result) => BatchOutcome::Prediction(Box::new(result)),
                Err(e) => {
                    log::error!("Error analyzing image {}: {}", index, e);
                    BatchOutcome::Error(e.to_record())
                }
            };
            BatchItem { index, outcome }
        };

        let strategy = self.strategy(inputs.len());
        log::debug!("Processing {} images with {:?} strategy", inputs.len(), strategy);

        // indexed collect keeps input order regardless of completion order
        let items: Vec<BatchItem> = match (&self.pool, strategy) {
            (Some(pool), ProcessingStrategy::Parallel) => {
                pool.install(|| inputs.par_iter().enumerate().map(process).collect::<Vec<_>>())
            }
            _ => inputs.iter().enumerate().map(process).collect(),
        };

        let result = BatchResult::from_items(items);
        log::info!(
            "Batch finished: {}/{} images processed",
            result.processed_images,
            result.total_images
        );
        result
    }
}
