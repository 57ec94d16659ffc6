use candle_core::Result;

use crate::checkpoint::Checkpoint;
use crate::config::MonitorConfig;
use crate::snapshot::Snapshot;

/// Tracks validation loss across epochs and signals when training should stop.
///
/// Every observation whose loss is equal to or lower than the best seen so far
/// counts as an improvement: the model is written to the checkpoint and the
/// counter resets. Any other observation bumps the counter, and once it reaches
/// `patience` the monitor latches into the stopped state.
///
/// The monitor never refuses an observation. Callers are expected to check
/// [`StoppingMonitor::should_stop`] after each call and leave the loop.
#[derive(Debug)]
pub struct StoppingMonitor {
    patience: u64,
    verbose: bool,
    counter: u64,
    best_score: Option<f32>,
    best_accuracy: Option<f32>,
    early_stop: bool,
    min_validation_loss: f32,
    max_validation_accuracy: f32,
    checkpoint: Checkpoint,
}

impl StoppingMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            patience: config.patience,
            verbose: config.verbose,
            counter: 0,
            best_score: None,
            best_accuracy: None,
            early_stop: false,
            min_validation_loss: f32::INFINITY,
            max_validation_accuracy: 0.0,
            checkpoint: Checkpoint::new(config.checkpoint_path),
        }
    }

    /// Records one evaluation cycle. Fails only if the checkpoint cannot be written.
    pub fn observe(
        &mut self,
        val_loss: f32,
        val_accuracy: f32,
        model: &impl Snapshot,
    ) -> Result<()> {
        // Higher is better
        let score = -val_loss;

        match self.best_score {
            Some(best) if score < best => {
                self.counter += 1;
                log::info!(
                    "EarlyStopping counter: {} out of {}",
                    self.counter,
                    self.patience
                );
                if self.counter >= self.patience {
                    self.early_stop = true;
                }
            }
            _ => {
                self.best_score = Some(score);
                self.best_accuracy = Some(val_accuracy);
                self.persist_best(val_loss, val_accuracy, model)?;
                self.counter = 0;
            }
        }

        Ok(())
    }

    fn persist_best(
        &mut self,
        val_loss: f32,
        val_accuracy: f32,
        model: &impl Snapshot,
    ) -> Result<()> {
        if self.verbose {
            log::info!(
                "Validation loss decreased ({:.6} --> {:.6} acc {:.6} --> {:.6}). Saving model ...",
                self.min_validation_loss,
                val_loss,
                self.max_validation_accuracy,
                val_accuracy
            );
        }

        self.checkpoint.save(model)?;

        self.min_validation_loss = val_loss;
        self.max_validation_accuracy = val_accuracy;
        Ok(())
    }

    pub fn should_stop(&self) -> bool {
        self.early_stop
    }

    pub fn patience(&self) -> u64 {
        self.patience
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Consecutive non-improving observations since the last improvement.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Negated best validation loss, `None` before the first observation.
    pub fn best_score(&self) -> Option<f32> {
        self.best_score
    }

    pub fn best_accuracy(&self) -> Option<f32> {
        self.best_accuracy
    }

    pub fn min_validation_loss(&self) -> f32 {
        self.min_validation_loss
    }

    /// Accuracy of the most recent improvement, not the highest accuracy seen.
    pub fn max_validation_accuracy(&self) -> f32 {
        self.max_validation_accuracy
    }

    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }
}

impl Default for StoppingMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
