use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "Early Stopping Trainer")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Number of samples per training batch.
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Learning rate for the optimizer.
    #[arg(long, default_value_t = 0.01)]
    pub learning_rate: f64,

    /// Maximum number of training epochs.
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Epochs without improvement before early stopping.
    #[arg(long, default_value_t = 7)]
    pub patience: u64,

    /// Log every validation loss improvement.
    #[arg(long)]
    pub verbose: bool,

    /// Where the best model is saved.
    #[arg(long, default_value = "checkpoint.safetensors")]
    pub checkpoint: PathBuf,

    /// Number of synthetic samples to generate.
    #[arg(long, default_value_t = 4000)]
    pub samples: usize,

    /// Fraction of data for validation set.
    #[arg(long, default_value_t = 0.1)]
    pub val_ratio: f64,

    /// Fraction of data for test set.
    #[arg(long, default_value_t = 0.1)]
    pub test_ratio: f64,

    /// Standard deviation of each class cluster.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f32,

    /// Seed for data generation, splitting and shuffling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
