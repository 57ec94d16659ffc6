use std::path::PathBuf;

/// Patience used when none is given.
pub const DEFAULT_PATIENCE: u64 = 7;

/// Checkpoint location used when none is given, relative to the working directory.
pub const DEFAULT_CHECKPOINT_PATH: &str = "checkpoint.safetensors";

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Consecutive non-improving observations tolerated before stopping.
    pub patience: u64,
    /// Log a line for every improvement.
    pub verbose: bool,
    /// File the best parameters are written to. Overwritten on every improvement.
    pub checkpoint_path: PathBuf,
}

impl MonitorConfig {
    pub fn new(patience: u64, verbose: bool, checkpoint_path: impl Into<PathBuf>) -> Self {
        Self {
            patience,
            verbose,
            checkpoint_path: checkpoint_path.into(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PATIENCE, false, DEFAULT_CHECKPOINT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.patience, 7);
        assert!(!config.verbose);
        assert_eq!(config.checkpoint_path, PathBuf::from("checkpoint.safetensors"));
    }
}
