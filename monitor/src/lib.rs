pub mod checkpoint;
pub mod config;
pub mod snapshot;
pub mod stopping;

pub use checkpoint::Checkpoint;
pub use config::MonitorConfig;
pub use snapshot::Snapshot;
pub use stopping::StoppingMonitor;
