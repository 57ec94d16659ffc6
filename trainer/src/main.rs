mod args;
mod data;
mod network;
mod training;

use args::Args;
use clap::Parser;
use data::Samples;
use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, SimpleLogger};
use std::error::Error;
use training::Trainer;

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    log::info!("Generating {} samples", args.samples);
    let samples = Samples::generate(args.samples, args.noise, args.seed);
    if samples.is_empty() {
        return Err("No samples to train on".into());
    }

    let splits = samples.split(args.val_ratio, args.test_ratio, args.seed);
    if splits.val.is_empty() || splits.test.is_empty() {
        return Err("Validation and test splits must not be empty".into());
    }
    log::info!(
        "Split into {} train, {} validation and {} test samples",
        splits.train.len(),
        splits.val.len(),
        splits.test.len()
    );

    let mut trainer = Trainer::new(&args)?;
    trainer.train(&samples, &splits)?;

    let monitor = trainer.monitor();
    log::info!(
        "Best validation loss {:.6} (acc {:.6}) saved to {}",
        monitor.min_validation_loss(),
        monitor.max_validation_accuracy(),
        monitor.checkpoint().path().display()
    );

    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();
    SimpleLogger::init(LevelFilter::Info, plain_config())?;

    Ok(args)
}

// Bare message lines, no time, level, thread, target or location
fn plain_config() -> Config {
    ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_max_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Record};
    use simplelog::WriteLogger;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_config_prints_bare_lines() {
        let buffer = Buffer::default();
        let logger = WriteLogger::new(LevelFilter::Info, plain_config(), buffer.clone());

        logger.log(
            &Record::builder()
                .args(format_args!("EarlyStopping counter: 1 out of 3"))
                .level(Level::Info)
                .target("monitor::stopping")
                .build(),
        );
        logger.flush();

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output, "EarlyStopping counter: 1 out of 3\n");
    }
}
