use candle_core::{DType, Device, Tensor};
use candle_nn::loss::cross_entropy;
use candle_nn::{AdamW, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use monitor::{MonitorConfig, StoppingMonitor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::error::Error;

use crate::args::Args;
use crate::data::{Samples, Splits};
use crate::network::Classifier;

use super::evaluation::{evaluate, Evaluation};
use super::progress::TrainingProgressBar;

pub struct Trainer {
    network: Classifier,
    optimizer: AdamW,
    varmap: VarMap,
    device: Device,
    monitor: StoppingMonitor,
    rng: StdRng,
    batch_size: usize,
    epochs: usize,
}

impl Trainer {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error>> {
        let device = get_device()?;

        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let network = Classifier::new(&vs)?;
        let optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: args.learning_rate,
                ..Default::default()
            },
        )?;

        let monitor = StoppingMonitor::new(MonitorConfig::new(
            args.patience,
            args.verbose,
            args.checkpoint.clone(),
        ));

        Ok(Self {
            network,
            optimizer,
            varmap,
            device,
            monitor,
            rng: StdRng::seed_from_u64(args.seed),
            batch_size: args.batch_size,
            epochs: args.epochs,
        })
    }

    /// Trains until the epoch budget runs out or the monitor says stop, then
    /// evaluates the best checkpoint on the test split.
    pub fn train(
        &mut self,
        samples: &Samples,
        splits: &Splits,
    ) -> Result<Evaluation, Box<dyn Error>> {
        let mut train_idx = splits.train.clone();

        for epoch in 1..=self.epochs {
            train_idx.shuffle(&mut self.rng);

            let val = self.train_epoch(samples, &train_idx, &splits.val)?;
            self.monitor.observe(val.loss, val.accuracy, &self.varmap)?;

            if self.monitor.should_stop() {
                log::info!("Early stopping after {} epochs", epoch);
                break;
            }
        }

        self.test_model(samples, &splits.test)
    }

    pub fn monitor(&self) -> &StoppingMonitor {
        &self.monitor
    }

    fn train_epoch(
        &mut self,
        samples: &Samples,
        train_idx: &[usize],
        val_idx: &[usize],
    ) -> Result<Evaluation, Box<dyn Error>> {
        let num_batches = train_idx.len().div_ceil(self.batch_size.max(1));
        let progress = TrainingProgressBar::new(num_batches)?;

        let mut total_loss = 0.0;
        let mut batches_processed = 0;
        let mut train_loss = 0.0;

        let device = self.device.clone();
        for batch in samples.batches(train_idx, self.batch_size, &device) {
            let (x, y) = batch?;
            let loss = self.train_step(&x, &y)?;

            total_loss += loss;
            batches_processed += 1;

            train_loss = total_loss / batches_processed as f32;
            progress.update(train_loss);
        }

        let val = evaluate(
            &self.network,
            samples,
            val_idx,
            self.batch_size,
            &self.device,
        )?;
        progress.finish(&val, train_loss);

        Ok(val)
    }

    #[inline]
    fn train_step(&mut self, x: &Tensor, y: &Tensor) -> candle_core::Result<f32> {
        let logits = self.network.forward(x)?;
        let loss = cross_entropy(&logits, y)?;
        self.optimizer.backward_step(&loss)?;
        loss.to_vec0::<f32>()
    }

    fn test_model(
        &mut self,
        samples: &Samples,
        test_idx: &[usize],
    ) -> Result<Evaluation, Box<dyn Error>> {
        log::info!("Running final test set evaluation...");

        let checkpoint = self.monitor.checkpoint();
        if checkpoint.exists() {
            log::info!("Restoring best model from {}", checkpoint.path().display());
            checkpoint.restore(&mut self.varmap)?;
        }

        let test = evaluate(
            &self.network,
            samples,
            test_idx,
            self.batch_size,
            &self.device,
        )?;
        log::info!("Test Loss: {:.6}, Accuracy: {:.6}", test.loss, test.accuracy);

        Ok(test)
    }
}

fn get_device() -> Result<Device, Box<dyn Error>> {
    #[cfg(feature = "cuda")]
    if let Ok(device) = Device::cuda_if_available(0) {
        if device.is_cuda() {
            log::info!("Using CUDA device");
            return Ok(device);
        }
    }

    #[cfg(feature = "metal")]
    if let Ok(device) = Device::new_metal(0) {
        if device.is_metal() {
            log::info!("Using Metal device");
            return Ok(device);
        }
    }

    log::info!("Using CPU device");
    Ok(Device::Cpu)
}
