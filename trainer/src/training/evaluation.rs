use candle_core::{DType, Device, Error, Result};
use candle_nn::loss::cross_entropy;
use candle_nn::Module;

use crate::data::Samples;
use crate::network::Classifier;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub loss: f32,
    pub accuracy: f32,
}

/// Mean cross-entropy and accuracy over `indices`, weighted by sample.
///
/// An empty index set is an error: there is no loss to report.
pub fn evaluate(
    network: &Classifier,
    samples: &Samples,
    indices: &[usize],
    batch_size: usize,
    device: &Device,
) -> Result<Evaluation> {
    if indices.is_empty() {
        return Err(Error::Msg("empty evaluation set".to_string()));
    }

    let mut total_loss = 0f32;
    let mut correct = 0f32;
    let mut count = 0usize;

    for batch in samples.batches(indices, batch_size, device) {
        let (x, y) = batch?;
        let batch_len = y.dim(0)?;

        let logits = network.forward(&x)?;
        let loss = cross_entropy(&logits, &y)?.to_vec0::<f32>()?;

        let predictions = logits.argmax(1)?;
        correct += predictions
            .eq(&y)?
            .to_dtype(DType::F32)?
            .sum_all()?
            .to_vec0::<f32>()?;

        total_loss += loss * batch_len as f32;
        count += batch_len;
    }

    let count = count as f32;
    Ok(Evaluation {
        loss: total_loss / count,
        accuracy: correct / count,
    })
}
