use candle_core::{Result, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};

use crate::data::{NUM_CLASSES, NUM_FEATURES};

const HIDDEN_SIZE: usize = 16;

// Small MLP producing one logit per class
pub struct Classifier {
    input: Linear,
    hidden: Linear,
    output: Linear,
}

impl Classifier {
    pub fn new(vs: &VarBuilder) -> Result<Self> {
        Ok(Self {
            input: linear(NUM_FEATURES, HIDDEN_SIZE, vs.pp("input"))?,
            hidden: linear(HIDDEN_SIZE, HIDDEN_SIZE, vs.pp("hidden"))?,
            output: linear(HIDDEN_SIZE, NUM_CLASSES, vs.pp("output"))?,
        })
    }
}

impl Module for Classifier {
    #[inline]
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = x.apply(&self.input)?.relu()?;
        let x = x.apply(&self.hidden)?.relu()?;
        x.apply(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_forward_shape() -> Result<()> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let net = Classifier::new(&vs)?;

        let x = Tensor::zeros((5, NUM_FEATURES), DType::F32, &Device::Cpu)?;
        let logits = net.forward(&x)?;
        assert_eq!(logits.dims(), &[5, NUM_CLASSES]);

        // input, hidden, output: weight and bias each
        assert_eq!(varmap.all_vars().len(), 6);
        Ok(())
    }
}
