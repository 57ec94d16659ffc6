use candle_core::{Error, Result, Tensor};
use candle_nn::VarMap;
use std::collections::HashMap;

/// Anything that can hand out a point-in-time copy of its trainable parameters.
///
/// The returned tensors must not share storage with the live parameters, so that
/// optimizer steps taken after the call do not leak into the snapshot.
pub trait Snapshot {
    fn snapshot(&self) -> Result<HashMap<String, Tensor>>;
}

impl Snapshot for VarMap {
    fn snapshot(&self) -> Result<HashMap<String, Tensor>> {
        let vars = self
            .data()
            .lock()
            .map_err(|_| Error::Msg("variable map lock poisoned".to_string()))?;

        vars.iter()
            .map(|(name, var)| Ok((name.clone(), var.as_tensor().copy()?)))
            .collect()
    }
}

impl Snapshot for HashMap<String, Tensor> {
    fn snapshot(&self) -> Result<HashMap<String, Tensor>> {
        self.iter()
            .map(|(name, tensor)| Ok((name.clone(), tensor.copy()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::{linear, VarBuilder};

    #[test]
    fn test_varmap_snapshot_names() -> Result<()> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let _layer = linear(4, 2, vs.pp("fc"))?;

        let snapshot = varmap.snapshot()?;
        let mut names: Vec<_> = snapshot.keys().cloned().collect();
        names.sort();

        assert_eq!(names, vec!["fc.bias".to_string(), "fc.weight".to_string()]);
        assert_eq!(snapshot["fc.weight"].dims(), &[2, 4]);
        Ok(())
    }

    #[test]
    fn test_varmap_snapshot_is_detached() -> Result<()> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let _layer = linear(3, 1, vs.pp("fc"))?;

        let before = varmap.snapshot()?;
        let original = before["fc.bias"].to_vec1::<f32>()?;

        // Mutate the live variable after the snapshot was taken
        let bias = varmap.data().lock().unwrap()["fc.bias"].clone();
        bias.set(&Tensor::new(&[42f32], &Device::Cpu)?)?;

        assert_eq!(before["fc.bias"].to_vec1::<f32>()?, original);
        assert_eq!(varmap.snapshot()?["fc.bias"].to_vec1::<f32>()?, vec![42.0]);
        Ok(())
    }

    #[test]
    fn test_tensor_map_snapshot() -> Result<()> {
        let weights = Tensor::new(&[1f32, 2., 3.], &Device::Cpu)?;
        let params = HashMap::from([("w".to_string(), weights)]);

        let snapshot = params.snapshot()?;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["w"].to_vec1::<f32>()?, vec![1.0, 2.0, 3.0]);
        Ok(())
    }
}
