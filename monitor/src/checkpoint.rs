use candle_core::{safetensors, Device, Result, Tensor};
use candle_nn::VarMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::snapshot::Snapshot;

/// A single safetensors file holding the best parameters seen so far.
///
/// Every save overwrites the previous contents; there is no rotation.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, model: &impl Snapshot) -> Result<()> {
        let tensors = model.snapshot()?;
        safetensors::save(&tensors, &self.path)
    }

    pub fn load(&self, device: &Device) -> Result<HashMap<String, Tensor>> {
        safetensors::load(&self.path, device)
    }

    /// Copies the saved parameters back into the variables of `varmap`.
    pub fn restore(&self, varmap: &mut VarMap) -> Result<()> {
        varmap.load(&self.path)
    }
}
