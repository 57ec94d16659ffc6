use candle_core::{Device, Result, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

pub const NUM_FEATURES: usize = 2;
pub const NUM_CLASSES: usize = 2;

// Cluster centers, one per class
const CENTERS: [[f32; NUM_FEATURES]; NUM_CLASSES] = [[-1.0, -1.0], [1.0, 1.0]];

/// Index sets into a [`Samples`] collection.
pub struct Splits {
    pub train: Vec<usize>,
    pub val: Vec<usize>,
    pub test: Vec<usize>,
}

/// Two Gaussian clusters in the plane, labelled by cluster.
pub struct Samples {
    features: Vec<[f32; NUM_FEATURES]>,
    labels: Vec<u32>,
}

impl Samples {
    pub fn generate(count: usize, noise: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut features = Vec::with_capacity(count);
        let mut labels = Vec::with_capacity(count);

        for i in 0..count {
            let label = i % NUM_CLASSES;
            let center = CENTERS[label];
            let dx: f32 = StandardNormal.sample(&mut rng);
            let dy: f32 = StandardNormal.sample(&mut rng);
            features.push([center[0] + noise * dx, center[1] + noise * dy]);
            labels.push(label as u32);
        }

        Self { features, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Shuffles all indices and carves off the test and validation sets.
    pub fn split(&self, val_ratio: f64, test_ratio: f64, seed: u64) -> Splits {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));

        let num_test = (self.len() as f64 * test_ratio.clamp(0.0, 1.0)) as usize;
        let num_val = ((self.len() - num_test) as f64 * val_ratio.clamp(0.0, 1.0)) as usize;

        let train = indices.split_off(num_test + num_val);
        let val = indices.split_off(num_test);

        Splits {
            train,
            val,
            test: indices,
        }
    }

    pub fn batches<'a>(
        &'a self,
        indices: &'a [usize],
        batch_size: usize,
        device: &'a Device,
    ) -> impl Iterator<Item = Result<(Tensor, Tensor)>> + 'a {
        indices
            .chunks(batch_size.max(1))
            .map(move |chunk| self.batch(chunk, device))
    }

    fn batch(&self, indices: &[usize], device: &Device) -> Result<(Tensor, Tensor)> {
        let mut xs = Vec::with_capacity(indices.len() * NUM_FEATURES);
        let mut ys = Vec::with_capacity(indices.len());

        for &i in indices {
            xs.extend_from_slice(&self.features[i]);
            ys.push(self.labels[i]);
        }

        let x = Tensor::from_vec(xs, (indices.len(), NUM_FEATURES), device)?;
        let y = Tensor::from_vec(ys, indices.len(), device)?;
        Ok((x, y))
    }
}
