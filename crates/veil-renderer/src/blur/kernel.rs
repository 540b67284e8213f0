//! Gaussian weights folded for bilinear sampling.
//!
//! Two neighbouring texels `i` and `i + 1` are fetched with one sample
//! placed between them at the weighted offset, so a kernel of radius `r`
//! needs `1 + r / 2` taps per side instead of `1 + r`.

use super::BlurConfiguration;

/// Largest tap count the blur shader declares.
pub const MAX_KERNEL_TAPS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelTap {
    pub weight: f32,
    /// Distance from the centre in texels.
    pub offset: f32,
}

/// Reduced kernel, centre tap first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlurKernel {
    weights: Vec<f32>,
    offsets: Vec<f32>,
}

impl BlurKernel {
    pub fn build(config: &BlurConfiguration) -> Self {
        let radius = config.normalized_radius();
        let raw = gaussian_weights(radius, config.sigma);

        let mut kernel = Self {
            weights: vec![raw[0]],
            offsets: vec![0.0],
        };
        for i in (1..radius as usize).step_by(2) {
            let (w1, w2) = (raw[i], raw[i + 1]);
            let total = w1 + w2;
            kernel.weights.push(total);
            kernel
                .offsets
                .push((i as f32 * w1 + (i + 1) as f32 * w2) / total);
        }
        kernel
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn taps(&self) -> impl Iterator<Item = KernelTap> + '_ {
        self.weights
            .iter()
            .zip(&self.offsets)
            .map(|(&weight, &offset)| KernelTap { weight, offset })
    }
}

/// One side of a normalized 1D Gaussian, `radius + 1` entries.
///
/// Entry 0 is the centre; the mirrored kernel sums to 1.
pub fn gaussian_weights(radius: u32, sigma: f32) -> Vec<f32> {
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (0..=radius)
        .map(|i| {
            let x = i as f32;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect();
    let total = weights[0] + 2.0 * weights[1..].iter().sum::<f32>();
    for weight in &mut weights {
        *weight /= total;
    }
    weights
}
