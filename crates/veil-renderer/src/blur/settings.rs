use veil_config::BlurConfig;

/// Sigma values closer than this compare equal.
const SIGMA_EPSILON: f32 = 0.001;

/// Gaussian blur parameters.
#[derive(Debug, Clone, Copy)]
pub struct BlurConfiguration {
    /// Taps on each side of the centre. Odd values are rounded up to even.
    pub radius: u32,
    pub sigma: f32,
}

impl BlurConfiguration {
    pub const fn new(radius: u32, sigma: f32) -> Self {
        Self { radius, sigma }
    }

    /// Radius actually used to build the kernel.
    pub fn normalized_radius(&self) -> u32 {
        self.radius.saturating_add(self.radius % 2)
    }
}

impl Default for BlurConfiguration {
    fn default() -> Self {
        Self::new(2, 2.0)
    }
}

impl PartialEq for BlurConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.radius == other.radius && (self.sigma - other.sigma).abs() < SIGMA_EPSILON
    }
}

impl From<&BlurConfig> for BlurConfiguration {
    fn from(config: &BlurConfig) -> Self {
        Self::new(config.radius, config.sigma as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_radius_two_sigma_two() {
        let config = BlurConfiguration::default();
        assert_eq!(config.radius, 2);
        assert_eq!(config.sigma, 2.0);
    }

    #[test]
    fn sigma_compared_with_tolerance() {
        assert_eq!(
            BlurConfiguration::new(4, 2.0),
            BlurConfiguration::new(4, 2.0005)
        );
        assert_ne!(
            BlurConfiguration::new(4, 2.0),
            BlurConfiguration::new(4, 2.01)
        );
        assert_ne!(
            BlurConfiguration::new(4, 2.0),
            BlurConfiguration::new(6, 2.0)
        );
    }

    #[test]
    fn odd_radius_rounds_up() {
        assert_eq!(BlurConfiguration::new(3, 1.0).normalized_radius(), 4);
        assert_eq!(BlurConfiguration::new(4, 1.0).normalized_radius(), 4);
    }

    #[test]
    fn odd_radius_at_u32_max_saturates() {
        assert_eq!(
            BlurConfiguration::new(u32::MAX, 1.0).normalized_radius(),
            u32::MAX
        );
    }

    #[test]
    fn built_from_config_section() {
        let section = BlurConfig::default();
        let config = BlurConfiguration::from(&section);
        assert_eq!(config, BlurConfiguration::new(30, 15.0));
    }
}
