use std::fmt;
use std::str::FromStr;

use animation::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Adapter power preference requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    Low,
    #[default]
    High,
}

impl fmt::Display for GpuPowerPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuPowerPreference::Low => f.write_str("low"),
            GpuPowerPreference::High => f.write_str("high"),
        }
    }
}

impl FromStr for GpuPowerPreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "low-power" => Ok(GpuPowerPreference::Low),
            "high" | "high-performance" => Ok(GpuPowerPreference::High),
            other => Err(format!("unknown GPU power preference '{other}' (expected 'low' or 'high')")),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Render target size in pixels; fixed for the renderer's lifetime.
    pub size: (u32, u32),
    /// Adapter selection hint.
    pub gpu_power: GpuPowerPreference,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            gpu_power: GpuPowerPreference::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_preference_parses() {
        assert_eq!("low".parse(), Ok(GpuPowerPreference::Low));
        assert_eq!("High-Performance".parse(), Ok(GpuPowerPreference::High));
        assert!("medium".parse::<GpuPowerPreference>().is_err());
    }

    #[test]
    fn default_config_is_1440p() {
        let config = RendererConfig::default();
        assert_eq!(config.size, (2560, 1440));
        assert_eq!(config.gpu_power, GpuPowerPreference::High);
    }
}
