//! Engine configuration loaded from TOML.
use super::distance::MileageRate;
use super::error::StoreError;
use anyhow::Context;
use std::path::Path;

pub const DEFAULT_CATEGORY_MAX_LENGTH: usize = 255;
pub const DEFAULT_AMOUNT_MAX_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest category name the backend accepts
    pub category_max_length: usize,
    /// Max integer digits accepted by amount validation
    pub amount_max_length: usize,
    /// Used when the policy has no mileage rate of its own
    pub default_mileage: MileageRate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            category_max_length: DEFAULT_CATEGORY_MAX_LENGTH,
            amount_max_length: DEFAULT_AMOUNT_MAX_LENGTH,
            default_mileage: MileageRate::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| StoreError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.amount_max_length == 0 {
            return Err(StoreError::Config("amount_max_length must be positive".into()));
        }
        if self.category_max_length == 0 {
            return Err(StoreError::Config("category_max_length must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceUnit;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = EngineConfig::from_toml_str(
            r#"
            category_max_length = 64

            [default_mileage]
            unit = "km"
            rate = 50.0
            currency = "EUR"
            "#,
        )
        .unwrap();

        assert_eq!(config.category_max_length, 64);
        assert_eq!(config.amount_max_length, DEFAULT_AMOUNT_MAX_LENGTH);
        assert_eq!(config.default_mileage.unit, DistanceUnit::Kilometers);
        assert_eq!(config.default_mileage.rate, Some(50.0));
    }

    #[test]
    fn zero_amount_length_is_rejected() {
        assert!(EngineConfig::from_toml_str("amount_max_length = 0").is_err());
    }
}
