//! Configuration for the point reader.

use serde::{Deserialize, Serialize};

/// Configuration for point readers and the shared decode cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Maximum number of decoded series held in the shared cache.
    pub decode_cache_entries: usize,

    /// How total cloud cover is combined from the three layers.
    pub cloud_cover_law: CloudCoverLaw,

    /// Issue background decodes for dependencies before reading them.
    pub prefetch_enabled: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            decode_cache_entries: 4096,
            cloud_cover_law: CloudCoverLaw::RandomOverlap,
            prefetch_enabled: true,
        }
    }
}

impl ReaderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DECODE_CACHE_ENTRIES") {
            if let Ok(entries) = val.parse() {
                config.decode_cache_entries = entries;
            }
        }

        if let Ok(val) = std::env::var("CLOUDCOVER_LAW") {
            config.cloud_cover_law = CloudCoverLaw::from_str(&val);
        }

        if let Ok(val) = std::env::var("PREFETCH_ENABLED") {
            config.prefetch_enabled = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.decode_cache_entries == 0 {
            return Err("decode_cache_entries must be > 0".to_string());
        }

        Ok(())
    }
}

/// Combination of low, mid and high cloud cover into a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudCoverLaw {
    /// Sum of the layers, capped at 100 %.
    Additive,
    /// Layers overlap independently: `1 - (1-low)(1-mid)(1-high)`.
    #[default]
    RandomOverlap,
}

impl CloudCoverLaw {
    /// Parse from string (case-insensitive), defaulting to random overlap.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "additive" | "sum" => Self::Additive,
            _ => Self::RandomOverlap,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Additive => "additive",
            Self::RandomOverlap => "random_overlap",
        }
    }
}

impl std::fmt::Display for CloudCoverLaw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ReaderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cloud_cover_law, CloudCoverLaw::RandomOverlap);
        assert!(config.prefetch_enabled);
    }

    #[test]
    fn test_zero_cache_rejected() {
        let config = ReaderConfig {
            decode_cache_entries: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cloud_cover_law_parsing() {
        assert_eq!(CloudCoverLaw::from_str("ADDITIVE"), CloudCoverLaw::Additive);
        assert_eq!(
            CloudCoverLaw::from_str("random_overlap"),
            CloudCoverLaw::RandomOverlap
        );
        assert_eq!(CloudCoverLaw::from_str("bogus"), CloudCoverLaw::RandomOverlap);
    }
}
