//! Plugin configuration
//!
//! Loaded from and saved to JSON files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::core::{ChainId, ChainIdError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid node URL {url:?}: {reason}")]
    InvalidNodeUrl { url: String, reason: String },
    #[error("At least one subnetwork must be configured")]
    NoSubnetworks,
    #[error("Invalid subnetwork {subnetwork:?}: {source}")]
    InvalidSubnetwork {
        subnetwork: String,
        source: ChainIdError,
    },
}

/// Plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Node that queries and transactions are relayed to
    pub node_url: String,
    pub subnetworks: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            node_url: "http://localhost:8545".to_string(),
            subnetworks: ["1", "3", "4", "42"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PluginConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: PluginConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let temp_path = path.with_extension("tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Parsed node URL
    pub fn node_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.node_url).map_err(|e| ConfigError::InvalidNodeUrl {
            url: self.node_url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" | "ws" | "wss" => Ok(url),
            scheme => Err(ConfigError::InvalidNodeUrl {
                url: self.node_url.clone(),
                reason: format!("unsupported scheme {:?}", scheme),
            }),
        }
    }

    /// Check the node URL and that every subnetwork maps to a chain id
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.node_url()?;

        if self.subnetworks.is_empty() {
            return Err(ConfigError::NoSubnetworks);
        }
        for subnetwork in &self.subnetworks {
            ChainId::from_subnetwork(subnetwork).map_err(|source| {
                ConfigError::InvalidSubnetwork {
                    subnetwork: subnetwork.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    pub fn supports(&self, subnetwork: &str) -> bool {
        self.subnetworks.iter().any(|s| s == subnetwork)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PluginConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.supports("4"));
        assert!(!config.supports("5"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = PluginConfig {
            node_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNodeUrl { .. })
        ));

        let config = PluginConfig {
            node_url: "ftp://node.example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNodeUrl { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_subnetworks() {
        let config = PluginConfig {
            subnetworks: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoSubnetworks)));

        let config = PluginConfig {
            subnetworks: vec!["1".to_string(), String::new()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSubnetwork { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plugin.json");

        let config = PluginConfig {
            node_url: "https://eth.example.com/rpc".to_string(),
            subnetworks: vec!["1".to_string()],
        };
        config.save(&path).unwrap();

        let loaded = PluginConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_fills_missing_fields_and_validates() {
        let temp_dir = tempfile::tempdir().unwrap();

        let partial = temp_dir.path().join("partial.json");
        fs::write(&partial, r#"{"subnetworks": ["3"]}"#).unwrap();
        let loaded = PluginConfig::from_file(&partial).unwrap();
        assert_eq!(loaded.node_url, PluginConfig::default().node_url);
        assert_eq!(loaded.subnetworks, vec!["3".to_string()]);

        let invalid = temp_dir.path().join("invalid.json");
        fs::write(&invalid, r#"{"subnetworks": []}"#).unwrap();
        assert!(matches!(
            PluginConfig::from_file(&invalid),
            Err(ConfigError::NoSubnetworks)
        ));

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            PluginConfig::from_file(&missing),
            Err(ConfigError::IoError(_))
        ));
    }
}
