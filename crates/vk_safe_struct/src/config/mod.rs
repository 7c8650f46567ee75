//! Configuration system
//!
//! Copy policies are plain data so that a layer can ship them next to its
//! other settings files.

pub use serde::{Deserialize, Serialize};

use crate::shape::Platform;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// What the chain engine does with a structure type it has no shape for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStructurePolicy {
    /// Leave the node out of the copy and continue with its successor
    #[default]
    Skip,
    /// Abort the whole copy with `SafeStructError::UnknownStructureType`
    Fail,
}

/// What the duplicators do with a null pointer whose count is non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedArrayPolicy {
    /// Report the caller bug as an error
    #[default]
    Reject,
    /// Copy nothing and log a warning
    TreatAsEmpty,
}

/// Chain length limit used when none, or zero, is configured
pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 256;

/// Largest size accepted for a [`CustomStructure`]
pub const MAX_CUSTOM_STRUCTURE_SIZE: usize = 4096;

/// A structure type unknown to the descriptor table that should still be
/// carried through `pNext` chains as an opaque byte block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomStructure {
    /// Raw `VkStructureType` value
    pub structure_type: i32,
    /// Size of the structure in bytes, header included
    ///
    /// The size is trusted: every chain node of this type is read for exactly
    /// this many bytes. Sizes larger than [`MAX_CUSTOM_STRUCTURE_SIZE`] are
    /// rejected by the registry.
    pub size: usize,
}

/// Deep-copy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Policy for unregistered structure types in `pNext` chains
    pub unknown_structures: UnknownStructurePolicy,
    /// Policy for null array pointers with a non-zero count
    pub malformed_arrays: MalformedArrayPolicy,
    /// Longest `pNext` chain that is followed before giving up; zero means
    /// the default
    pub max_chain_length: usize,
    /// Platforms whose shapes are registered; `None` means the host platforms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Platform>>,
    /// Extra structure types copied as opaque blocks
    pub custom_structures: Vec<CustomStructure>,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            unknown_structures: UnknownStructurePolicy::Skip,
            malformed_arrays: MalformedArrayPolicy::Reject,
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            platforms: None,
            custom_structures: Vec::new(),
        }
    }
}

impl Config for CopyConfig {}

impl CopyConfig {
    /// Platforms this configuration registers shapes for
    pub fn enabled_platforms(&self) -> Vec<Platform> {
        self.platforms.clone().unwrap_or_else(Platform::host)
    }

    /// Chain length limit in effect
    pub const fn chain_limit(&self) -> usize {
        if self.max_chain_length == 0 {
            DEFAULT_MAX_CHAIN_LENGTH
        } else {
            self.max_chain_length
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("vk_safe_struct_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_policies() {
        let config = CopyConfig::default();
        assert_eq!(config.unknown_structures, UnknownStructurePolicy::Skip);
        assert_eq!(config.malformed_arrays, MalformedArrayPolicy::Reject);
        assert_eq!(config.max_chain_length, 256);
        assert!(config.enabled_platforms().contains(&Platform::Any));
    }

    #[test]
    fn test_zero_chain_limit_means_default() {
        let config = CopyConfig {
            max_chain_length: 0,
            ..CopyConfig::default()
        };
        assert_eq!(config.chain_limit(), DEFAULT_MAX_CHAIN_LENGTH);

        let config = CopyConfig {
            max_chain_length: 4,
            ..CopyConfig::default()
        };
        assert_eq!(config.chain_limit(), 4);
    }

    #[test]
    fn test_parse_toml_with_missing_fields() {
        let config: CopyConfig = toml::from_str(
            r#"
            unknown_structures = "fail"

            [[custom_structures]]
            structure_type = 1000999000
            size = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.unknown_structures, UnknownStructurePolicy::Fail);
        assert_eq!(config.malformed_arrays, MalformedArrayPolicy::Reject);
        assert_eq!(
            config.custom_structures,
            vec![CustomStructure { structure_type: 1_000_999_000, size: 32 }]
        );
    }

    #[test]
    fn test_toml_file_roundtrip() {
        let path = temp_path("config.toml");
        let config = CopyConfig {
            malformed_arrays: MalformedArrayPolicy::TreatAsEmpty,
            max_chain_length: 8,
            platforms: Some(vec![Platform::Any, Platform::Win32]),
            ..CopyConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = CopyConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_roundtrip() {
        let path = temp_path("config.ron");
        let config = CopyConfig {
            unknown_structures: UnknownStructurePolicy::Fail,
            ..CopyConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = CopyConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = CopyConfig::default().save_to_file("copy.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
