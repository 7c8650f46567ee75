//! Structure-type registry
//!
//! Maps a `VkStructureType` found in a `pNext` chain to the shape used to
//! copy it. The registry is built from the static table, filtered by the
//! enabled platforms, plus any opaque structures named in the configuration.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use ash::vk;

use crate::config::{Config, CopyConfig, DEFAULT_MAX_CHAIN_LENGTH, MAX_CUSTOM_STRUCTURE_SIZE};
use crate::error::SafeResult;
use crate::shape::{table, Shape, ShapeRef, NEXT_OFFSET};

/// Lookup table from structure type to shape
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: HashMap<vk::StructureType, ShapeRef>,
    config: CopyConfig,
}

impl ShapeRegistry {
    /// Registry with the default configuration
    pub fn new() -> Self {
        Self::from_config(CopyConfig::default())
    }

    /// Registry for the given configuration
    ///
    /// A zero chain limit is replaced by the default, and custom structures
    /// that cannot be carried are dropped with a warning.
    pub fn from_config(mut config: CopyConfig) -> Self {
        if config.max_chain_length == 0 {
            log::warn!(
                "max_chain_length = 0 would reject every pNext chain; using {}",
                DEFAULT_MAX_CHAIN_LENGTH
            );
            config.max_chain_length = DEFAULT_MAX_CHAIN_LENGTH;
        }

        let platforms = config.enabled_platforms();
        let mut shapes = HashMap::new();

        for &shape in table::ALL {
            let Some(structure_type) = shape.structure_type else {
                continue;
            };
            if platforms.contains(&shape.platform) {
                shapes.insert(structure_type, ShapeRef::Static(shape));
            }
        }

        let header = NEXT_OFFSET + std::mem::size_of::<*const u8>();
        for custom in &config.custom_structures {
            let structure_type = vk::StructureType::from_raw(custom.structure_type);
            if custom.size < header {
                log::warn!(
                    "Ignoring custom structure {:?}: {} bytes cannot hold the sType/pNext header",
                    structure_type,
                    custom.size
                );
                continue;
            }
            if custom.size > MAX_CUSTOM_STRUCTURE_SIZE {
                log::warn!(
                    "Ignoring custom structure {:?}: {} bytes exceeds the {} byte limit",
                    structure_type,
                    custom.size,
                    MAX_CUSTOM_STRUCTURE_SIZE
                );
                continue;
            }
            if shapes.contains_key(&structure_type) {
                log::warn!("Ignoring custom structure {:?}: type is already registered", structure_type);
                continue;
            }
            shapes.insert(
                structure_type,
                ShapeRef::Custom(Arc::new(Shape::opaque(structure_type, custom.size))),
            );
        }

        log::debug!(
            "Shape registry ready: {} structure types for platforms {:?}",
            shapes.len(),
            platforms
        );

        Self { shapes, config }
    }

    /// Registry configured from a `.toml` or `.ron` file
    pub fn load(path: &str) -> SafeResult<Self> {
        let config = CopyConfig::load_from_file(path)?;
        log::info!("Loaded copy configuration from {}", path);
        Ok(Self::from_config(config))
    }

    /// Process-wide registry with the default configuration
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ShapeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Shape registered for `structure_type`
    pub fn lookup(&self, structure_type: vk::StructureType) -> Option<&ShapeRef> {
        self.shapes.get(&structure_type)
    }

    /// Whether `structure_type` has a registered shape
    pub fn contains(&self, structure_type: vk::StructureType) -> bool {
        self.shapes.contains_key(&structure_type)
    }

    /// Number of registered structure types
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Configuration the registry was built from
    pub const fn config(&self) -> &CopyConfig {
        &self.config
    }

    /// Register a static shape, replacing any previous entry
    ///
    /// Returns `false` for headerless shapes, which cannot appear in a chain.
    pub fn register(&mut self, shape: &'static Shape) -> bool {
        let Some(structure_type) = shape.structure_type else {
            return false;
        };
        if self.shapes.insert(structure_type, ShapeRef::Static(shape)).is_some() {
            log::debug!("Replaced shape for {:?} with {}", structure_type, shape.name);
        }
        true
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
