//! Render context: read-only state shared by every region of a render.

use std::sync::Arc;

use crate::elements::LayerDefaults;
use crate::types::{NumericError, Scaler};

use super::composite::CompositeLibrary;
use super::defaults;
use super::pattern::TileCache;

/// Settings fixed for the duration of a render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Device units per inch
    pub units_per_inch: f64,
    /// Layers assigned by the loader to elements that declare none
    pub layers: LayerDefaults,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            units_per_inch: defaults::DEVICE_UNITS_PER_INCH,
            layers: LayerDefaults::BACKWARD_COMPATIBLE,
        }
    }
}

/// Everything the compositor consults besides the region itself.
///
/// The composite library is immutable once a render starts. The tile cache
/// is the only interior-mutable part and is safe to share across threads.
#[derive(Debug)]
pub struct RenderContext {
    pub config: RenderConfig,
    pub scaler: Scaler,
    pub library: Arc<CompositeLibrary>,
    pub tiles: TileCache,
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext {
            config: RenderConfig::default(),
            scaler: Scaler::default(),
            library: Arc::new(CompositeLibrary::new()),
            tiles: TileCache::new(),
        }
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from an explicit config.
    pub fn from_config(config: RenderConfig) -> Result<Self, NumericError> {
        Ok(RenderContext {
            scaler: Scaler::try_new(config.units_per_inch)?,
            config,
            ..Self::default()
        })
    }

    /// Default context with a different device resolution.
    pub fn with_units_per_inch(units_per_inch: f64) -> Result<Self, NumericError> {
        Self::from_config(RenderConfig { units_per_inch, ..RenderConfig::default() })
    }

    pub fn with_library(mut self, library: impl Into<Arc<CompositeLibrary>>) -> Self {
        self.library = library.into();
        self
    }
}
