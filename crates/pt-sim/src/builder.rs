//! Fluent builder for constructing a [`Sim`].

use pt_core::EngineConfig;
use pt_spatial::WorldGeometryProvider;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<G>`].
///
/// # Required inputs
///
/// - `G: WorldGeometryProvider` — asked once per tile for its static world
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                     |
/// |---------------|-----------------------------|
/// | `.config(c)`  | `EngineConfig::default()`   |
/// | `.seed(s)`    | `42` (via the default config) |
///
/// # Example
///
/// ```rust
/// use pt_core::{SimSettings, TileCoord};
/// use pt_sim::{NoopObserver, SimBuilder};
/// use pt_spatial::OpenField;
///
/// let mut sim = SimBuilder::new(OpenField { half_extent: 20.0 }).seed(7).build().unwrap();
/// let settings = SimSettings::default();
/// sim.activate_tile(TileCoord::new(0, 0), &settings, &mut NoopObserver);
/// assert!(sim.update(1.0 / 60.0, &settings, &mut NoopObserver));
/// ```
pub struct SimBuilder<G: WorldGeometryProvider> {
    geometry: G,
    config:   EngineConfig,
}

impl<G: WorldGeometryProvider> SimBuilder<G> {
    pub fn new(geometry: G) -> Self {
        Self { geometry, config: EngineConfig::default() }
    }

    /// Replace the whole engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the master seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Validate the configuration and build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`][crate::SimError::Config] if any tunable
    /// is out of range.
    pub fn build(self) -> SimResult<Sim<G>> {
        self.config.validate()?;
        Ok(Sim::new(self.config, self.geometry))
    }
}
