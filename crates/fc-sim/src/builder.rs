//! Fluent builder for constructing a [`Floor`].

use tracing::info;

use fc_core::CoordinationConfig;
use fc_motion::AgentSpec;
use fc_spatial::{CrossingLayout, CrossingZone};

use crate::{Floor, SimResult};

/// Fluent builder for [`Floor`].
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                            |
/// |-----------------|------------------------------------|
/// | `.zones(v)`     | No crossing zones                  |
/// | `.agent(spec)`  | No agents (spawn later)            |
///
/// # Example
///
/// ```rust,ignore
/// let mut floor = FloorBuilder::new(CoordinationConfig::default())
///     .zones(vec![belt])
///     .agents(routes.into_iter().map(|r| r.into_agent(2.0)))
///     .build()?;
/// floor.run_ticks(600, 1.0 / 60.0, &mut NoopObserver);
/// ```
pub struct FloorBuilder {
    config: CoordinationConfig,
    zones:  Vec<CrossingZone>,
    agents: Vec<AgentSpec>,
}

impl FloorBuilder {
    pub fn new(config: CoordinationConfig) -> Self {
        Self { config, zones: Vec::new(), agents: Vec::new() }
    }

    /// Crossing zones, in priority order (first declared wins on overlap).
    pub fn zones(mut self, zones: Vec<CrossingZone>) -> Self {
        self.zones = zones;
        self
    }

    pub fn agent(mut self, spec: AgentSpec) -> Self {
        self.agents.push(spec);
        self
    }

    pub fn agents(mut self, specs: impl IntoIterator<Item = AgentSpec>) -> Self {
        self.agents.extend(specs);
        self
    }

    /// Validate the config, index the zones, spawn every agent in the order
    /// given, and return a ready-to-run [`Floor`].
    pub fn build(self) -> SimResult<Floor> {
        self.config.validate()?;
        let layout = CrossingLayout::new(self.zones)?;

        let mut floor = Floor::new(self.config, layout);
        for spec in self.agents {
            floor.spawn(spec)?;
        }

        info!(
            agents = floor.agent_count(),
            zones  = floor.zones().len(),
            "floor built"
        );
        Ok(floor)
    }
}
