pub mod simulation;

pub use simulation::{
    simulate, EngineConfig, RunMetadata, SimulationEngine, SimulationError, SimulationState,
};
