mod agents;
mod bookkeeping;
mod germination;
mod growth;

pub use agents::AgentSystem;
pub use bookkeeping::BookkeepingSystem;
pub use germination::GerminationSystem;
pub use growth::GrowthSystem;
