// Domain layer: the loan record and the ports the orchestrator depends on.

pub mod model;
pub mod ports;
