// Adapters layer: wire formats of external systems.

pub mod explorer;
