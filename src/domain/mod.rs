// Domain layer: models and ports. Concrete HTTP/file implementations live in adapters/config.

pub mod model;
pub mod ports;
