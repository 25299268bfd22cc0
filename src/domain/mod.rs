// Domain layer: model descriptors and the registry port. No I/O here.

pub mod model;
pub mod ports;
