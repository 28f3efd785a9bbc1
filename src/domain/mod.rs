// Domain layer: the citation record types and the ports the loader and renderers plug into.

pub mod model;
pub mod ports;
