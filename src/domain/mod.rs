// Domain layer: chat, inventory and appointment models plus the ports the
// core talks through. Nothing here performs IO.

pub mod model;
pub mod ports;
