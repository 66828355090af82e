// Domain layer: the prospect record, reply shapes and the ports the handler talks through.

pub mod model;
pub mod ports;
