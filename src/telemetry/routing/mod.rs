//! Event routing: in-process bus and sequencing ingestor.

pub mod bus;
pub mod ingestor;
