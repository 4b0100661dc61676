//! Relief network facade.
//!
//! [`ReliefNetwork`] owns the location graph, the center index and the
//! request queue, and is the single entry point for an I/O layer: register
//! centers and victims, wire up distances, audit and replenish stock, and
//! dispatch.

mod config;
mod network;

pub use config::ReliefConfig;
pub use network::ReliefNetwork;
