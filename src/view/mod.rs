//! Screen-level state: which view is showing, and whether a gated studio
//! may show its form.

pub mod gate;
pub mod router;

pub use gate::{CapabilityGate, GateStatus};
pub use router::{AppView, LabsService, ServiceCard, ViewRouter};
