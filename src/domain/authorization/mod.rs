//! Authorization domain - Policy registry consulted on fetch

mod gate;
mod policy;

pub use gate::{AuthorizationDecision, AuthorizationGate};
pub use policy::{Actor, FnPolicy, Policy, PolicyDecision};
