//! Simulation component identifiers.

/// Identifier of simulation component, assigned sequentially upon registration.
pub type Id = u32;
