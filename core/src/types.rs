//! Shared primitive types used across the viewer core.

/// An account identifier as emitted by the analysis backend.
pub type AccountId = String;

/// A fraud ring identifier, unique within one report.
pub type RingId = String;

/// Monotonic submission counter. Each accepted submit bumps it by one;
/// only the response carrying the current generation may change state.
pub type Generation = u64;
