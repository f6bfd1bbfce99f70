//! Conformance harness — container-level invariants.
//!
//! Exercises the public surface end to end:
//! - Container framing and header JSON shape (`container_format`)
//! - Corruption handling: no tampered byte goes unnoticed (`tamper`)
//! - Round-trip laws over recipient sets (`multi_recipient`)

mod container_format;
mod multi_recipient;
mod tamper;
