//! Entry-point logic for the two binaries.
//!
//! Both share the same posture: arguments in, exactly one JSON line out,
//! exit code always 0. Anything that goes wrong becomes a JSON payload
//! rather than a process failure, because the host application parses
//! stdout unconditionally.

pub mod resolve;
pub mod search;
