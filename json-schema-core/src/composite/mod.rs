//! The composite array/object generators (spec §4.5), which dominate the
//! engine's complexity. Each is a pure function over an owned `Json`
//! schema object, composed of the five phases the spec names: shape
//! enumeration, sub-instance caching, validity-pattern enumeration,
//! instance assembly, and boundary mutation.

pub mod array;
pub mod object;
