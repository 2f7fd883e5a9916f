//! Serialization helpers for DID document fields that can be expressed as a single value or a
//! collection of values.

pub mod flexvec_or_single;
pub mod option_flexvec;
pub mod option_flexvec_or_single;
