//! Domain types, error taxonomy and slot generation for the clinic booking
//! service. Nothing in this crate touches I/O.

pub mod errors;
pub mod models;
pub mod slot_generator;
