//! Read models definitions.

pub mod listing;
