//! Numeric helpers shared by the solver and the command line tools

pub mod misc;

pub use misc::{round_to_tenth, stepped_range};
