//! Hardware module for telescope and camera configurations

pub mod instrument;

pub use instrument::{Instrument, InstrumentProfile};
