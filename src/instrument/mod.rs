//! Instrument drivers.
//!
//! One driver lives here: the SSA3000X-family spectrum analyzer.

pub mod ssa3000x;

pub use ssa3000x::{
    AmplitudeUnit, FileType, FrequencyUnit, Ssa3000x, SweepMode, Switch, TimeUnit, TraceMode,
};
