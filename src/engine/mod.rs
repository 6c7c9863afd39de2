//! Engine module housing the pipeline core.
//!
//! `backend` abstracts the input device behind `CaptureBackend`; `core`
//! holds the `SpectrumEngine` context the consumer thread drives.

pub mod backend;
pub mod core;

#[cfg(not(target_os = "android"))]
pub use backend::CpalBackend;
pub use backend::{
    ActiveStream, CaptureBackend, StreamFault, StreamRequest, SyntheticBackend, SyntheticSignal,
};
pub use core::{Command, SpectrumEngine};
