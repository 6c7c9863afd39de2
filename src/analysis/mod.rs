// Analysis module - transform and display derivation
//
// The consumer thread runs every window through a `Transform`, derives a
// `SpectrumFrame` from the bins, and hands the frame to whatever renders it.
// `axis` carries the label layout a renderer draws around the bars.

pub mod axis;
pub mod fft;
pub mod spectrum;

pub use axis::{bin_frequency, db_labels, format_frequency, frequency_labels, AxisLabel};
pub use fft::{RealFft, Transform};
pub use spectrum::{DbRange, SpectrumFrame};
