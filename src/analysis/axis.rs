// Axis module - label layout for bar-style spectrum renderers
//
// Renderers receive label values, display text and a normalized position
// (0.0 at the axis origin, 1.0 at its far end) and do their own drawing.

use serde::Serialize;

use super::spectrum::DbRange;

/// One tick on a display axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub value: f32,
    pub text: String,
    /// Normalized position along the axis in `[0, 1]`
    pub position: f32,
}

/// Centre frequency of `bin` in Hz
pub fn bin_frequency(bin: usize, sample_rate: u32, window_size: usize) -> f32 {
    bin as f32 * sample_rate as f32 / window_size as f32
}

/// `"2.0 kHz"` above 1 kHz, `"500.0 Hz"` otherwise
pub fn format_frequency(hz: f32) -> String {
    if hz > 1000.0 {
        format!("{:.1} kHz", hz / 1000.0)
    } else {
        format!("{:.1} Hz", hz)
    }
}

/// `count` evenly spaced labels from 0 Hz to Nyquist.
pub fn frequency_labels(sample_rate: u32, count: usize) -> Vec<AxisLabel> {
    let nyquist = sample_rate as f32 / 2.0;
    spread(count)
        .map(|position| {
            let value = nyquist * position;
            AxisLabel {
                value,
                text: format_frequency(value),
                position,
            }
        })
        .collect()
}

/// `count` evenly spaced labels from `range.min` to `range.max`.
pub fn db_labels(range: DbRange, count: usize) -> Vec<AxisLabel> {
    spread(count)
        .map(|position| {
            let value = range.min + (range.max - range.min) * position;
            AxisLabel {
                value,
                text: format!("{}dB", value.round() as i32),
                position,
            }
        })
        .collect()
}

fn spread(count: usize) -> impl Iterator<Item = f32> {
    let last = count.saturating_sub(1).max(1) as f32;
    (0..count).map(move |i| i as f32 / last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_labels_span_nyquist() {
        let labels = frequency_labels(16_000, 5);
        let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["0.0 Hz", "2.0 kHz", "4.0 kHz", "6.0 kHz", "8.0 kHz"]
        );
        assert_eq!(labels[0].position, 0.0);
        assert_eq!(labels[4].position, 1.0);
    }

    #[test]
    fn test_db_labels() {
        let labels = db_labels(DbRange::default(), 5);
        let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["-80dB", "-60dB", "-40dB", "-20dB", "0dB"]);
    }

    #[test]
    fn test_format_frequency() {
        assert_eq!(format_frequency(500.0), "500.0 Hz");
        assert_eq!(format_frequency(1000.0), "1000.0 Hz");
        assert_eq!(format_frequency(2500.0), "2.5 kHz");
    }

    #[test]
    fn test_bin_frequency() {
        assert_eq!(bin_frequency(0, 16_000, 1024), 0.0);
        assert_eq!(bin_frequency(64, 16_000, 1024), 1000.0);
        assert_eq!(bin_frequency(512, 16_000, 1024), 8000.0);
    }

    #[test]
    fn test_single_label() {
        let labels = frequency_labels(16_000, 1);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].value, 0.0);
    }
}
