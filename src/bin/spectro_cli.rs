use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use spectro_ring::analysis::axis::{bin_frequency, AxisLabel};
use spectro_ring::engine::{CaptureBackend, SyntheticBackend, SyntheticSignal};
use spectro_ring::source::{load_raw_file, load_wav_file, LiveCapture, RecordedCursor, SampleSource};
use spectro_ring::telemetry::MetricsSnapshot;
use spectro_ring::{AppConfig, Command, SpectrumEngine, SpectrumFrame};

#[derive(Parser, Debug)]
#[command(
    name = "spectro_cli",
    about = "Headless driver for the spectrum capture and windowing pipeline"
)]
struct Cli {
    /// JSON configuration file (defaults are used if missing or invalid)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at DEBUG level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture from the default input device (or a synthetic tone) and print frames
    Live {
        /// Replace the input device with a sine tone at this frequency in Hz
        #[arg(long)]
        synthetic: Option<f32>,
        /// How long to capture
        #[arg(long, default_value_t = 2.0)]
        seconds: f64,
    },
    /// Step through a recorded sample file window by window
    Scrub {
        #[arg(long)]
        file: PathBuf,
        /// Read the file as WAV instead of raw little-endian f32
        #[arg(long)]
        wav: bool,
        /// Comma-separated steps; advances to the end when omitted
        #[arg(long, value_enum, value_delimiter = ',')]
        steps: Vec<Step>,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Step {
    Advance,
    Rewind,
}

impl From<Step> for Command {
    fn from(step: Step) -> Self {
        match step {
            Step::Advance => Command::Advance,
            Step::Rewind => Command::Rewind,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Live { synthetic, seconds } => run_live(config, synthetic, seconds),
        Commands::Scrub { file, wav, steps } => run_scrub(config, file, wav, steps),
        Commands::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

fn run_live(config: AppConfig, synthetic: Option<f32>, seconds: f64) -> Result<ExitCode> {
    if !(seconds.is_finite() && seconds > 0.0) {
        bail!("--seconds must be a positive number");
    }

    let backend = select_backend(synthetic)?;
    let backend_name = backend.name();
    let capture = LiveCapture::new(backend, &config);
    let mut engine =
        SpectrumEngine::new(config, SampleSource::Live(capture)).context("building engine")?;

    engine
        .handle(Command::StartCapture)
        .context("starting capture")?;

    let cadence = {
        let audio = &engine.config().audio;
        Duration::from_secs_f64(audio.frames_per_buffer as f64 / audio.sample_rate as f64 / 2.0)
    };
    let sample_rate = engine_rate(&engine);
    let deadline = Instant::now() + Duration::from_secs_f64(seconds);
    let mut last_peak = None;

    while Instant::now() < deadline {
        let summary = engine
            .tick()
            .map(|frame| frame.map(|frame| FrameSummary::new(frame, sample_rate)))
            .context("capture tick")?;
        if let Some(summary) = summary {
            println!("{}", serde_json::to_string(&summary)?);
            last_peak = summary.peak_hz;
        }
        thread::sleep(cadence);
    }

    engine.handle(Command::StopCapture)?;
    emit_report(&LiveReport {
        source: "live",
        backend: backend_name,
        last_peak_hz: last_peak,
        metrics: engine.metrics(),
    })?;
    Ok(ExitCode::from(0))
}

#[cfg(not(target_os = "android"))]
fn select_backend(synthetic: Option<f32>) -> Result<Box<dyn CaptureBackend>> {
    use spectro_ring::engine::CpalBackend;

    Ok(match synthetic {
        Some(frequency) => Box::new(SyntheticBackend::new(SyntheticSignal::Tone {
            frequency,
            amplitude: 0.8,
        })),
        None => Box::new(CpalBackend::new()),
    })
}

#[cfg(target_os = "android")]
fn select_backend(synthetic: Option<f32>) -> Result<Box<dyn CaptureBackend>> {
    match synthetic {
        Some(frequency) => Ok(Box::new(SyntheticBackend::new(SyntheticSignal::Tone {
            frequency,
            amplitude: 0.8,
        }))),
        None => bail!("device capture is not available on this platform; pass --synthetic"),
    }
}

fn run_scrub(config: AppConfig, file: PathBuf, wav: bool, steps: Vec<Step>) -> Result<ExitCode> {
    let loaded = if wav {
        load_wav_file(&file)
    } else {
        load_raw_file(&file, config.recording_samples())
    }
    .with_context(|| format!("loading {}", file.display()))?;

    let short_read = loaded.short_read().is_some();
    let cursor = RecordedCursor::from_loaded(loaded, config.window.window_size);
    let loaded_samples = cursor.len();
    let mut engine =
        SpectrumEngine::new(config, SampleSource::Recorded(cursor)).context("building engine")?;

    let plan: Vec<Command> = if steps.is_empty() {
        let windows = loaded_samples / engine.config().window.window_size;
        vec![Command::Advance; windows + 1]
    } else {
        steps.into_iter().map(Command::from).collect()
    };

    let sample_rate = engine_rate(&engine);
    let mut ignored = 0;
    for command in plan {
        let outcome = engine
            .handle(command)
            .map(|frame| frame.map(|frame| FrameSummary::new(frame, sample_rate)));
        match outcome {
            Ok(Some(mut summary)) => {
                summary.position = Some(cursor_position(&engine));
                println!("{}", serde_json::to_string(&summary)?);
            }
            Ok(None) => {}
            Err(err) if err.is_benign() => ignored += 1,
            Err(err) => return Err(err).context("scrubbing"),
        }
    }

    emit_report(&ScrubReport {
        source: "recorded",
        loaded_samples,
        short_read,
        ignored_commands: ignored,
        position: cursor_position(&engine),
        frequency_axis: engine.frequency_labels(),
        db_axis: engine.db_labels(),
        metrics: engine.metrics(),
    })?;
    Ok(ExitCode::from(0))
}

fn engine_rate(engine: &SpectrumEngine) -> u32 {
    engine.config().audio.sample_rate
}

fn cursor_position(engine: &SpectrumEngine) -> usize {
    match engine.source() {
        SampleSource::Recorded(cursor) => cursor.position(),
        SampleSource::Live(_) => 0,
    }
}

fn emit_report<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string(report)?);
    Ok(())
}

#[derive(Serialize)]
struct FrameSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
    bins: usize,
    peak_bin: Option<usize>,
    peak_hz: Option<f32>,
    peak_db: Option<f32>,
}

impl FrameSummary {
    fn new(frame: &SpectrumFrame, sample_rate: u32) -> Self {
        let peak = frame.peak();
        Self {
            position: None,
            bins: frame.bin_count(),
            peak_bin: peak.map(|(bin, _)| bin),
            peak_hz: peak.map(|(bin, _)| bin_frequency(bin, sample_rate, frame.window_size)),
            peak_db: peak.map(|(bin, _)| frame.clamped_db[bin]),
        }
    }
}

#[derive(Serialize)]
struct LiveReport {
    source: &'static str,
    backend: &'static str,
    last_peak_hz: Option<f32>,
    metrics: MetricsSnapshot,
}

#[derive(Serialize)]
struct ScrubReport {
    source: &'static str,
    loaded_samples: usize,
    short_read: bool,
    ignored_commands: usize,
    position: usize,
    frequency_axis: Vec<AxisLabel>,
    db_axis: Vec<AxisLabel>,
    metrics: MetricsSnapshot,
}
