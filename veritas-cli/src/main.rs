mod views;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use veritas_capture::{list_input_devices, CpalMicCapture};
use veritas_core::present::presenter::present;
use veritas_core::{
    CaptureSettings, ForensicReport, GeminiClassifier, Language, ScanConfiguration, ScanDelegate,
    ScanError, ScanMode, ScanSession, ScanState, SignalLevels,
};

#[derive(Parser)]
#[command(name = "veritas", about = "Voice authenticity forensics: classify speech as AI-generated or human", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a live clip from the microphone and classify it
    Record {
        #[command(flatten)]
        scan: ScanArgs,
        /// Input device name (default: system default input)
        #[arg(long)]
        device: Option<String>,
        /// Target sample rate for the encoded clip
        #[arg(long, default_value_t = 16_000)]
        rate: u32,
    },
    /// Classify an existing audio file
    Scan {
        /// Audio file to classify (wav/mp3/flac/ogg, sent as-is)
        file: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// List available capture devices
    Devices,
}

#[derive(clap::Args)]
struct ScanArgs {
    /// Linguistic context for the phonetic audit
    #[arg(long, value_enum, default_value = "english")]
    language: LanguageArg,
    /// Audit depth hint forwarded to the engine
    #[arg(long, value_enum, default_value = "deep")]
    mode: ModeArg,
    /// Engine model id override
    #[arg(long)]
    model: Option<String>,
    /// Dump the full report as machine telemetry JSON
    #[arg(long)]
    raw: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum LanguageArg {
    English,
    Tamil,
    Hindi,
    Malayalam,
    Telugu,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::English => Language::English,
            LanguageArg::Tamil => Language::Tamil,
            LanguageArg::Hindi => Language::Hindi,
            LanguageArg::Malayalam => Language::Malayalam,
            LanguageArg::Telugu => Language::Telugu,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum ModeArg {
    Quick,
    Deep,
}

impl From<ModeArg> for ScanMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Quick => ScanMode::Quick,
            ModeArg::Deep => ScanMode::Deep,
        }
    }
}

/// Marshals session events onto the terminal.
struct TerminalDelegate;

impl ScanDelegate for TerminalDelegate {
    fn on_state_changed(&self, state: &ScanState) {
        log::debug!("session entered {}", state.name());
    }

    fn on_levels_updated(&self, levels: &SignalLevels) {
        views::level_meter(levels);
        let _ = io::stderr().flush();
    }

    fn on_error(&self, error: &ScanError) {
        log::warn!("session error: {}", error);
    }

    fn on_report_ready(&self, report: &ForensicReport) {
        log::info!(
            "report ready: {:?} at {}",
            report.prediction,
            report.metadata.latency
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Devices => cmd_devices(),
        Command::Record { scan, device, rate } => cmd_record(scan, device, rate),
        Command::Scan { file, scan } => cmd_scan(file, scan),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            views::render(&present(Err(&e)), None);
            ExitCode::FAILURE
        }
    }
}

fn build_session(
    scan: &ScanArgs,
    device: Option<String>,
    rate: u32,
) -> Result<ScanSession, ScanError> {
    let mut classifier = GeminiClassifier::from_env()?;
    if let Some(ref model) = scan.model {
        classifier = classifier.with_model(model.clone());
    }

    let mic = match device.clone() {
        Some(name) => CpalMicCapture::by_name(name),
        None => CpalMicCapture::default_device(),
    };

    let config = ScanConfiguration {
        language: scan.language.into(),
        mode: scan.mode.into(),
    };
    let settings = CaptureSettings {
        sample_rate: rate,
        device,
    };

    let mut session = ScanSession::new(Box::new(mic), Arc::new(classifier), config, settings)?;
    session.set_delegate(Arc::new(TerminalDelegate));
    Ok(session)
}

fn cmd_devices() -> Result<(), ScanError> {
    let devices = list_input_devices()?;
    if devices.is_empty() {
        println!("no capture devices found");
        return Ok(());
    }
    for device in devices {
        let marker = if device.is_default { "*" } else { " " };
        println!("{} {}", marker, device.name);
    }
    Ok(())
}

fn cmd_record(scan: ScanArgs, device: Option<String>, rate: u32) -> Result<(), ScanError> {
    views::banner();
    let mut session = build_session(&scan, device, rate)?;

    if let Err(e) = session.start_live_scan() {
        if e == ScanError::PermissionDenied {
            // Denied microphone aborts the session quietly; the cause
            // goes to the log, not the result surface.
            log::warn!("recording access denied, returning to idle");
            return Ok(());
        }
        return Err(e);
    }

    views::capture_header(&session.device().name);

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line).ok();
    views::end_meter_line();

    if line.trim().eq_ignore_ascii_case("q") {
        session.cancel();
        println!("  capture aborted");
        return Ok(());
    }

    println!("  classifying...");
    let report = session.stop_and_classify()?;
    views::render(&present(Ok(&report)), scan.raw.then_some(&report));
    Ok(())
}

fn cmd_scan(file: PathBuf, scan: ScanArgs) -> Result<(), ScanError> {
    views::banner();
    let mut session = build_session(&scan, None, 16_000)?;

    println!("  classifying {}...", file.display());
    let report = session.submit_file(&file)?;
    views::render(&present(Ok(&report)), scan.raw.then_some(&report));
    Ok(())
}
