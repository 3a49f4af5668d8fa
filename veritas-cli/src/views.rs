//! Terminal rendering of the three scan surfaces.
//!
//! Everything here is presentation: the display models arrive fully
//! derived from `veritas_core::present` and are only laid out.

use veritas_core::present::presenter::{consistency_bars, raw_telemetry};
use veritas_core::{DisplayModel, ForensicReport, ReportErrorView, ReportView, SignalLevels};

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Configuration/start surface banner.
pub fn banner() {
    println!("{}", RULE);
    println!("  VERITAS VOICE — forensic voice authenticity scan");
    println!("{}", RULE);
}

/// Live-capture surface header.
pub fn capture_header(device: &str) {
    println!();
    println!("  SIGNAL ACTIVE // {}", device);
    println!("  press ENTER to conclude capture, or q + ENTER to abort");
    println!();
}

/// One-line level meter, redrawn in place from the capture thread.
pub fn level_meter(levels: &SignalLevels) {
    let width = 40usize;
    let filled = ((levels.rms * width as f32 * 3.0).round() as usize).min(width);
    let bar: String = "█".repeat(filled) + &"·".repeat(width - filled);
    eprint!("\r  REC [{}] peak {:>5.2}", bar, levels.peak);
}

/// Clear the in-place meter line before printing the result.
pub fn end_meter_line() {
    eprintln!();
}

/// Result surface: exactly one of report or error, as the display model
/// dictates. `raw` carries the full report when telemetry was requested.
pub fn render(model: &DisplayModel, raw: Option<&ForensicReport>) {
    match model {
        DisplayModel::Report(view) => render_report(view, raw),
        DisplayModel::Error(view) => render_error(view),
    }
}

fn render_report(view: &ReportView, raw: Option<&ForensicReport>) {
    println!();
    println!("{}", RULE);
    println!("  {:<24} {}", "CLASSIFICATION", view.classification);
    println!("  {:<24} {}", "CONFIDENCE", view.confidence);
    println!("  {:<24} {}", "DETECTION_SPEED", view.latency);
    println!("  {:<24} {}", "LANGUAGE_CORE", view.language);
    println!("  {:<24} {} / {}", "SESSION", view.session_id, view.scan_mode);
    println!("{}", RULE);
    println!();
    println!("  {}", view.headline);
    print!("  acoustic consistency ");
    for height in consistency_bars(12) {
        print!("{}", spark(height));
    }
    println!();
    println!();
    println!("  \"{}\"", view.explanation);
    println!();
    println!("  spectral integrity   {}", view.spectral);
    println!("  voice signature      {}", view.voice_quality);
    println!();
    println!("  recovered speech     \"{}\"", view.transcription);
    if let Some(ref native) = view.native_transcript {
        println!("  native script        {}", native);
    }
    println!();
    println!("  ACOUSTIC SCORECARD");
    for row in &view.scorecard {
        println!("  {:<22} {:>3}%  {}", row.label, row.score, gauge(row.score));
    }
    if !view.markers.is_empty() {
        println!();
        println!("  PHONETIC MARKERS");
        for marker in &view.markers {
            println!("  [{:^12}] {} — {}", marker.status, marker.marker, marker.detail);
        }
    }
    println!("{}", RULE);

    if let Some(report) = raw {
        println!();
        println!("  >> MACHINE_TELEMETRY (read-only)");
        println!("{}", raw_telemetry(report));
    }
}

fn render_error(view: &ReportErrorView) {
    println!();
    println!("{}", RULE);
    println!("  {}", view.title);
    println!("  {}", view.message);
    println!("  start a new scan to retry");
    println!("{}", RULE);
}

fn gauge(score: u8) -> String {
    let filled = (score as usize * 20) / 100;
    "█".repeat(filled) + &"·".repeat(20 - filled)
}

fn spark(height: u8) -> char {
    match height {
        0..=12 => '▁',
        13..=25 => '▂',
        26..=37 => '▃',
        38..=50 => '▄',
        51..=62 => '▅',
        63..=75 => '▆',
        76..=87 => '▇',
        _ => '█',
    }
}
