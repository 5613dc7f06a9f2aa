use std::path::Path;

use colored::Colorize;
use fable_stage::{StageEvent, StageEventKind};
use fable_story::{Autopilot, BootPhase, Bootstrap, NapDecision, Platform, Sequencer};

/// Virtual time allowed for startup before giving up.
const BOOT_LIMIT_MS: u64 = 10_000;

pub fn run(
    config: Option<&Path>,
    naps: &[NapDecision],
    ar: bool,
    verbose: bool,
) -> Result<(), String> {
    let mut seq = Sequencer::new(super::load_config(config)?);

    let platform = if ar {
        Platform::Mobile
    } else {
        Platform::Desktop
    };
    let mut boot = Bootstrap::start(platform, &mut seq);
    if ar {
        boot.surface_detected(&mut seq);
    }
    let phase = boot
        .run(&mut seq, BOOT_LIMIT_MS)
        .map_err(|e| format!("startup failed: {e}"))?;
    if phase != BootPhase::Running {
        return Err(boot
            .message()
            .unwrap_or("story did not start")
            .to_string());
    }

    let started_at = seq.stage().now();
    let report = Autopilot::new()
        .with_nap_choices(naps.iter().copied())
        .run(&mut seq)
        .map_err(|e| format!("playthrough failed: {e}"))?;

    println!(
        "  {} {}",
        "The Tortoise and the Hare".bold(),
        format!(
            "({} mode, started at {})",
            if seq.non_ar_mode() { "fallback" } else { "AR" },
            super::format_time(started_at)
        )
        .dimmed()
    );
    if let Some(message) = boot.message() {
        println!("  {}", message.dimmed());
    }
    println!();

    for event in seq.stage().events().events() {
        if let Some(line) = describe(event, verbose) {
            let time = format!("[{}]", super::format_time(event.at_ms)).dimmed();
            println!("  {time} {line}");
        }
    }

    log::info!(
        "playthrough finished after {} taps at {} ms",
        report.taps.len(),
        report.finished_at_ms
    );
    println!();
    println!(
        "  {} scenes, {} taps, finished at {}",
        report.scenes.len(),
        report.taps.len(),
        super::format_time(report.finished_at_ms)
    );
    Ok(())
}

fn describe(event: &StageEvent, verbose: bool) -> Option<String> {
    let kind = &event.kind;
    let line = match kind {
        StageEventKind::SceneLoaded { title, .. } => {
            format!("== {title} ==").bold().underline().to_string()
        }
        StageEventKind::Narration { text } => text.italic().to_string(),
        StageEventKind::Dialogue { speaker, text } => {
            format!("{} {text}", format!("{speaker}:").cyan().bold())
        }
        StageEventKind::ButtonShown { .. } => kind.to_string().green().to_string(),
        StageEventKind::Selected { .. } => kind.to_string().yellow().to_string(),
        StageEventKind::Sound { .. } => kind.to_string().magenta().to_string(),
        StageEventKind::NavigationRejected { .. }
        | StageEventKind::MissingNode { .. }
        | StageEventKind::SoundFailed { .. } => kind.to_string().red().to_string(),
        StageEventKind::Animation { .. }
        | StageEventKind::MoveStarted { .. }
        | StageEventKind::MoveFinished { .. }
        | StageEventKind::StaleDiscarded { .. } => {
            if !verbose {
                return None;
            }
            kind.to_string().dimmed().to_string()
        }
    };
    Some(line)
}
