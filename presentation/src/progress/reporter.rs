//! Progress reporting while a season runs

use colored::Colorize;
use house_application::ports::progress::SeasonProgressNotifier;
use house_domain::{Phase, SeasonResult, WeekRecord};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner for the phase in progress, labelled with its week
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    /// Handle for printing above the bars without tearing them
    pub fn multi(&self) -> MultiProgress {
        self.multi.clone()
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_label(phase: &Phase, week: u32) -> String {
        match phase {
            Phase::Lobby | Phase::Opening => "Premiere".to_string(),
            p if p.is_endgame() => "Finale".to_string(),
            _ => format!("Week {}", week),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, week: u32, window: Duration) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase, week));
        pb.set_message(format!(
            "{} ({}s)",
            phase.display_name(),
            window.as_secs()
        ));
        pb.enable_steady_tick(Duration::from_millis(120));

        let Ok(mut slot) = self.phase_bar.lock() else {
            return;
        };
        if let Some(previous) = slot.replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        let Ok(mut slot) = self.phase_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            pb.finish_with_message(format!("{} {}", phase.display_name(), "done".green()));
            self.multi.remove(&pb);
        }
    }

    fn on_season_complete(&self, _result: &SeasonResult) {
        let _ = self.multi.clear();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SeasonProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, week: u32, _window: Duration) {
        println!(
            "{} {} {}",
            "->".cyan(),
            ProgressReporter::phase_label(phase, week).dimmed(),
            phase.display_name().bold()
        );
    }

    fn on_phase_complete(&self, _phase: &Phase) {}

    fn on_round_complete(&self, record: &WeekRecord) {
        let evicted = record
            .evicted
            .map(|id| id.to_string())
            .unwrap_or_else(|| "nobody".to_string());
        println!("  {} round over, evicted {}", "v".green(), evicted);
    }
}
