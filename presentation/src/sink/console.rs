//! Terminal narration of the season.

use async_trait::async_trait;
use colored::{ColoredString, Colorize};
use house_application::ports::presentation::{Announcement, PresentationSink, Tone};
use indicatif::MultiProgress;
use std::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Prints announcements and stays busy for their display duration.
///
/// `wait_idle` resolves once the last message shown has had its time on
/// screen, scaled by `pace`. With a pace of zero the sink is always idle.
pub struct ConsolePresentation {
    busy_until: Mutex<Instant>,
    pace: f64,
    printer: Option<MultiProgress>,
}

impl ConsolePresentation {
    pub fn new() -> Self {
        Self {
            busy_until: Mutex::new(Instant::now()),
            pace: 1.0,
            printer: None,
        }
    }

    pub fn with_pace(mut self, pace: f64) -> Self {
        self.pace = pace.max(0.0);
        self
    }

    /// Print through the progress bars instead of straight to stdout
    pub fn with_printer(mut self, printer: MultiProgress) -> Self {
        self.printer = Some(printer);
        self
    }

    pub fn render(announcement: &Announcement) -> String {
        let title = Self::paint(&announcement.title, announcement.tone);
        let title = if announcement.emphasized {
            format!("{} {}", "▶".bold(), title.bold())
        } else {
            format!("  {}", title)
        };

        let mut text = title;
        for line in &announcement.lines {
            text.push_str(&format!("\n    {}", line));
        }
        text
    }

    fn paint(text: &str, tone: Tone) -> ColoredString {
        match tone {
            Tone::Neutral => text.normal(),
            Tone::Good => text.green(),
            Tone::Bad => text.red(),
            Tone::Dramatic => text.yellow(),
        }
    }

    fn print(&self, text: &str) {
        match &self.printer {
            Some(multi) => {
                if multi.println(text).is_err() {
                    println!("{}", text);
                }
            }
            None => println!("{}", text),
        }
    }
}

impl Default for ConsolePresentation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresentationSink for ConsolePresentation {
    async fn show_message(&self, announcement: &Announcement) {
        self.print(&Self::render(announcement));

        let hold = announcement.duration.mul_f64(self.pace);
        if let Ok(mut busy_until) = self.busy_until.lock() {
            let now = Instant::now();
            *busy_until = (*busy_until).max(now) + hold;
        }
    }

    async fn wait_idle(&self) {
        let until = match self.busy_until.lock() {
            Ok(busy_until) => *busy_until,
            Err(_) => return,
        };
        sleep_until(until).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn announcement(secs: u64) -> Announcement {
        Announcement::new("Live Eviction")
            .line("On the block: Ada, Bo")
            .duration(Duration::from_secs(secs))
    }

    #[test]
    fn test_render_includes_lines() {
        let text = ConsolePresentation::render(&announcement(1).emphasized());
        assert!(text.contains("Live Eviction"));
        assert!(text.contains("\n    On the block: Ada, Bo"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_idle_holds_for_duration() {
        let sink = ConsolePresentation::new();
        let start = Instant::now();
        sink.show_message(&announcement(2)).await;
        sink.show_message(&announcement(3)).await;
        sink.wait_idle().await;
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_pace_is_always_idle() {
        let sink = ConsolePresentation::new().with_pace(0.0);
        let start = Instant::now();
        sink.show_message(&announcement(10)).await;
        sink.wait_idle().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
