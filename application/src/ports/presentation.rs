//! Presentation sink port
//!
//! The season narrates every beat through this port and waits for the sink
//! to go idle before moving on. The wait is bounded by
//! [`SeasonParams::presentation_fallback`](crate::config::SeasonParams), so a
//! sink that never idles cannot stall the season.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Mood of an announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Good,
    Bad,
    Dramatic,
}

/// One narrated message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Announcement {
    pub title: String,
    pub lines: Vec<String>,
    pub tone: Tone,
    /// How long the sink should keep the message up
    pub duration: Duration,
    pub emphasized: bool,
}

impl Announcement {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            tone: Tone::Neutral,
            duration: Duration::from_millis(1500),
            emphasized: false,
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn emphasized(mut self) -> Self {
        self.emphasized = true;
        self
    }
}

/// Port for narrating the season
#[async_trait]
pub trait PresentationSink: Send + Sync {
    async fn show_message(&self, announcement: &Announcement);

    /// Resolves once everything shown so far has finished displaying
    async fn wait_idle(&self);
}

/// Sink that shows nothing and is always idle
pub struct NoPresentation;

#[async_trait]
impl PresentationSink for NoPresentation {
    async fn show_message(&self, _announcement: &Announcement) {}

    async fn wait_idle(&self) {}
}
