//! Output formatter trait

use house_domain::{OutputFormat, Roster, SeasonResult};

/// Trait for formatting a finished season
///
/// `roster` supplies names and archetypes; the result itself only carries ids.
pub trait OutputFormatter {
    /// Winner, final vote and eviction order
    fn format_summary(&self, result: &SeasonResult, roster: &Roster) -> String;

    /// Week-by-week record of the whole season
    fn format_full(&self, result: &SeasonResult, roster: &Roster) -> String;

    /// Format as JSON
    fn format_json(&self, result: &SeasonResult, roster: &Roster) -> String;

    fn format_as(&self, format: OutputFormat, result: &SeasonResult, roster: &Roster) -> String {
        match format {
            OutputFormat::Summary => self.format_summary(result, roster),
            OutputFormat::Full => self.format_full(result, roster),
            OutputFormat::Json => self.format_json(result, roster),
        }
    }
}
