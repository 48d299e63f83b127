//! Console output formatter for finished seasons

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use house_domain::{CompetitorId, Roster, SeasonResult, WeekRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Formats season results for console display
pub struct ConsoleFormatter;

/// JSON shape of a finished season: the raw result plus a name table
#[derive(Serialize)]
struct SeasonReport<'a> {
    winner: &'a str,
    runner_up: Option<&'a str>,
    names: BTreeMap<CompetitorId, &'a str>,
    #[serde(flatten)]
    result: &'a SeasonResult,
}

impl ConsoleFormatter {
    pub fn format_summary(result: &SeasonResult, roster: &Roster) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Season Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Winner:".green().bold(),
            roster.name_of(result.winner).bold()
        ));
        if let Some(runner_up) = result.runner_up {
            output.push_str(&format!(
                "{} {}\n",
                "Runner-up:".cyan().bold(),
                roster.name_of(runner_up)
            ));
        }
        output.push_str(&format!(
            "{} {}{}\n",
            "Jury vote:".cyan().bold(),
            Self::vote_line(&result.jury_votes, roster),
            if result.tie_break_used {
                " (tie broken)"
            } else {
                ""
            }
        ));
        if let Some(returned) = result.returned {
            output.push_str(&format!(
                "{} {}\n",
                "Returned:".yellow().bold(),
                roster.name_of(returned)
            ));
        }

        output.push_str(&Self::section_header("Eviction Order"));
        for (place, id) in result.eviction_order().iter().enumerate() {
            let juror = if result.jury.contains(id) {
                " (jury)".dimmed().to_string()
            } else {
                String::new()
            };
            output.push_str(&format!(
                "  {:>2}. {}{}\n",
                place + 1,
                roster.name_of(*id),
                juror
            ));
        }

        if let Some(seed) = result.seed {
            output.push_str(&format!("\n{} {}\n", "Seed:".dimmed(), seed));
        }
        output.push_str(&Self::footer());

        output
    }

    pub fn format_full(result: &SeasonResult, roster: &Roster) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Season Results"));
        output.push('\n');

        output.push_str(&Self::section_header("Cast"));
        for competitor in roster.all() {
            let human = if competitor.is_human { " (you)" } else { "" };
            output.push_str(&format!(
                "  {} {}{}\n",
                competitor.name.bold(),
                format!("[{}]", competitor.archetype.as_str()).dimmed(),
                human
            ));
        }

        for record in &result.weeks {
            output.push_str(&Self::week(record, roster));
        }

        output.push_str(&Self::section_header("Jury"));
        output.push_str(&format!("  {}\n", Self::names(&result.jury, roster)));
        output.push_str(&format!(
            "\n{} {}\n",
            "Final vote:".cyan().bold(),
            Self::vote_line(&result.jury_votes, roster)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Winner:".green().bold(),
            roster.name_of(result.winner).bold()
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &SeasonResult, roster: &Roster) -> String {
        let names = roster
            .all()
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect::<BTreeMap<_, _>>();
        let report = SeasonReport {
            winner: names.get(&result.winner).copied().unwrap_or("?"),
            runner_up: result.runner_up.and_then(|id| names.get(&id).copied()),
            names: names.clone(),
            result,
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    fn week(record: &WeekRecord, roster: &Roster) -> String {
        let mut output = Self::section_header(&format!("Week {}", record.week));
        let name = |id: Option<CompetitorId>| {
            id.map(|id| roster.name_of(id))
                .unwrap_or_else(|| "-".to_string())
        };

        output.push_str(&format!("  Power:     {}\n", name(record.power_holder)));
        if !record.nominees.is_empty() {
            output.push_str(&format!(
                "  Nominated: {}\n",
                Self::names(&record.nominees, roster)
            ));
        }
        if record.veto_holder.is_some() {
            output.push_str(&format!("  Veto:      {}\n", name(record.veto_holder)));
        }
        if record.veto_used() {
            output.push_str(&format!(
                "  Saved:     {} (replaced by {})\n",
                name(record.veto_used_on),
                name(record.replacement)
            ));
        }
        if let Some(evicted) = record.evicted {
            let votes = if record.vote_counts.is_empty() {
                String::new()
            } else {
                format!(" [{}]", Self::vote_line(&record.vote_counts, roster))
            };
            output.push_str(&format!(
                "  {}   {}{}\n",
                "Evicted:".red(),
                roster.name_of(evicted),
                votes
            ));
        }
        output
    }

    fn vote_line(votes: &BTreeMap<CompetitorId, u32>, roster: &Roster) -> String {
        let mut counts: Vec<_> = votes.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        counts
            .iter()
            .map(|(id, n)| format!("{} {}", roster.name_of(**id), n))
            .collect::<Vec<_>>()
            .join(" - ")
    }

    fn names(ids: &[CompetitorId], roster: &Roster) -> String {
        ids.iter()
            .map(|id| roster.name_of(*id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_summary(&self, result: &SeasonResult, roster: &Roster) -> String {
        Self::format_summary(result, roster)
    }

    fn format_full(&self, result: &SeasonResult, roster: &Roster) -> String {
        Self::format_full(result, roster)
    }

    fn format_json(&self, result: &SeasonResult, roster: &Roster) -> String {
        Self::format_json(result, roster)
    }
}
