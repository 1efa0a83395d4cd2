use super::findings;
use crate::index::{Definition, ScanResult};
use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    show_ignored: bool,
}

impl TerminalReporter {
    pub fn new(show_ignored: bool) -> Self {
        Self { show_ignored }
    }

    pub fn report(&self, result: &ScanResult) -> Result<()> {
        for error in &result.parse_errors {
            println!("{} {}", "warning:".yellow().bold(), error);
        }
        if !result.parse_errors.is_empty() {
            println!();
        }

        let findings = findings(&result.index, self.show_ignored);
        let dead = findings.iter().filter(|d| d.is_dead()).count();

        if dead == 0 {
            println!("{}", "No dead code found!".green().bold());
        } else {
            println!(
                "{}",
                format!("Found {} dead definitions:", dead).yellow().bold()
            );
        }
        println!();

        // Group by file
        let mut by_file: BTreeMap<&Path, Vec<&Definition>> = BTreeMap::new();
        for definition in &findings {
            by_file
                .entry(definition.location.file.as_path())
                .or_default()
                .push(definition);
        }

        for (file, definitions) in by_file {
            println!("{}", file.display().to_string().cyan().bold());
            for definition in definitions {
                self.print_item(definition);
            }
            println!();
        }

        self.print_summary(result, dead);
        Ok(())
    }

    fn print_item(&self, definition: &Definition) {
        let location = format!(
            "{}:{}",
            definition.location.start_line, definition.location.start_column
        );
        let badge = if definition.is_ignored() {
            " [ignored]".dimmed().to_string()
        } else {
            String::new()
        };

        println!(
            "  {} {} {}{}",
            location.dimmed(),
            definition.kind.display_name().yellow(),
            definition.full_name.white(),
            badge
        );
        println!("    {} {}", "→".dimmed(), definition.location.to_string().dimmed());
    }

    fn print_summary(&self, result: &ScanResult, dead: usize) {
        let index = &result.index;
        let ignored = index.all_definitions().filter(|d| d.is_ignored()).count();
        let alive = index.all_definitions().filter(|d| d.is_alive()).count();

        println!("{}", "─".repeat(60).dimmed());
        println!(
            "Summary: {}, {}, {} of {} definitions ({} references)",
            format!("{} dead", dead).red(),
            format!("{} alive", alive).green(),
            format!("{} ignored", ignored).blue(),
            index.definition_count(),
            index.reference_count()
        );
        if !result.parse_errors.is_empty() {
            println!(
                "{}",
                format!("{} files could not be parsed", result.parse_errors.len()).yellow()
            );
        }
        if dead > 0 {
            println!();
            println!(
                "{}",
                "Tip: Run `rubydeadcode remove <KIND> <LOCATION>` to delete a definition".dimmed()
            );
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new(false)
    }
}
