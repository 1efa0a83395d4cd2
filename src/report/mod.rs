mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::index::{Definition, Index, ScanResult};
use miette::Result;
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terminal" | "text" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format `{}`", other)),
        }
    }
}

/// Reporter for outputting scan results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_ignored: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_ignored: false,
        }
    }

    /// Also list definitions plugins exempted
    pub fn with_ignored(mut self, show: bool) -> Self {
        self.show_ignored = show;
        self
    }

    pub fn report(&self, result: &ScanResult) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new(self.show_ignored).report(result),
            ReportFormat::Json => {
                JsonReporter::new(self.output_path.clone(), self.show_ignored).report(result)
            }
        }
    }
}

/// Dead definitions, plus ignored ones on request, ordered by location
pub(crate) fn findings(index: &Index, show_ignored: bool) -> Vec<&Definition> {
    let mut findings: Vec<&Definition> = index
        .all_definitions()
        .filter(|d| d.is_dead() || (show_ignored && d.is_ignored()))
        .collect();
    findings.sort_by(|a, b| a.location.cmp(&b.location));
    findings
}
