use crate::report::{AnalysisReport, Reporter};

/// Prints the full report as pretty JSON on stdout.
pub struct JsonReporter;

impl JsonReporter {
    pub fn render(report: &AnalysisReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }
}

impl Reporter for JsonReporter {
    fn report(&self, report: &AnalysisReport) {
        match Self::render(report) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, symbol = %report.symbol, "failed to encode report"),
        }
    }
}
