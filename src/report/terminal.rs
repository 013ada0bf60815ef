use crate::report::{AnalysisReport, Reporter};

/// Logs the report through `tracing`, one event per section.
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn report(&self, report: &AnalysisReport) {
        let trend = &report.trend;
        tracing::info!(
            symbol = %report.symbol,
            candles = report.candles,
            trend = %trend.trend,
            confidence = trend.confidence,
            "TREND: {} - {}",
            trend.label,
            trend.description,
        );
        for reason in &trend.signals {
            tracing::info!(symbol = %report.symbol, "  {reason}");
        }

        let prediction = &report.prediction;
        tracing::info!(
            symbol = %report.symbol,
            direction = %prediction.next_day_prediction,
            confidence = prediction.next_day_confidence,
            target_7d = prediction.price_target_7d,
            target_30d = prediction.price_target_30d,
            support = prediction.support_level,
            resistance = prediction.resistance_level,
            risk = %prediction.risk_level,
            "PREDICTION: {}",
            prediction.summary,
        );

        for signal in &report.signals {
            tracing::info!(
                symbol = %report.symbol,
                time = signal.time,
                kind = %signal.kind,
                price = signal.price,
                "SIGNAL: {}",
                signal.reason,
            );
        }

        tracing::info!(symbol = %report.symbol, "CONTEXT:\n{}", report.context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Quote;
    use crate::indicator::test_support::rising;
    use crate::report::analyze;

    #[test]
    fn terminal_reporter_does_not_panic() {
        let report = analyze(&rising(90, 100.0, 1.0), &Quote::default(), &mut || 0.5);
        // Should not panic
        TerminalReporter.report(&report);
    }
}
