//! Human-readable rendering of results and summaries.

use dnsbench_application::use_cases::BenchmarkSummary;
use dnsbench_domain::ResolutionResult;
use std::fmt::Write;

pub fn format_result(result: &ResolutionResult) -> String {
    let server = result.server();
    let mut line = format!(
        "{:<4} {:<20} {:<4} {:<28} {:<5} {:>9.2} ms",
        if result.is_success() { "OK" } else { "FAIL" },
        server.name,
        server.server_type,
        result.domain(),
        result.record_type(),
        result.response_time_ms(),
    );

    if let Some(method) = result.method() {
        let _ = write!(line, " [{}]", method);
    }

    match (result.answers(), result.error()) {
        (Some([]), _) => line.push_str("  (no records)"),
        (Some(answers), _) => {
            let _ = write!(line, "  {}", answers.join(", "));
        }
        (None, Some(error)) => {
            let _ = write!(line, "  {}", error);
        }
        (None, None) => {}
    }

    line
}

pub fn format_summary(summaries: &[BenchmarkSummary]) -> String {
    let mut table = format!(
        "{:<20} {:<4} {:>5} {:>5} {:>10} {:>10} {:>10}\n",
        "SERVER", "TYPE", "OK", "FAIL", "MIN ms", "AVG ms", "MAX ms"
    );

    for summary in summaries {
        let _ = writeln!(
            table,
            "{:<20} {:<4} {:>5} {:>5} {:>10} {:>10} {:>10}",
            summary.server,
            summary.server_type,
            summary.successes,
            summary.failures(),
            ms(summary.min_ms),
            ms(summary.avg_ms),
            ms(summary.max_ms),
        );
    }

    table
}

fn ms(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}
