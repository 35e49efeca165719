use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use crate::runner::BatchReport;

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &BatchReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Autopilot Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;

    writeln!(out, "Games played: {}", report.games)?;
    writeln!(out, "Won: {}", report.wins.to_string().green())?;
    writeln!(out, "Died: {}", report.deaths.to_string().red())?;
    writeln!(
        out,
        "Agent failures: {}",
        report.agent_failures.to_string().yellow()
    )?;
    writeln!(out, "Move limit reached: {}", report.move_limits)?;
    writeln!(out, "Stalled: {}", report.stalls)?;
    writeln!(out, "Best score: {}", report.best_score)?;
    writeln!(out, "Mean score: {:.1}", report.mean_score)?;
    writeln!(out, "Mean moves: {:.1}", report.mean_moves)?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in &report.results {
        let summary = &result.summary;
        let status = if result.died() {
            "❌ DIED".red()
        } else {
            format!("✅ {}", summary.outcome.label().to_uppercase())
                .as_str()
                .green()
        };
        writeln!(
            out,
            "{status} seed {} #{}",
            result.base_seed.to_string().bold(),
            result.game_index
        )?;
        writeln!(
            out,
            "   Score: {}/{} in {} moves",
            summary.score, summary.max_score, summary.moves
        )?;
        writeln!(
            out,
            "   Decision time: {:?} total, {:?} smoothed",
            summary.total_decision, summary.smoothed_decision
        )?;
    }

    if let (Some(fastest), Some(slowest)) = (
        report.results.iter().min_by_key(|r| r.summary.smoothed_decision),
        report.results.iter().max_by_key(|r| r.summary.smoothed_decision),
    ) {
        writeln!(out)?;
        writeln!(out, "{}", "⚡ Decision Latency".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        writeln!(
            out,
            "Fastest: seed {} ({:?})",
            fastest.summary.seed.to_string().green(),
            fastest.summary.smoothed_decision
        )?;
        writeln!(
            out,
            "Slowest: seed {} ({:?})",
            slowest.summary.seed.to_string().yellow(),
            slowest.summary.smoothed_decision
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &BatchReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &BatchReport) -> Result<()> {
    writeln!(out, "# SnakePilot Autopilot Results\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Games**: {}", report.games)?;
    writeln!(out, "- **Won**: {}", report.wins)?;
    writeln!(out, "- **Died**: {}", report.deaths)?;
    writeln!(out, "- **Agent failures**: {}", report.agent_failures)?;
    writeln!(out, "- **Move limit**: {}", report.move_limits)?;
    writeln!(out, "- **Stalled**: {}", report.stalls)?;
    writeln!(out, "- **Mean score**: {:.1}\n", report.mean_score)?;

    writeln!(out, "## Games\n")?;
    writeln!(out, "| Seed | Game | Outcome | Score | Moves | Smoothed decision |")?;
    writeln!(out, "|---:|---:|---|---:|---:|---:|")?;
    for result in &report.results {
        let summary = &result.summary;
        writeln!(
            out,
            "| {} | {} | {} | {}/{} | {} | {:?} |",
            summary.seed,
            result.game_index,
            summary.outcome,
            summary.score,
            summary.max_score,
            summary.moves,
            summary.smoothed_decision
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::sample_result;
    use snakepilot_game::Outcome;

    fn sample_report() -> BatchReport {
        BatchReport::from_results(vec![
            sample_result(Outcome::Won, 31),
            sample_result(Outcome::Died, 7),
        ])
    }

    fn render(write: impl Fn(&mut dyn Write) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn json_report_round_trips_totals() {
        let text = render(|out| generate_json_report(out, &sample_report()));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["games"], 2);
        assert_eq!(value["deaths"], 1);
        assert_eq!(value["stalls"], 0);
        assert_eq!(value["results"][0]["summary"]["outcome"], "won");
    }

    #[test]
    fn markdown_report_lists_each_game() {
        let text = render(|out| generate_markdown_report(out, &sample_report()));
        assert!(text.starts_with("# SnakePilot Autopilot Results"));
        assert!(text.contains("| 1 | 0 | won | 31/31 |"));
        assert!(text.contains("| 1 | 0 | died | 7/31 |"));
        assert!(text.contains("- **Stalled**: 0"));
    }

    #[test]
    fn console_report_includes_latency_section() {
        colored::control::set_override(false);
        let text = render(|out| {
            generate_console_report(out, &sample_report(), Duration::from_millis(12))
        });
        assert!(text.contains("Games played: 2"));
        assert!(text.contains("❌ DIED"));
        assert!(text.contains("Decision Latency"));
    }
}
