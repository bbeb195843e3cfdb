use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;

use crate::scoring::{Ranking, ScoreRecord};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> String {
    format!("{:.2}", value)
}

const HEADERS: [&str; 6] = ["#", "City", "Rent/m²", "Avg time (h)", "Neighbor GDP %", "Score"];

/// Format the ranked analysis table.
/// Columns: Index, City, Rent, Average delivery time, Neighboring output, Final score.
/// Numbers are rounded to 2 decimals and right-aligned under their header.
pub fn format_score_table(ranking: &Ranking, use_colors: bool) -> String {
    if ranking.is_empty() {
        return "No cities to rank.".to_string();
    }

    let city_width = ranking
        .records()
        .iter()
        .map(|r| r.city.chars().count())
        .chain(std::iter::once(HEADERS[1].len()))
        .max()
        .unwrap_or(4);
    // Each numeric column fits its header and its widest rounded value
    let num_widths: Vec<usize> = HEADERS[2..]
        .iter()
        .enumerate()
        .map(|(col, header)| {
            ranking
                .records()
                .iter()
                .map(|r| round2(numeric_columns(r)[col]).len())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = format!(
        "{:>3} {:<cw$}  {:>w0$}  {:>w1$}  {:>w2$}  {:>w3$}",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        HEADERS[3],
        HEADERS[4],
        HEADERS[5],
        cw = city_width,
        w0 = num_widths[0],
        w1 = num_widths[1],
        w2 = num_widths[2],
        w3 = num_widths[3],
    );

    let mut lines = Vec::with_capacity(ranking.len() + 1);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (idx, record) in ranking.ranked().enumerate() {
        // 1-based index, right-aligned with trailing dot
        let index_str = format!("{:>2}.", idx + 1);
        let city = format!("{:<cw$}", record.city, cw = city_width);
        let rent = format!("{:>w$}", round2(record.rent_cost_per_area), w = num_widths[0]);
        let time = format!("{:>w$}", round2(record.average_delivery_time), w = num_widths[1]);
        let output = format!(
            "{:>w$}",
            round2(record.neighboring_economic_output),
            w = num_widths[2]
        );
        let score = format!("{:>w$}", round2(record.final_score), w = num_widths[3]);

        let line = if use_colors {
            let score = match score_band(record.final_score) {
                ScoreBand::High => score.green().bold().to_string(),
                ScoreBand::Mid => score.yellow().to_string(),
                ScoreBand::Low => score.red().to_string(),
            };
            format!(
                "{} {}  {}  {}  {}  {}",
                index_str.dimmed(),
                city.cyan(),
                rent,
                time,
                output,
                score
            )
        } else {
            format!("{} {}  {}  {}  {}  {}", index_str, city, rent, time, output, score)
        };
        lines.push(line);
    }

    lines.join("\n")
}

fn numeric_columns(record: &ScoreRecord) -> [f64; 4] {
    [
        record.rent_cost_per_area,
        record.average_delivery_time,
        record.neighboring_economic_output,
        record.final_score,
    ]
}

#[derive(Debug, PartialEq, Eq)]
enum ScoreBand {
    High,
    Mid,
    Low,
}

// Traffic light on the [0, 1] score scale
fn score_band(score: f64) -> ScoreBand {
    if score >= 0.7 {
        ScoreBand::High
    } else if score >= 0.4 {
        ScoreBand::Mid
    } else {
        ScoreBand::Low
    }
}

/// Two-line conclusion naming the winning city.
pub fn format_conclusion(winner: &ScoreRecord, use_colors: bool) -> String {
    if use_colors {
        format!(
            "Most strategic location: {}\nFinal score: {}",
            winner.city.green().bold(),
            round2(winner.final_score).bold()
        )
    } else {
        format!(
            "Most strategic location: {}\nFinal score: {}",
            winner.city,
            round2(winner.final_score)
        )
    }
}

/// Per-criterion breakdown of one city's score (verbose mode)
pub fn format_breakdown(record: &ScoreRecord) -> String {
    let mut lines = vec![format!("{}:", record.city)];
    for factor in &record.factors {
        lines.push(format!(
            "  {:<12} raw {:>9.4}  oriented {:>9.4}  normalized {:.4}  x {:.2} = {:.4}",
            factor.criterion.label(),
            factor.raw,
            factor.oriented,
            factor.normalized,
            factor.weight,
            factor.contribution
        ));
    }
    lines.push(format!("  {:<12} {:.4}", "Final", record.final_score));
    lines.join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: city, rent, avg time, neighboring output, score (no headers, no colors)
pub fn format_tsv(ranking: &Ranking) -> String {
    ranking
        .ranked()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                r.city,
                round2(r.rent_cost_per_area),
                round2(r.average_delivery_time),
                round2(r.neighboring_economic_output),
                round2(r.final_score)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    winner: Option<&'a str>,
    final_score: Option<f64>,
    ranking: Vec<&'a ScoreRecord>,
}

/// Full-precision JSON report: winner plus every record in ranked order.
pub fn format_json(ranking: &Ranking) -> Result<String> {
    let winner = ranking.winner();
    let report = JsonReport {
        winner: winner.map(|w| w.city.as_str()),
        final_score: winner.map(|w| w.final_score),
        ranking: ranking.ranked().collect(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}
