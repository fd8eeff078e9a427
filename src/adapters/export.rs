//! Report Export - CSV and JSON rendering
//!
//! CSV layout: the round table with a header row, a blank line, then a
//! `metric,value` block of statistics. Money and percentage columns use
//! two fixed decimals, rounded half away from zero through
//! `rust_decimal` so binary float noise never leaks into the output.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use rust_decimal::prelude::*;
use serde::Serialize;

use crate::domain::progression::Round;
use crate::domain::statistics::Statistics;

const ROUND_HEADER: &str = "round,bet_amount,cumulative_loss,total_wagered,potential_win,\
net_profit_if_win,remaining_bankroll,breakeven,target_met";

/// Renders the round table followed by the statistics block.
pub fn to_csv(rounds: &[Round], stats: &Statistics) -> String {
    let mut out = String::with_capacity(128 * (rounds.len() + 16));
    out.push_str(ROUND_HEADER);
    out.push('\n');

    for r in rounds {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            r.round,
            fixed2(r.bet_amount),
            fixed2(r.cumulative_loss),
            fixed2(r.total_wagered),
            fixed2(r.potential_win),
            fixed2(r.net_profit_if_win),
            fixed2(r.remaining_bankroll),
            r.breakeven,
            r.target_met,
        );
    }

    out.push('\n');
    out.push_str("metric,value\n");

    let metrics = [
        ("bust_probability", stats.bust_probability),
        ("win_probability_at_least_once", stats.win_probability_at_least_once),
        ("expected_value", stats.expected_value),
        ("risk_of_ruin", stats.risk_of_ruin),
        ("kelly_criterion", stats.kelly_criterion),
        ("max_drawdown", stats.max_drawdown),
        ("recommended_bankroll", stats.recommended_bankroll),
        ("average_profit", stats.average_profit),
        ("worst_case_scenario", stats.worst_case_scenario),
        ("largest_bet", stats.largest_bet),
    ];

    let _ = writeln!(out, "max_possible_rounds,{}", stats.max_possible_rounds);
    for (name, value) in metrics {
        let _ = writeln!(out, "{name},{}", fixed2(value));
    }

    out
}

/// Pretty-printed JSON of any report type.
///
/// # Errors
/// Returns an error if the value cannot be serialized.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")
}

/// Two fixed decimals, half away from zero.
fn fixed2(value: f64) -> String {
    match Decimal::from_f64(value) {
        Some(d) => {
            let mut d = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            d.rescale(2);
            if d.is_zero() {
                d.set_sign_positive(true);
            }
            d.to_string()
        }
        // Outside Decimal's range; still finite by construction
        None => format!("{value:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::odds::OddsType;
    use crate::domain::plan::PlanConfig;
    use crate::usecases::planner::plan;

    #[test]
    fn test_fixed2_formatting() {
        assert_eq!(fixed2(10.0), "10.00");
        assert_eq!(fixed2(1.5625), "1.56");
        assert_eq!(fixed2(98.4375), "98.44");
        assert_eq!(fixed2(-630.0), "-630.00");
        assert_eq!(fixed2(-0.0), "0.00");
        assert_eq!(fixed2(-0.001), "0.00");
    }

    #[test]
    fn test_csv_layout() {
        let config = PlanConfig::new(10.0, 1000.0, 2.0, OddsType::Decimal).with_max_rounds(10);
        let report = plan(&config).unwrap();
        let csv = to_csv(&report.rounds, &report.statistics);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], ROUND_HEADER);
        assert_eq!(lines[1], "1,10.00,0.00,10.00,10.00,10.00,990.00,true,true");
        assert_eq!(lines[6], "6,320.00,310.00,630.00,320.00,10.00,370.00,true,true");
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "metric,value");
        assert!(lines.contains(&"max_possible_rounds,6"));
        assert!(lines.contains(&"bust_probability,1.56"));
        assert!(lines.contains(&"worst_case_scenario,-630.00"));
        assert!(lines.contains(&"recommended_bankroll,200.00"));
    }

    #[test]
    fn test_csv_empty_progression() {
        let config = PlanConfig::new(50.0, 10.0, 2.0, OddsType::Decimal);
        let report = plan(&config).unwrap();
        let csv = to_csv(&report.rounds, &report.statistics);

        assert!(csv.starts_with(ROUND_HEADER));
        assert!(csv.contains("bust_probability,100.00"));
        assert!(csv.contains("expected_value,0.00"));
    }

    #[test]
    fn test_json_round_trips_statistics() {
        let config = PlanConfig::new(10.0, 1000.0, 2.0, OddsType::Decimal);
        let report = plan(&config).unwrap();
        let json = to_json(&report.statistics).unwrap();
        let back: Statistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report.statistics);
    }
}
