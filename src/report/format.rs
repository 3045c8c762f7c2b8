//! Formatted output: terminal summary, solver trace table and the markdown
//! report.
//!
//! We keep formatting code in one place so:
//! - the numeric code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{AnalysisSummary, Compartment, InterpolationMethod, SimulationTrace};
use crate::io::ingest::IngestedData;

/// Format the terminal run summary (dataset stats + rates + indicators).
pub fn format_run_summary(summary: &AnalysisSummary, ingest: &IngestedData) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== sird - SIRD analysis ({}) ===\n",
        summary.region.to_uppercase()
    ));
    if let Some(other) = &summary.compare_region {
        out.push_str(&format!("Comparison region: {}\n", other.to_uppercase()));
    }
    out.push_str(&format!(
        "Parameters: N={} | I_max={} | dt={} days | tol={}\n",
        fmt_grouped(summary.parameters.population, 0),
        fmt_grouped(summary.parameters.i_max, 0),
        summary.parameters.dt,
        summary.parameters.tolerance,
    ));

    let stats = &summary.stats;
    out.push_str(&format!(
        "Rows: {} ({} missing comparison values)\n",
        ingest.rows_used,
        ingest.comparison_gaps.len()
    ));
    out.push_str(&format!(
        "Samples: n={} | day=[{}, {}] | final I={} R={} D={}\n",
        stats.n_samples,
        stats.first_day,
        stats.last_day,
        fmt_grouped(stats.final_infected, 0),
        fmt_grouped(stats.final_recovered, 0),
        fmt_grouped(stats.final_deceased, 0),
    ));

    out.push_str("\nMean derivatives (people/day):\n");
    let d = &summary.derivatives;
    out.push_str(&format!(
        "  dS/dt={} dI/dt={} dR/dt={} dD/dt={}\n",
        fmt_grouped(d.susceptible, 2),
        fmt_grouped(d.infected, 2),
        fmt_grouped(d.recovered, 2),
        fmt_grouped(d.deceased, 2),
    ));

    out.push_str("\nRates:\n");
    out.push_str(&format!("  r (transmission) = {:.4e}\n", summary.rates.transmission));
    out.push_str(&format!("  a (recovery)     = {:.6}\n", summary.rates.recovery));
    out.push_str(&format!("  b (mortality)    = {:.6}\n", summary.rates.mortality));

    let ind = &summary.indicators;
    out.push_str("\nIndicators:\n");
    out.push_str(&format!("  R0  = {:.4e}\n", ind.r0));
    out.push_str(&format!("  HIT = {} people\n", fmt_grouped(ind.herd_immunity_threshold, 0)));
    out.push_str(&format!("  tc  = {:.2} days{}\n", ind.saturation_day, saturation_note(ind.saturation_bracketed)));
    out.push_str(&format!("  vaccine doses = {}\n", fmt_grouped(ind.vaccine_doses, 0)));

    let t = &summary.totals;
    out.push_str("\nCumulative totals:\n");
    out.push_str(&format!(
        "  infections: trapezoidal={} simpson={}\n",
        fmt_grouped(t.infections_trapezoidal, 0),
        fmt_grouped(t.infections_simpson, 0),
    ));
    out.push_str(&format!(
        "  recoveries: trapezoidal={} simpson={}\n",
        fmt_grouped(t.recoveries_trapezoidal, 0),
        fmt_grouped(t.recoveries_simpson, 0),
    ));

    out
}

/// Format solver traces side by side, one row per day.
pub fn format_trace_table(traces: &[SimulationTrace], compartment: Compartment) -> String {
    let mut out = String::new();
    let Some(first) = traces.first() else {
        return out;
    };

    out.push_str(&format!("{} by day:\n", compartment.display_name()));

    let mut header = format!("{:>10}", "day");
    for trace in traces {
        header.push_str(&format!(" {:>18}", trace.method.display_name()));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let mut rule = format!("{:-<10}", "");
    for _ in traces {
        rule.push_str(&format!(" {:-<18}", ""));
    }
    out.push_str(&rule);
    out.push('\n');

    for (t, day) in first.day.iter().enumerate() {
        let mut row = format!("{day:>10.1}");
        for trace in traces {
            let v = trace.column(compartment).get(t).copied().unwrap_or(f64::NAN);
            row.push_str(&format!(" {:>18}", fmt_grouped(v, 2)));
        }
        out.push_str(&row);
        out.push('\n');
    }

    out
}

/// Render the markdown report.
pub fn format_markdown_report(summary: &AnalysisSummary) -> String {
    let mut out = String::new();
    let p = &summary.parameters;
    let s = &summary.stats;
    let d = &summary.derivatives;
    let r = &summary.rates;
    let ind = &summary.indicators;
    let t = &summary.totals;

    out.push_str(&format!(
        "## Final Report: SIRD analysis for {}\n\n",
        summary.region.to_uppercase()
    ));
    out.push_str(&format!(
        "_Generated {} by {}._\n\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S"),
        summary.tool
    ));

    out.push_str("## Parameters Used\n");
    out.push_str(&format!("- **Population (N)**: {}\n", fmt_grouped(p.population, 0)));
    out.push_str(&format!("- **Max Hospital Capacity (I_max)**: {}\n", fmt_grouped(p.i_max, 0)));
    out.push_str(&format!("- **Time Step (dt)**: {} days\n", p.dt));
    out.push_str(&format!("- **Bisection Tolerance**: {}\n\n", p.tolerance));

    out.push_str("## Differentiation Results\n");
    out.push_str(&format!("- **Average dS/dt**: {} people/day\n", fmt_grouped(d.susceptible, 2)));
    out.push_str(&format!("- **Average dI/dt**: {} people/day\n", fmt_grouped(d.infected, 2)));
    out.push_str(&format!("- **Average dR/dt**: {} people/day\n", fmt_grouped(d.recovered, 2)));
    out.push_str(&format!("- **Average dD/dt**: {} people/day\n\n", fmt_grouped(d.deceased, 2)));

    out.push_str("## Interpolation Methods Used\n");
    for method in InterpolationMethod::ALL {
        out.push_str(&format!("- {} Interpolation\n", method.display_name()));
    }
    out.push('\n');
    out.push_str("## Integration Methods Used\n- Trapezoidal Integration\n- Simpson's Rule Integration\n\n");
    out.push_str("## Differential Equation Solvers Used\n- Explicit Euler Method\n- Implicit Euler Method\n\n");

    out.push_str("## Data Overview\n");
    out.push_str(&format!("- **Total Days Analyzed**: {} days\n", s.last_day));
    out.push_str(&format!("- **Samples**: {}\n", s.n_samples));
    out.push_str(&format!("- **Final Infected Count**: {}\n", fmt_grouped(s.final_infected, 0)));
    out.push_str(&format!("- **Final Recovered Count**: {}\n", fmt_grouped(s.final_recovered, 0)));
    out.push_str(&format!("- **Final Deceased Count**: {}\n\n", fmt_grouped(s.final_deceased, 0)));

    out.push_str(&format!("- **Infection Rate (r)**: {:.4e}\n", r.transmission));
    out.push_str(&format!("- **Recovery Rate (a)**: {:.6}\n", r.recovery));
    out.push_str(&format!("- **Mortality Rate (b)**: {:.6}\n", r.mortality));
    out.push_str(&format!("- **Basic Reproduction Number (R0)**: {:.4e}\n\n", ind.r0));

    out.push_str("## Critical Indicators\n");
    out.push_str(&format!(
        "- **tc (Hospital Saturation)**: {:.2} days{}\n",
        ind.saturation_day,
        saturation_note(ind.saturation_bracketed)
    ));
    out.push_str(&format!(
        "- **HIT (Collective Immunity Threshold)**: {} people\n",
        fmt_grouped(ind.herd_immunity_threshold, 0)
    ));
    out.push_str(&format!("- **Vaccine Doses Needed**: {}\n", fmt_grouped(ind.vaccine_doses, 0)));

    out.push_str("\n## Estimated Total Infections\n");
    out.push_str(&format!("- **Total Infections (Trapezoidal)**: {}\n", fmt_grouped(t.infections_trapezoidal, 0)));
    out.push_str(&format!("- **Total Infections (Simpson)**: {}\n", fmt_grouped(t.infections_simpson, 0)));

    out.push_str("\n## Estimated Total Recoveries\n");
    out.push_str(&format!("- **Total Recoveries (Trapezoidal)**: {}\n", fmt_grouped(t.recoveries_trapezoidal, 0)));
    out.push_str(&format!("- **Total Recoveries (Simpson)**: {}\n", fmt_grouped(t.recoveries_simpson, 0)));

    out.push_str("\n## Graphs\n");
    out.push_str("- See the `graphs/` directory for all generated plots.\n");

    out
}

fn saturation_note(bracketed: bool) -> &'static str {
    if bracketed { "" } else { " (capacity not reached in observed range)" }
}

/// Fixed-point formatting with `,` thousands separators.
pub fn fmt_grouped(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }

    let raw = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Sign of the rounded value, so -0.3 at zero decimals prints "0".
    let negative = v < 0.0 && raw.bytes().any(|b| matches!(b, b'1'..=b'9'));

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    use crate::domain::{
        CumulativeTotals, DatasetStats, DerivativeMeans, EulerMethod, Indicators, RateParameters, RunParameters,
    };

    fn summary() -> AnalysisSummary {
        AnalysisSummary {
            tool: "sird".to_string(),
            generated_at: Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            region: "can".to_string(),
            compare_region: Some("usa".to_string()),
            parameters: RunParameters {
                population: 38_940_000.0,
                i_max: 62_000.0,
                dt: 10.0,
                tolerance: 1.0,
            },
            stats: DatasetStats {
                n_samples: 76,
                first_day: 0.0,
                last_day: 750.0,
                final_infected: 45_123.0,
                final_recovered: 3_500_000.0,
                final_deceased: 40_000.0,
            },
            derivatives: DerivativeMeans {
                susceptible: -4_700.5,
                infected: 60.0,
                recovered: 4_666.67,
                deceased: 53.3,
            },
            rates: RateParameters {
                recovery: 0.071234,
                mortality: 0.001234,
                transmission: 2.5e-9,
            },
            indicators: Indicators {
                r0: 3.45e-8,
                herd_immunity_threshold: -1_000_000_000.0,
                saturation_day: 212.345,
                saturation_bracketed: true,
                vaccine_doses: 47_516_000.0,
            },
            totals: CumulativeTotals {
                infections_trapezoidal: 3_600_000.4,
                infections_simpson: 3_590_000.0,
                recoveries_trapezoidal: 3_400_000.0,
                recoveries_simpson: 3_410_000.0,
            },
        }
    }

    #[test]
    fn grouped_formatting() {
        assert_eq!(fmt_grouped(38_940_000.0, 0), "38,940,000");
        assert_eq!(fmt_grouped(999.0, 0), "999");
        assert_eq!(fmt_grouped(1_000.0, 0), "1,000");
        assert_eq!(fmt_grouped(-4_700.5, 2), "-4,700.50");
        assert_eq!(fmt_grouped(0.1234, 2), "0.12");
        assert_eq!(fmt_grouped(-0.3, 0), "0");
        assert_eq!(fmt_grouped(-0.004, 2), "0.00");
        assert_eq!(fmt_grouped(-0.6, 0), "-1");
        assert_eq!(fmt_grouped(f64::NAN, 2), "NaN");
        assert_eq!(fmt_grouped(f64::NEG_INFINITY, 0), "-inf");
    }

    #[test]
    fn markdown_report_contains_key_lines() {
        let md = format_markdown_report(&summary());
        assert!(md.starts_with("## Final Report: SIRD analysis for CAN\n"));
        assert!(md.contains("- **Population (N)**: 38,940,000\n"));
        assert!(md.contains("- **Time Step (dt)**: 10 days\n"));
        assert!(md.contains("- **Average dS/dt**: -4,700.50 people/day\n"));
        assert!(md.contains("- Quadratic spline Interpolation\n"));
        assert!(md.contains("- **Total Days Analyzed**: 750 days\n"));
        assert!(md.contains("- **Infection Rate (r)**: 2.5000e-9\n"));
        assert!(md.contains("- **Recovery Rate (a)**: 0.071234\n"));
        assert!(md.contains("- **tc (Hospital Saturation)**: 212.35 days\n"));
        assert!(md.contains("- **HIT (Collective Immunity Threshold)**: -1,000,000,000 people\n"));
        assert!(md.contains("- **Vaccine Doses Needed**: 47,516,000\n"));
        assert!(md.contains("- **Total Infections (Trapezoidal)**: 3,600,000\n"));
    }

    #[test]
    fn unbracketed_saturation_is_annotated() {
        let mut s = summary();
        s.indicators.saturation_bracketed = false;
        let md = format_markdown_report(&s);
        assert!(md.contains("212.35 days (capacity not reached in observed range)\n"));
    }

    #[test]
    fn trace_table_lines_up_methods() {
        let make = |method, infected: Vec<f64>| SimulationTrace {
            method,
            day: vec![0.0, 10.0],
            susceptible: vec![0.0; 2],
            infected,
            recovered: vec![0.0; 2],
            deceased: vec![0.0; 2],
        };
        let traces = [
            make(EulerMethod::Explicit, vec![10.0, 1_234.5]),
            make(EulerMethod::Implicit, vec![10.0, f64::NAN]),
        ];
        let txt = format_trace_table(&traces, Compartment::Infected);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Infected by day:");
        assert!(lines[1].contains("Explicit Euler") && lines[1].contains("Implicit Euler"));
        assert!(lines[4].trim_start().starts_with("10.0"));
        assert!(lines[4].contains("1,234.50"));
        assert!(lines[4].trim_end().ends_with("NaN"));
        assert_eq!(lines.len(), 5);
    }
}
