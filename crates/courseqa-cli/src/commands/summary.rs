use anyhow::Result;
use chrono::Utc;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use courseqa_core::pipeline::{snapshot, IssuePipeline};
use serde_json::json;

use super::{FilterArgs, SourceArgs};

pub fn run(source: &SourceArgs, filter: &FilterArgs, json_output: bool) -> Result<()> {
    let mut pipeline = IssuePipeline::new();
    let table = source.load(&mut pipeline)?;
    let filter = filter.to_filter()?;
    let snap = snapshot(&table, &filter, Utc::now())?;

    if json_output {
        let doc = json!({
            "rows": snap.filtered.height(),
            "kpis": snap.kpis,
            "sla_breach_rates": snap.sla_breach_rates,
            "daily_created": snap.daily_created,
            "status_distribution": snap.status_distribution,
            "severity_mix": snap.severity_mix,
            "age_histogram": snap.age_histogram,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!(
        "Showing {} of {} issues",
        snap.filtered.height(),
        snap.table.height()
    );

    let mut kpis = Table::new();
    kpis.load_preset(UTF8_FULL).set_header(vec![
        "Open (incl. In Progress)",
        "Verified",
        "Closed",
        "Critical Open",
        "Open SLA Breaches",
    ]);
    kpis.add_row(vec![
        snap.kpis.open.to_string(),
        snap.kpis.verified.to_string(),
        snap.kpis.closed.to_string(),
        snap.kpis.critical_open.to_string(),
        snap.kpis.open_sla_breaches.to_string(),
    ]);
    println!("{kpis}");

    let mut status = Table::new();
    status
        .load_preset(UTF8_FULL)
        .set_header(vec!["Status", "Count"]);
    for entry in &snap.status_distribution {
        status.add_row(vec![entry.status.to_string(), entry.count.to_string()]);
    }
    println!("\nStatus distribution\n{status}");

    let mut breach = Table::new();
    breach
        .load_preset(UTF8_FULL)
        .set_header(vec!["Severity", "Breach rate (%)"]);
    for entry in &snap.sla_breach_rates {
        breach.add_row(vec![
            entry.severity.to_string(),
            format!("{:.1}", entry.breach_rate_pct),
        ]);
    }
    println!("\nSLA breach rate among open issues\n{breach}");

    let mut ages = Table::new();
    ages.load_preset(UTF8_FULL)
        .set_header(vec!["Age (days)", "Count"]);
    for entry in &snap.age_histogram {
        ages.add_row(vec![entry.bucket.to_string(), entry.count.to_string()]);
    }
    println!("\nIssue age distribution\n{ages}");

    let mut mix = Table::new();
    mix.load_preset(UTF8_FULL)
        .set_header(vec!["Course", "Severity", "Count", "Share"]);
    for entry in &snap.severity_mix {
        mix.add_row(vec![
            entry.course_name.clone(),
            entry.severity.to_string(),
            entry.count.to_string(),
            format!("{:.2}", entry.share),
        ]);
    }
    println!("\nSeverity mix by course\n{mix}");

    Ok(())
}
