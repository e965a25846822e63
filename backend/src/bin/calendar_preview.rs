//! Calendar preview binary
//!
//! Loads a host property object (settings plus collections), optionally
//! overrides the settings from a TOML file, runs a few navigation steps and
//! prints the resulting view state, visible range and diagnostics as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin calendar-preview --features preview-cli -- properties.json [calendar.toml]
//! ```
//!
//! # Environment Variables
//!
//! - `CALENDAR_DATE`: Anchor date to open on (default: today)
//! - `CALENDAR_VIEW`: View to switch to after opening (month, week, day)
//! - `CALENDAR_STEPS`: Periods to move forward (negative moves back, default: 0)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::fs;

use anyhow::Context;
use serde_json::{json, Value};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use calendar_pro::config::CalendarConfig;
use calendar_pro::services::{CalendarEvent, CalendarWidget, SystemClock};

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        anyhow::bail!("usage: {} <properties.json> [calendar.toml]", args[0]);
    }

    let raw = fs::read_to_string(&args[1])
        .with_context(|| format!("failed to read {}", args[1]))?;
    let properties: Value = serde_json::from_str(&raw).context("properties are not valid JSON")?;

    let sink = |event: CalendarEvent| match serde_json::to_string(&event) {
        Ok(payload) => info!(event = event.name(), "{}", payload),
        Err(e) => warn!("failed to serialize {} event: {}", event.name(), e),
    };
    let (mut widget, report) = CalendarWidget::from_properties(&properties, SystemClock, sink)?;

    if let Some(path) = args.get(2) {
        let config = CalendarConfig::from_file(path)?;
        info!("Applying settings from {}", path);
        widget.apply_settings(config.settings)?;
    }

    for error in &report.errors {
        warn!("{}", error);
    }
    info!(
        "Loaded {} records ({} rejected)",
        report.total_accepted(),
        report.errors.len()
    );

    if let Ok(date) = env::var("CALENDAR_DATE") {
        widget.go_to_date(&date)?;
    }
    if let Ok(view) = env::var("CALENDAR_VIEW") {
        widget.change_view(&view)?;
    }
    let steps: i32 = env::var("CALENDAR_STEPS")
        .ok()
        .map(|s| s.parse())
        .transpose()
        .context("CALENDAR_STEPS must be an integer")?
        .unwrap_or(0);
    for _ in 0..steps.unsigned_abs() {
        if steps > 0 {
            widget.next_period()?;
        } else {
            widget.previous_period()?;
        }
    }

    let placement = widget.render()?;
    let summary = json!({
        "state": widget.state(),
        "range": placement.range,
        "diagnostics": placement.diagnostics,
        "ingest": report,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
