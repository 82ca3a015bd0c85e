use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::schedule::auto_fill::AutoFillReport;
use crate::schedule::slot_utils::{slot_label, time_string};
use crate::schedule::types::Day;
use crate::schedule::ScheduleEngine;

/// Formats a cell's workers, or "[EMPTY]"
pub fn format_assigned(names: &[String]) -> String {
    if names.is_empty() {
        "[EMPTY]".to_string()
    } else {
        names.join(", ")
    }
}

/// Writes the week as CSV: one row per (day, slot).
pub fn write_schedule_csv<W: Write>(
    engine: &ScheduleEngine,
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["day", "slot", "start", "end", "required", "assigned"])?;

    for slot in engine.list_slots() {
        let required = engine.required_staff(slot.id)?;
        for day in Day::ALL {
            let names = engine.schedule().assigned(day, slot.id);
            wtr.write_record(&[
                day.name().to_string(),
                slot.id.to_string(),
                time_string(slot.start),
                time_string(slot.end),
                required.to_string(),
                names.join(";"),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the week CSV to a file
pub fn write_schedule_to_file<P: AsRef<Path>>(
    engine: &ScheduleEngine,
    filename: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(filename)?;
    write_schedule_csv(engine, file)
}

/// Prints the week grid, day by day
pub fn print_week_schedule(engine: &ScheduleEngine) {
    println!(
        "\n=== Week Schedule (contiguity {}) ===",
        if engine.contiguity() { "on" } else { "off" }
    );

    for day in Day::ALL {
        println!("\n{}", day);
        for slot in engine.list_slots() {
            let names = engine.schedule().assigned(day, slot.id);
            let required = engine.required_staff(slot.id).unwrap_or(0);
            println!(
                "  {} ({}/{}) -> {}",
                slot_label(slot),
                names.len(),
                required,
                format_assigned(names)
            );
        }
    }
}

/// Prints per-worker hours and usage
pub fn print_stats(engine: &ScheduleEngine) {
    let stats = engine.stats();
    println!("\n=== Worker Hours (total assigned: {}h) ===", stats.total_assigned_hours);

    for worker in &stats.workers {
        let days: Vec<String> = worker
            .daily_hours
            .iter()
            .map(|(day, hours)| format!("{} {}h", &day.name()[..3], hours))
            .collect();
        println!(
            "  {:<12} {:>3}/{:<3}h ({:>5.1}%)  {}",
            worker.name,
            worker.total_assigned,
            worker.total_hours,
            worker.usage_percent,
            days.join(", ")
        );
    }

    let totals: Vec<String> = stats
        .daily_totals
        .iter()
        .map(|(day, hours)| format!("{} {}h", &day.name()[..3], hours))
        .collect();
    println!("  {:<12} {}", "Per day", totals.join(", "));
}

/// Prints cells auto-fill could not bring up to target
pub fn print_auto_fill_report(report: &AutoFillReport) {
    println!("\nAuto-fill placed {} workers", report.added.len());
    if !report.shortfalls.is_empty() {
        println!("⚠️  Slots still under target ({}):", report.shortfalls.len());
        for shortfall in &report.shortfalls {
            println!(
                "  - {} slot {}: {}/{}",
                shortfall.day, shortfall.slot_id, shortfall.assigned, shortfall.required
            );
        }
    }
}
