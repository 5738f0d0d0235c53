// sonovid-cli/src/commands/history.rs
//
// `history` lists past conversions newest first, prints them as JSON, or
// clears the file.

use crate::cli::HistoryArgs;
use crate::commands::EXIT_SUCCESS;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;
use console::style;
use sonovid_core::{CoreConfig, HistoryRecord, HistoryStore};

/// Runs the `history` command.
pub fn run_history(args: &HistoryArgs, config: &CoreConfig) -> CliResult<i32> {
    let mut store = HistoryStore::open(config.history_path());

    if args.clear {
        let removed = store.len();
        store.clear();
        terminal::print_success(&format!("Cleared {removed} history record(s)"));
        return Ok(EXIT_SUCCESS);
    }

    let records = select_records(&store, args.limit);

    if args.json {
        let json = serde_json::to_string_pretty(&records)
            .cli_context("Failed to encode history as JSON")?;
        println!("{json}");
        return Ok(EXIT_SUCCESS);
    }

    terminal::print_section("History");
    if records.is_empty() {
        println!("  No conversions recorded yet.");
        return Ok(EXIT_SUCCESS);
    }

    for record in &records {
        println!("{}", format_record(record));
    }

    let stats = store.stats();
    println!();
    terminal::print_status("Total", &stats.total.to_string(), false);
    terminal::print_status("Succeeded", &stats.succeeded.to_string(), false);
    terminal::print_status("Failed", &stats.failed.to_string(), false);
    Ok(EXIT_SUCCESS)
}

/// Newest records first, at most `limit` of them.
#[must_use]
pub fn select_records(store: &HistoryStore, limit: Option<usize>) -> Vec<&HistoryRecord> {
    store.recent().take(limit.unwrap_or(usize::MAX)).collect()
}

/// One listing line: date, status, format, file name and output.
#[must_use]
pub fn format_record(record: &HistoryRecord) -> String {
    let status = if record.success {
        style("ok  ").green().to_string()
    } else {
        style("fail").red().to_string()
    };
    let mut line = format!(
        "  {}  {}  {:<5} {}",
        record.date,
        status,
        record.format,
        record.file_name()
    );
    if !record.output_file.is_empty() {
        line.push_str(&format!(" -> {}", record.output_file));
    }
    line
}
