//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use user_discovery::{DiscoveryOutcome, User};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").trim_end());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

fn user_row(user: &User) -> Vec<String> {
    vec![
        user.id.clone(),
        user.username.clone().unwrap_or_default(),
        user.email.clone().unwrap_or_default(),
        user.last_login_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    ]
}

/// Print the result of a discovery run.
///
/// Unmatched emails and errors go to stderr in human mode so stdout only
/// carries users.
pub fn print_outcome(
    outcome: &DiscoveryOutcome,
    overall_count: Option<u64>,
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = outcome.users().iter().map(user_row).collect();
            if rows.is_empty() && outcome.error().is_none() {
                println!("No users found");
            }
            print_table(&["ID", "USERNAME", "EMAIL", "LAST LOGIN"], &rows);
            if let Some(count) = overall_count {
                println!();
                println!("Total matches: {count}");
            }
            if let Some(unmatched) = outcome.unmatched_emails() {
                eprintln!("No user found for:");
                for email in unmatched {
                    eprintln!("  {email}");
                }
            } else if let Some(error) = outcome.error() {
                eprintln!("error: {error}");
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "users": outcome.users(),
                "unmatched_emails": outcome.unmatched_emails(),
                "overall_count": overall_count,
                "error": outcome.error().map(|e| e.to_string()),
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
