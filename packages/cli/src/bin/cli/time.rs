use anyhow::{bail, Result};
use clap::Subcommand;
use colored::*;

use taskdeck_core::truncate;
use taskdeck_services::{NewTimeEntry, OrSentinel, Services, TimeEntryPatch};

use super::utils::{id_or_dash, new_table, or_dash, parse_id};

#[derive(Subcommand)]
pub enum TimeCommands {
    /// List time entries, newest first
    List {
        #[arg(long, value_parser = parse_id, conflicts_with = "task")]
        project: Option<i64>,
        #[arg(long, value_parser = parse_id)]
        task: Option<i64>,
    },
    /// Record time spent
    Log {
        /// Hours spent
        hours: f64,
        /// Day the work happened (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
        #[arg(long, value_parser = parse_id)]
        task: Option<i64>,
        #[arg(short, long)]
        description: Option<String>,
        /// Entry name; defaults to "Time Entry - <date>"
        #[arg(long)]
        name: Option<String>,
    },
    /// Correct an existing entry
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        date: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a time entry
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
}

pub async fn handle_time_command(services: &Services, command: TimeCommands) -> Result<()> {
    match command {
        TimeCommands::List { project, task } => list_entries(services, project, task).await,
        TimeCommands::Log {
            hours,
            date,
            project,
            task,
            description,
            name,
        } => {
            let entry = services
                .time_entries
                .create_from_timer(NewTimeEntry {
                    name,
                    description,
                    date,
                    duration: Some(hours),
                    project_id: project,
                    task_id: task,
                })
                .await?;
            println!(
                "{} Logged {}h as entry {}",
                "✓".green(),
                entry.duration.unwrap_or(hours),
                entry.id.to_string().cyan()
            );
            Ok(())
        }
        TimeCommands::Edit {
            id,
            hours,
            date,
            description,
        } => {
            let patch = TimeEntryPatch {
                duration: hours,
                date,
                description,
                ..Default::default()
            };
            if patch == TimeEntryPatch::default() {
                bail!("Nothing to update; pass at least one field");
            }
            let entry = services.time_entries.update(id, patch).await?;
            println!("{} Updated entry {}", "✓".green(), entry.id.to_string().cyan());
            Ok(())
        }
        TimeCommands::Delete { id } => {
            services.time_entries.delete(id).await?;
            println!("{} Deleted entry {}", "✓".green(), id);
            Ok(())
        }
    }
}

async fn list_entries(services: &Services, project: Option<i64>, task: Option<i64>) -> Result<()> {
    let entries = match (project, task) {
        (Some(project_id), _) => services.time_entries.get_by_project_id(project_id).await,
        (None, Some(task_id)) => services.time_entries.get_by_task_id(task_id).await,
        (None, None) => services.time_entries.get_all().await,
    }
    .or_sentinel("Error fetching time entries");

    if entries.is_empty() {
        println!("{}", "No time entries found".yellow());
        return Ok(());
    }

    let mut table = new_table(vec!["ID", "Date", "Hours", "Name", "Project", "Task"]);
    for entry in &entries {
        table.add_row(vec![
            entry.id.to_string(),
            or_dash(entry.date.as_deref()),
            entry
                .duration
                .map(|d| format!("{:.2}", d))
                .unwrap_or_else(|| or_dash(None)),
            truncate(&or_dash(entry.name.as_deref()), 30),
            id_or_dash(entry.project_id),
            id_or_dash(entry.task_id),
        ]);
    }

    let total: f64 = entries.iter().filter_map(|e| e.duration).sum();
    println!("{}", table);
    println!("Total: {} hours", format!("{:.2}", total).cyan());
    Ok(())
}
