use anyhow::{bail, Result};
use clap::Subcommand;
use colored::*;

use taskdeck_core::truncate;
use taskdeck_services::{NewTask, OrSentinel, Services, TaskPatch};

use super::utils::{format_date, id_or_dash, new_table, or_dash, parse_id};

#[derive(Subcommand)]
pub enum TasksCommands {
    /// List tasks, optionally for one project
    List {
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
    },
    /// Add a new task
    Add {
        /// Task name
        name: String,
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
        /// Defaults to Medium
        #[arg(long)]
        priority: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        due: Option<String>,
        /// User id the task is assigned to
        #[arg(long, value_parser = parse_id)]
        assign: Option<i64>,
    },
    /// Change fields of an existing task
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_parser = parse_id)]
        assign: Option<i64>,
    },
    /// Mark a task as completed
    Complete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Delete a task
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
}

pub async fn handle_tasks_command(services: &Services, command: TasksCommands) -> Result<()> {
    match command {
        TasksCommands::List { project } => list_tasks(services, project).await,
        TasksCommands::Add {
            name,
            project,
            priority,
            description,
            start,
            due,
            assign,
        } => {
            let task = services
                .tasks
                .create(NewTask {
                    name: Some(name),
                    description,
                    priority,
                    start_date: start,
                    due_date: due,
                    project_id: project,
                    assigned_to: assign,
                    ..Default::default()
                })
                .await?;
            println!("{} Created task {}", "✓".green(), task.id.to_string().cyan());
            Ok(())
        }
        TasksCommands::Edit {
            id,
            name,
            priority,
            due,
            assign,
        } => {
            let patch = TaskPatch {
                name,
                priority,
                due_date: due,
                assigned_to: assign,
                ..Default::default()
            };
            if patch == TaskPatch::default() {
                bail!("Nothing to update; pass at least one field");
            }
            let task = services.tasks.update(id, patch).await?;
            println!("{} Updated task {}", "✓".green(), task.id.to_string().cyan());
            Ok(())
        }
        TasksCommands::Complete { id } => {
            let task = services.tasks.mark_complete(id).await?;
            println!(
                "{} Completed {}",
                "✓".green(),
                or_dash(task.name.as_deref()).bold()
            );
            Ok(())
        }
        TasksCommands::Delete { id } => {
            services.tasks.delete(id).await?;
            println!("{} Deleted task {}", "✓".green(), id);
            Ok(())
        }
    }
}

async fn list_tasks(services: &Services, project: Option<i64>) -> Result<()> {
    let tasks = match project {
        Some(project_id) => services.tasks.get_by_project_id(project_id).await,
        None => services.tasks.get_all().await,
    }
    .or_sentinel("Error fetching tasks");

    if tasks.is_empty() {
        println!("{}", "No tasks found".yellow());
        return Ok(());
    }

    let mut table = new_table(vec!["ID", "Name", "Done", "Priority", "Due", "Project", "Assignee"]);
    for task in &tasks {
        table.add_row(vec![
            task.id.to_string(),
            truncate(&or_dash(task.name.as_deref()), 30),
            (if task.is_completed() { "yes" } else { "no" }).to_string(),
            or_dash(task.priority.as_deref()),
            format_date(task.due_date.as_deref()),
            id_or_dash(task.project_id),
            id_or_dash(task.assigned_to),
        ]);
    }

    println!("{}", table);
    let open = tasks.iter().filter(|t| !t.is_completed()).count();
    println!(
        "Total: {} tasks ({} open)",
        tasks.len().to_string().cyan(),
        open.to_string().yellow()
    );
    Ok(())
}
