use anyhow::{bail, Result};
use clap::Subcommand;
use colored::*;

use taskdeck_core::truncate;
use taskdeck_services::{NewProject, OrSentinel, Project, ProjectPatch, Services};

use super::utils::{format_date, id_or_dash, new_table, or_dash, parse_id};

#[derive(Subcommand)]
pub enum ProjectsCommands {
    /// List projects, optionally for one client
    List {
        #[arg(long, value_parser = parse_id)]
        client: Option<i64>,
    },
    /// Show project details with its tasks
    Show {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Add a new project
    Add {
        /// Project name
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_id)]
        client: Option<i64>,
        /// Defaults to Planning
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        deliverables: Option<String>,
        /// Create the project with chat turned off
        #[arg(long)]
        no_chat: bool,
    },
    /// Change fields of an existing project
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        chat: Option<bool>,
        #[arg(long, value_parser = parse_id)]
        client: Option<i64>,
    },
    /// Delete a project
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
}

pub async fn handle_projects_command(services: &Services, command: ProjectsCommands) -> Result<()> {
    match command {
        ProjectsCommands::List { client } => list_projects(services, client).await,
        ProjectsCommands::Show { id } => show_project(services, id).await,
        ProjectsCommands::Add {
            name,
            description,
            client,
            status,
            start_date,
            deadline,
            deliverables,
            no_chat,
        } => {
            let draft = NewProject {
                name: Some(name),
                description,
                status,
                deadline,
                deliverables,
                start_date,
                chat_enabled: no_chat.then_some(false),
                client_id: client,
            };
            let project = services.projects.create(draft).await?;
            println!("{} Created project {}", "✓".green(), project.id.to_string().cyan());
            Ok(())
        }
        ProjectsCommands::Edit {
            id,
            name,
            description,
            status,
            deadline,
            chat,
            client,
        } => {
            let patch = ProjectPatch {
                name,
                description,
                status,
                deadline,
                chat_enabled: chat,
                client_id: client,
                ..Default::default()
            };
            if patch == ProjectPatch::default() {
                bail!("Nothing to update; pass at least one field");
            }
            let project = services.projects.update(id, patch).await?;
            println!("{} Updated project {}", "✓".green(), project.id.to_string().cyan());
            Ok(())
        }
        ProjectsCommands::Delete { id } => {
            services.projects.delete(id).await?;
            println!("{} Deleted project {}", "✓".green(), id);
            Ok(())
        }
    }
}

async fn list_projects(services: &Services, client: Option<i64>) -> Result<()> {
    let projects = match client {
        Some(client_id) => services.projects.get_by_client_id(client_id).await,
        None => services.projects.get_all().await,
    }
    .or_sentinel("Error fetching projects");

    if projects.is_empty() {
        println!("{}", "No projects found".yellow());
        println!("{}", "Use 'taskdeck projects add' to create one".dimmed());
        return Ok(());
    }

    let mut table = new_table(vec!["ID", "Name", "Status", "Client", "Deadline", "Chat"]);
    for project in &projects {
        table.add_row(vec![
            project.id.to_string(),
            truncate(&or_dash(project.name.as_deref()), 30),
            or_dash(project.status.as_deref()),
            id_or_dash(project.client_id),
            format_date(project.deadline.as_deref()),
            chat_label(project),
        ]);
    }

    println!("{}", table);
    println!("Total: {} projects", projects.len().to_string().cyan());
    Ok(())
}

fn chat_label(project: &Project) -> String {
    match project.chat_enabled {
        Some(true) => "on".to_string(),
        Some(false) => "off".to_string(),
        None => or_dash(None),
    }
}

async fn show_project(services: &Services, id: i64) -> Result<()> {
    let Some(project) = services.projects.get_by_id(id).await? else {
        bail!("Project {} not found", id);
    };

    println!("{}", or_dash(project.name.as_deref()).blue().bold());
    println!("  Description:  {}", or_dash(project.description.as_deref()));
    println!("  Status:       {}", or_dash(project.status.as_deref()));
    println!("  Client:       {}", id_or_dash(project.client_id));
    println!("  Start date:   {}", format_date(project.start_date.as_deref()));
    println!("  Deadline:     {}", format_date(project.deadline.as_deref()));
    println!("  Deliverables: {}", or_dash(project.deliverables.as_deref()));
    println!("  Chat:         {}", chat_label(&project));

    let tasks = services
        .tasks
        .get_by_project_id(id)
        .await
        .or_sentinel("Error fetching project tasks");
    if !tasks.is_empty() {
        println!();
        println!("{}", "Tasks".bold());
        for task in tasks {
            let mark = if task.is_completed() { "✓".green() } else { "·".normal() };
            println!("  {} {} {}", mark, task.id.to_string().cyan(), or_dash(task.name.as_deref()));
        }
    }
    Ok(())
}
