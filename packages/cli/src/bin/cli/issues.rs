// ABOUTME: `taskdeck issues` subcommands
// ABOUTME: Issue CRUD, title search with filters, and the reference option lists

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::*;

use taskdeck_core::truncate;
use taskdeck_services::{
    Issue, IssueFilters, IssuePatch, NewIssue, OrSentinel, ReferenceOption, Services,
    ENVIRONMENTS, ISSUE_TYPES, PRIORITY_LEVELS, STATUS_WORKFLOW,
};

use super::utils::{format_date, id_or_dash, new_table, or_dash, parse_id};

#[derive(Subcommand)]
pub enum IssuesCommands {
    /// List all issues, newest first
    List,
    /// Search issue titles; "all" disables a filter
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long = "type")]
        issue_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Show issue details
    Show {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// File a new issue
    Add {
        /// Issue title
        title: String,
        #[arg(long = "type")]
        issue_type: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        environment: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        reporter: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
    },
    /// Change fields of an existing issue
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Delete an issue
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Print the allowed types, priorities, statuses, and environments
    Options,
}

pub async fn handle_issues_command(services: &Services, command: IssuesCommands) -> Result<()> {
    match command {
        IssuesCommands::List => {
            let issues = services
                .issues
                .get_all()
                .await
                .or_sentinel("Error fetching issues");
            print_issues(&issues);
            Ok(())
        }
        IssuesCommands::Search {
            query,
            issue_type,
            status,
            priority,
        } => {
            let filters = IssueFilters {
                issue_type,
                status,
                priority,
            };
            let issues = services
                .issues
                .search_issues(&query, &filters)
                .await
                .or_sentinel("Error searching issues");
            print_issues(&issues);
            Ok(())
        }
        IssuesCommands::Show { id } => match services.issues.get_by_id(id).await? {
            Some(issue) => {
                print_issue(&issue);
                Ok(())
            }
            None => bail!("Issue {} not found", id),
        },
        IssuesCommands::Add {
            title,
            issue_type,
            priority,
            status,
            environment,
            description,
            reporter,
            assignee,
            due,
            project,
        } => {
            let issue = services
                .issues
                .create(NewIssue {
                    name: None,
                    title: Some(title),
                    issue_type,
                    description,
                    priority,
                    status,
                    reporter,
                    assignee,
                    environment,
                    due_date: due,
                    project_id: project,
                })
                .await?;
            println!("{} Filed issue {}", "✓".green(), issue.id.to_string().cyan());
            Ok(())
        }
        IssuesCommands::Edit {
            id,
            title,
            status,
            priority,
            assignee,
        } => {
            let patch = IssuePatch {
                title,
                status,
                priority,
                assignee,
                ..Default::default()
            };
            if patch == IssuePatch::default() {
                bail!("Nothing to update; pass at least one field");
            }
            let issue = services.issues.update(id, patch).await?;
            println!("{} Updated issue {}", "✓".green(), issue.id.to_string().cyan());
            Ok(())
        }
        IssuesCommands::Delete { id } => {
            services.issues.remove(id).await?;
            println!("{} Deleted issue {}", "✓".green(), id);
            Ok(())
        }
        IssuesCommands::Options => {
            print_options("Types", ISSUE_TYPES);
            print_options("Priorities", PRIORITY_LEVELS);
            print_options("Statuses", STATUS_WORKFLOW);
            print_options("Environments", ENVIRONMENTS);
            Ok(())
        }
    }
}

fn print_options(title: &str, options: &[ReferenceOption]) {
    let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
    println!("{:<13} {}", format!("{}:", title).bold(), labels.join(", "));
}

fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        println!("{}", "No issues found".yellow());
        return;
    }

    let mut table = new_table(vec!["ID", "Title", "Type", "Priority", "Status", "Project", "Created"]);
    for issue in issues {
        table.add_row(vec![
            issue.id.to_string(),
            truncate(&or_dash(issue.title.as_deref()), 40),
            or_dash(issue.issue_type.as_deref()),
            or_dash(issue.priority.as_deref()),
            or_dash(issue.status.as_deref()),
            id_or_dash(issue.project_id),
            format_date(issue.created_at.as_deref()),
        ]);
    }
    println!("{}", table);
    println!("Total: {} issues", issues.len().to_string().cyan());
}

fn print_issue(issue: &Issue) {
    println!(
        "{} {}",
        format!("#{}", issue.id).dimmed(),
        or_dash(issue.title.as_deref()).blue().bold()
    );
    println!("  Type:        {}", or_dash(issue.issue_type.as_deref()));
    println!("  Priority:    {}", or_dash(issue.priority.as_deref()));
    println!("  Status:      {}", or_dash(issue.status.as_deref()));
    println!("  Environment: {}", or_dash(issue.environment.as_deref()));
    println!("  Reporter:    {}", or_dash(issue.reporter.as_deref()));
    println!("  Assignee:    {}", or_dash(issue.assignee.as_deref()));
    println!("  Due:         {}", format_date(issue.due_date.as_deref()));
    println!("  Project:     {}", id_or_dash(issue.project_id));
    println!("  Updated:     {}", format_date(issue.updated_at.as_deref()));
    if let Some(description) = issue.description.as_deref() {
        println!();
        println!("{}", description);
    }
}
