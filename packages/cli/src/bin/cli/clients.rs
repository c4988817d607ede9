// ABOUTME: `taskdeck clients` subcommands
// ABOUTME: List, show, add, edit, and delete client records

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::*;

use taskdeck_core::truncate;
use taskdeck_services::{Client, ClientPatch, NewClient, OrSentinel, Services};

use super::utils::{format_date, new_table, or_dash, parse_id};

#[derive(Subcommand)]
pub enum ClientsCommands {
    /// List all clients
    List,
    /// Show client details
    Show {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Add a new client
    Add {
        /// Client name
        name: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        /// Defaults to Active
        #[arg(long)]
        status: Option<String>,
    },
    /// Change fields of an existing client
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a client
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
}

pub async fn handle_clients_command(services: &Services, command: ClientsCommands) -> Result<()> {
    match command {
        ClientsCommands::List => list_clients(services).await,
        ClientsCommands::Show { id } => show_client(services, id).await,
        ClientsCommands::Add {
            name,
            company,
            email,
            phone,
            website,
            address,
            industry,
            status,
        } => {
            let draft = NewClient {
                name: Some(name),
                company,
                email,
                phone,
                website,
                address,
                industry,
                status,
            };
            let client = services.clients.create(draft).await?;
            println!("{} Created client {}", "✓".green(), client.id.to_string().cyan());
            print_client(&client);
            Ok(())
        }
        ClientsCommands::Edit {
            id,
            name,
            company,
            email,
            phone,
            status,
        } => {
            let patch = ClientPatch {
                name,
                company,
                email,
                phone,
                status,
                ..Default::default()
            };
            if patch == ClientPatch::default() {
                bail!("Nothing to update; pass at least one field");
            }
            let client = services.clients.update(id, patch).await?;
            println!("{} Updated client {}", "✓".green(), client.id.to_string().cyan());
            Ok(())
        }
        ClientsCommands::Delete { id } => {
            services.clients.delete(id).await?;
            println!("{} Deleted client {}", "✓".green(), id);
            Ok(())
        }
    }
}

async fn list_clients(services: &Services) -> Result<()> {
    let clients = services
        .clients
        .get_all()
        .await
        .or_sentinel("Error fetching clients");

    if clients.is_empty() {
        println!("{}", "No clients found".yellow());
        return Ok(());
    }

    let mut table = new_table(vec!["ID", "Name", "Company", "Email", "Status", "Created"]);
    for client in &clients {
        table.add_row(vec![
            client.id.to_string(),
            truncate(&or_dash(client.name.as_deref()), 25),
            truncate(&or_dash(client.company.as_deref()), 25),
            or_dash(client.email.as_deref()),
            or_dash(client.status.as_deref()),
            format_date(client.created_at.as_deref()),
        ]);
    }

    println!("{}", table);
    println!("Total: {} clients", clients.len().to_string().cyan());
    Ok(())
}

async fn show_client(services: &Services, id: i64) -> Result<()> {
    match services.clients.get_by_id(id).await? {
        Some(client) => {
            print_client(&client);
            let projects = services
                .projects
                .get_by_client_id(id)
                .await
                .or_sentinel("Error fetching client projects");
            if !projects.is_empty() {
                println!();
                println!("{}", "Projects".bold());
                for project in projects {
                    println!("  {} {}", project.id.to_string().cyan(), or_dash(project.name.as_deref()));
                }
            }
            Ok(())
        }
        None => bail!("Client {} not found", id),
    }
}

fn print_client(client: &Client) {
    println!("{}", or_dash(client.name.as_deref()).blue().bold());
    println!("  Company:  {}", or_dash(client.company.as_deref()));
    println!("  Email:    {}", or_dash(client.email.as_deref()));
    println!("  Phone:    {}", or_dash(client.phone.as_deref()));
    println!("  Website:  {}", or_dash(client.website.as_deref()));
    println!("  Address:  {}", or_dash(client.address.as_deref()));
    println!("  Industry: {}", or_dash(client.industry.as_deref()));
    println!("  Status:   {}", or_dash(client.status.as_deref()));
    println!("  Created:  {}", format_date(client.created_at.as_deref()));
}
