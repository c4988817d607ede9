// ABOUTME: `taskdeck chat` subcommands
// ABOUTME: Channels, channel messages, threads, search, and mention extraction

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::*;

use taskdeck_services::{
    extract_mentions, ChannelType, ChatMessage, ChatMessagePatch, NewChannel, NewChatMessage,
    OrSentinel, Services,
};

use super::utils::{new_table, or_dash, parse_channel, parse_id};

#[derive(Subcommand)]
pub enum ChatCommands {
    /// List channels of one type
    Channels {
        #[arg(long = "type", value_parser = parse_channel, default_value = "team")]
        channel_type: ChannelType,
    },
    /// Create a channel
    CreateChannel {
        name: String,
        #[arg(long = "type", value_parser = parse_channel, default_value = "team")]
        channel_type: ChannelType,
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show the messages of a channel, oldest first
    Messages {
        #[arg(long = "type", value_parser = parse_channel, default_value = "team")]
        channel_type: ChannelType,
        /// Only used for project channels
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
    },
    /// Post a message
    Post {
        content: String,
        #[arg(long = "type", value_parser = parse_channel, default_value = "team")]
        channel_type: ChannelType,
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
        /// Reply to this message (posts into its thread)
        #[arg(long, value_parser = parse_id)]
        reply_to: Option<i64>,
        #[arg(long, value_parser = parse_id)]
        author: Option<i64>,
    },
    /// Show replies to a message
    Thread {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Search message content within a channel
    Search {
        query: String,
        #[arg(long = "type", value_parser = parse_channel, default_value = "team")]
        channel_type: ChannelType,
        #[arg(long, value_parser = parse_id)]
        project: Option<i64>,
    },
    /// Replace the content of a message
    Edit {
        #[arg(value_parser = parse_id)]
        id: i64,
        content: String,
    },
    /// Delete a message
    Delete {
        #[arg(value_parser = parse_id)]
        id: i64,
    },
    /// Print the @mentions found in a piece of text
    Mentions { text: String },
}

pub async fn handle_chat_command(services: &Services, command: ChatCommands) -> Result<()> {
    let chat = &services.chat;
    match command {
        ChatCommands::Channels { channel_type } => {
            let channels = chat
                .get_channels_by_type(channel_type)
                .await
                .or_sentinel("Error fetching channels");
            if channels.is_empty() {
                println!("{}", format!("No {} channels found", channel_type).yellow());
                return Ok(());
            }
            let mut table = new_table(vec!["ID", "Name", "Members", "Description"]);
            for channel in &channels {
                table.add_row(vec![
                    channel.id.to_string(),
                    or_dash(channel.name.as_deref()),
                    channel.member_count.unwrap_or_default().to_string(),
                    or_dash(channel.description.as_deref()),
                ]);
            }
            println!("{}", table);
            Ok(())
        }
        ChatCommands::CreateChannel {
            name,
            channel_type,
            project,
            description,
        } => {
            let channel = chat
                .create_channel(NewChannel {
                    name: Some(name),
                    channel_type: Some(channel_type),
                    project_id: project,
                    member_count: None,
                    description,
                })
                .await?;
            println!("{} Created channel {}", "✓".green(), channel.id.to_string().cyan());
            Ok(())
        }
        ChatCommands::Messages {
            channel_type,
            project,
        } => {
            let messages = chat
                .get_messages_by_channel(project, channel_type)
                .await
                .or_sentinel("Error fetching messages by channel");
            print_messages(&messages);
            Ok(())
        }
        ChatCommands::Post {
            content,
            channel_type,
            project,
            reply_to,
            author,
        } => {
            let channel_type = if reply_to.is_some() {
                ChannelType::Thread
            } else {
                channel_type
            };
            let message = chat
                .create(NewChatMessage {
                    name: None,
                    content: Some(content),
                    channel_type: Some(channel_type),
                    parent_id: reply_to,
                    author_id: author,
                    project_id: project,
                })
                .await?;
            println!("{} Posted message {}", "✓".green(), message.id.to_string().cyan());
            let mentions = message.mentions();
            if !mentions.is_empty() {
                println!("  Mentioned: {}", mentions.join(", ").magenta());
            }
            Ok(())
        }
        ChatCommands::Thread { id } => {
            let Some(root) = chat.get_by_id(id).await? else {
                bail!("Message {} not found", id);
            };
            print_messages(std::slice::from_ref(&root));
            let replies = chat
                .get_thread_replies(id)
                .await
                .or_sentinel("Error fetching thread replies");
            for reply in &replies {
                println!("  ↳ {}", format_message(reply));
            }
            Ok(())
        }
        ChatCommands::Search {
            query,
            channel_type,
            project,
        } => {
            let found = chat
                .search_messages(&query, channel_type, project)
                .await
                .or_sentinel("Error searching messages");
            print_messages(&found);
            Ok(())
        }
        ChatCommands::Edit { id, content } => {
            let message = chat
                .update(
                    id,
                    ChatMessagePatch {
                        name: None,
                        content: Some(content),
                    },
                )
                .await?;
            println!("{} Edited message {}", "✓".green(), message.id.to_string().cyan());
            Ok(())
        }
        ChatCommands::Delete { id } => {
            chat.delete(id).await?;
            println!("{} Deleted message {}", "✓".green(), id);
            Ok(())
        }
        ChatCommands::Mentions { text } => {
            for mention in extract_mentions(&text) {
                println!("{}", mention);
            }
            Ok(())
        }
    }
}

fn format_message(message: &ChatMessage) -> String {
    let when = message
        .created_at
        .as_deref()
        .and_then(|c| c.get(..16))
        .map(|c| c.replace('T', " "))
        .unwrap_or_default();
    format!(
        "{} {} {}",
        format!("[{}]", message.id).dimmed(),
        when.dimmed(),
        or_dash(message.content.as_deref())
    )
}

fn print_messages(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!("{}", "No messages found".yellow());
        return;
    }
    for message in messages {
        println!("{}", format_message(message));
    }
}
