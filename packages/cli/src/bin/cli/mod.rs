pub mod chat;
pub mod clients;
pub mod config;
pub mod issues;
pub mod projects;
pub mod tasks;
pub mod time;
pub mod utils;
