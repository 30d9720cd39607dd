use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "orm-tutor")]
#[command(version, about = "Users, items and stocks over actix-web and diesel")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Commands {
    /// Drop and recreate every table, then exit
    InitDb,

    /// Start the HTTP server (the default)
    Serve,
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
