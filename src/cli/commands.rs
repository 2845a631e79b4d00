use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tt", about = concat!("[~] tether v", env!("CARGO_PKG_VERSION"), " - your todo list lives on a server"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Base URL of the task service (overrides config and TETHER_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all tasks
    List,
    /// Add a task
    Add(TitleArgs),
    /// Flip a task's completion
    Toggle(IdArgs),
    /// Mark a task done
    Done(IdArgs),
    /// Mark a task not done
    Undone(IdArgs),
    /// Change a task's title
    Title(RetitleArgs),
    /// Delete a task
    Delete(IdArgs),
    /// Print the effective service URL
    Url,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Task title (words are joined with spaces)
    #[arg(required = true)]
    pub title: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task identifier as assigned by the service
    pub id: String,
}

#[derive(Args)]
pub struct RetitleArgs {
    /// Task identifier as assigned by the service
    pub id: String,
    /// New title (words are joined with spaces)
    #[arg(required = true)]
    pub title: Vec<String>,
}

impl TitleArgs {
    pub fn joined(&self) -> String {
        self.title.join(" ")
    }
}

impl RetitleArgs {
    pub fn joined(&self) -> String {
        self.title.join(" ")
    }
}
