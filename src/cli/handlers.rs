use std::error::Error;
use std::time::Duration;

use serde_json::json;

use crate::cli::commands::{Cli, Commands};
use crate::cli::output::{print_raw, print_task, print_tasks_json, print_tasks_plain};
use crate::config::Config;
use crate::model::{Task, normalize_record};
use crate::net::{ApiClient, UpdatePatch};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let config = Config::load()?;
    let base_url = config.base_url(cli.url.as_deref());

    let Some(command) = cli.command else {
        // main.rs routes the no-subcommand case to the TUI
        return Ok(());
    };

    if matches!(command, Commands::Url) {
        println!("{}", base_url);
        return Ok(());
    }

    let client = ApiClient::new(&base_url, Duration::from_secs(config.server.timeout_secs))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match command {
            Commands::List => cmd_list(&client, json).await,
            Commands::Add(args) => cmd_add(&client, &args.joined(), json).await,
            Commands::Toggle(args) => cmd_toggle(&client, &args.id, json).await,
            Commands::Done(args) => cmd_set_completed(&client, &args.id, true, json).await,
            Commands::Undone(args) => cmd_set_completed(&client, &args.id, false, json).await,
            Commands::Title(args) => cmd_title(&client, &args.id, &args.joined(), json).await,
            Commands::Delete(args) => cmd_delete(&client, &args.id, json).await,
            Commands::Url => Ok(()),
        }
    })
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

async fn cmd_list(client: &ApiClient, json: bool) -> Result<(), Box<dyn Error>> {
    let tasks = fetch_tasks(client).await?;
    if json {
        print_tasks_json(&tasks);
    } else {
        print_tasks_plain(&tasks);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

async fn cmd_add(client: &ApiClient, title: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let title = title.trim();
    if title.is_empty() {
        return Err("title must not be empty".into());
    }
    let record = client.create(title).await?;
    match normalize_record(&record) {
        Some(task) => print_task(&task, json),
        None => print_raw(&record),
    }
    Ok(())
}

async fn cmd_toggle(client: &ApiClient, id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    // flipping needs the current value, so fetch first
    let tasks = fetch_tasks(client).await?;
    let task = tasks
        .iter()
        .find(|t| t.id.as_remote() == Some(id))
        .ok_or_else(|| format!("task not found: {}", id))?;
    cmd_set_completed(client, id, !task.completed, json).await
}

async fn cmd_set_completed(
    client: &ApiClient,
    id: &str,
    completed: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let record = client
        .update(id, &UpdatePatch::completed(completed))
        .await?;
    match normalize_record(&record) {
        Some(task) => print_task(&task, json),
        None => print_raw(&record),
    }
    Ok(())
}

async fn cmd_title(
    client: &ApiClient,
    id: &str,
    title: &str,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let title = title.trim();
    if title.is_empty() {
        return Err("title must not be empty".into());
    }
    let record = client.update(id, &UpdatePatch::title(title)).await?;
    match normalize_record(&record) {
        Some(task) => print_task(&task, json),
        None => print_raw(&record),
    }
    Ok(())
}

async fn cmd_delete(client: &ApiClient, id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    client.delete(id).await?;
    if json {
        println!("{}", json!({ "deleted": id }));
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}

async fn fetch_tasks(client: &ApiClient) -> Result<Vec<Task>, Box<dyn Error>> {
    let records = client.list().await?;
    Ok(records.iter().filter_map(normalize_record).collect())
}
