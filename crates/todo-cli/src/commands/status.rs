//! Status command handler

use anyhow::Result;
use todo_core::{Config, TodoRequest, TodoResponse};

use super::open_backend;
use crate::output::{Output, OutputFormat};

/// Show session mode, locations and the todo count
pub async fn show(config: &Config, output: &Output) -> Result<()> {
    let mut backend = open_backend(config)?;
    let mode = if backend.is_remote() { "remote" } else { "local" };

    // A failed fetch is reported, not fatal
    let (count, fetch_error) = match backend.execute(TodoRequest::List).await {
        Ok(TodoResponse::Listed(todos)) => (Some(todos.len()), None),
        Ok(_) => (None, None),
        Err(e) => (None, Some(e.to_string())),
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "mode": mode,
                    "logged_in": backend.is_remote(),
                    "api_url": config.api_url,
                    "data_dir": config.data_dir,
                    "todos": count,
                    "error": fetch_error
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", mode);
        }
        OutputFormat::Human => {
            println!("Todo Status");
            println!("===========");
            println!();
            println!("Session:");
            println!(
                "  Mode:   {}",
                if backend.is_remote() {
                    "logged in (todos on server)"
                } else {
                    "not logged in (local todos)"
                }
            );
            println!("  Server: {}", config.api_url);
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!();
            println!("Contents:");
            match (count, fetch_error) {
                (Some(n), _) => println!("  Todos: {}", n),
                (None, Some(e)) => println!("  Todos: unavailable ({})", e),
                (None, None) => println!("  Todos: unknown"),
            }
        }
    }

    Ok(())
}
