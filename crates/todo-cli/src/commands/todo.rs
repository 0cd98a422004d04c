//! Todo command handlers
//!
//! Every command runs against the active list: the todo service when
//! logged in, the local store otherwise.

use anyhow::{bail, Result};
use todo_core::validation::validate_title;
use todo_core::{Config, Todo, TodoBackend, TodoRequest, TodoResponse};

use super::{explain, open_backend};
use crate::output::Output;
use crate::prompt::confirm;

async fn run(backend: &mut TodoBackend, request: TodoRequest) -> Result<TodoResponse> {
    backend.execute(request).await.map_err(explain)
}

/// Create a todo
pub async fn add(
    config: &Config,
    title: String,
    description: Option<String>,
    output: &Output,
) -> Result<()> {
    validate_title(&title)?;

    let mut backend = open_backend(config)?;
    let request = TodoRequest::Create {
        title: title.trim().to_string(),
        description,
    };

    let TodoResponse::Created(todo) = run(&mut backend, request).await? else {
        bail!("Unexpected response to create");
    };

    output.success(&format!("Created todo {}", todo.id));
    output.print_todo(&todo)
}

/// List the active todos
pub async fn list(config: &Config, output: &Output) -> Result<()> {
    let mut backend = open_backend(config)?;
    let TodoResponse::Listed(todos) = run(&mut backend, TodoRequest::List).await? else {
        bail!("Unexpected response to list");
    };
    output.print_todos(&todos)
}

/// Show a single todo
pub async fn show(config: &Config, id: i64, output: &Output) -> Result<()> {
    let mut backend = open_backend(config)?;
    let todo = fetch(&mut backend, id).await?;
    output.print_todo(&todo)
}

/// Mark a todo done or not done
pub async fn set_completed(
    config: &Config,
    id: i64,
    completed: bool,
    output: &Output,
) -> Result<()> {
    let mut backend = open_backend(config)?;
    let response = run(&mut backend, TodoRequest::SetCompleted { id, completed }).await?;

    let TodoResponse::Updated { todo: Some(todo), .. } = response else {
        bail!("Todo not found: {}", id);
    };

    let verb = if completed { "Completed" } else { "Reopened" };
    output.success(&format!("{} todo {}", verb, todo.id));
    output.print_todo(&todo)
}

/// Delete a todo
pub async fn delete(config: &Config, id: i64, yes: bool, output: &Output) -> Result<()> {
    let mut backend = open_backend(config)?;

    if output.should_prompt() && !yes {
        let todo = fetch(&mut backend, id).await?;
        println!("Delete todo: {} - {}", todo.id, todo.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match run(&mut backend, TodoRequest::Delete { id }).await? {
        TodoResponse::Deleted { removed: true, .. } => {
            output.success(&format!("Deleted todo {}", id));
            Ok(())
        }
        _ => bail!("Todo not found: {}", id),
    }
}

async fn fetch(backend: &mut TodoBackend, id: i64) -> Result<Todo> {
    match run(backend, TodoRequest::Get { id }).await? {
        TodoResponse::Fetched(Some(todo)) => Ok(todo),
        _ => bail!("Todo not found: {}", id),
    }
}
