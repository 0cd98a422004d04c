//! Login, registration and logout

use anyhow::{anyhow, bail, Context, Result};
use todo_core::{Config, TodoApp};

use super::explain;
use crate::output::Output;
use crate::prompt::{prompt, prompt_secret};

fn open_app(config: &Config) -> Result<TodoApp> {
    TodoApp::open(config)
        .map_err(explain)
        .context("Failed to open todo data")
}

/// Log in and persist the session
pub async fn login(
    config: &Config,
    email: Option<String>,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut app = open_app(config)?;
    if app.is_authenticated() {
        bail!("Already logged in. Run `todo logout` first.");
    }

    app.login.email.set(fill(email, "Email", false)?);
    app.login.password.set(fill(password, "Password", true)?);

    let task = app
        .submit_login()
        .ok_or_else(|| anyhow!(app.login.error.clone().unwrap_or_default()))?;
    app.drive(task).await.map_err(|e| explain(e.into()))?;

    if let Some(err) = app.login.error.take() {
        bail!(err);
    }

    output.success("Logged in");
    report_list(&app, output);
    Ok(())
}

/// Create an account, then log in with it
pub async fn register(
    config: &Config,
    email: Option<String>,
    password: Option<String>,
    confirm: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut app = open_app(config)?;
    if app.is_authenticated() {
        bail!("Already logged in. Run `todo logout` first.");
    }

    app.register.email.set(fill(email, "Email", false)?);
    app.register.password.set(fill(password, "Password", true)?);
    app.register
        .confirm
        .set(fill(confirm, "Confirm password", true)?);

    let task = app
        .submit_register()
        .ok_or_else(|| anyhow!(app.register.error.clone().unwrap_or_default()))?;
    app.drive(task).await.map_err(|e| explain(e.into()))?;

    if let Some(err) = app.register.error.take() {
        bail!(err);
    }
    if let Some(err) = app.login.error.take() {
        bail!("Registered, but login failed: {}", err);
    }

    output.success("Registered and logged in");
    report_list(&app, output);
    Ok(())
}

/// Forget the session; local todos are kept
pub fn logout(config: &Config, output: &Output) -> Result<()> {
    let mut app = open_app(config)?;
    if !app.is_authenticated() {
        output.message("Not logged in.");
        return Ok(());
    }

    app.logout()
        .map_err(|e| explain(e.into()))
        .context("Failed to clear session")?;
    output.success("Logged out");
    Ok(())
}

/// Use a flag value, or ask for it
fn fill(value: Option<String>, label: &str, secret: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if secret => prompt_secret(label),
        None => prompt(label),
    }
}

fn report_list(app: &TodoApp, output: &Output) {
    match &app.list.error {
        Some(err) => output.message(&format!("Could not load todos: {}", err)),
        None => output.message(&format!("{} todo(s) on {}", app.todos().len(), app.api_url())),
    }
}
