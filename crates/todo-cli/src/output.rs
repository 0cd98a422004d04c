//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use todo_core::Todo;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - ids only
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single todo
    pub fn print_todo(&self, todo: &Todo) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", todo.id);
                println!("Title:       {}", todo.title);
                if let Some(desc) = todo.description_text() {
                    println!("Description: {}", desc);
                }
                println!("Status:      {}", status_label(todo));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(todo)?);
            }
            OutputFormat::Quiet => {
                println!("{}", todo.id);
            }
        }
        Ok(())
    }

    /// Print a list of todos
    pub fn print_todos(&self, todos: &[Todo]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if todos.is_empty() {
                    println!("No todos yet.");
                    return Ok(());
                }
                for todo in todos {
                    let line = format!(
                        "{:>13}  {}  {}",
                        todo.id,
                        checkbox(todo),
                        truncate(&todo.title, 40)
                    );
                    match todo.description_text() {
                        Some(desc) => println!("{}  ({})", line, truncate_line(desc, 30)),
                        None => println!("{}", line),
                    }
                }
                let done = todos.iter().filter(|t| t.completed).count();
                println!("\n{} todo(s), {} done", todos.len(), done);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(todos)?);
            }
            OutputFormat::Quiet => {
                for todo in todos {
                    println!("{}", todo.id);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn checkbox(todo: &Todo) -> &'static str {
    if todo.completed {
        "[x]"
    } else {
        "[ ]"
    }
}

fn status_label(todo: &Todo) -> &'static str {
    if todo.completed {
        "done"
    } else {
        "open"
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
