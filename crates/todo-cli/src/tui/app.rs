//! Application state and key handling
//!
//! Wraps the core `TodoApp` view model with what only a terminal needs:
//! which input has focus, the help overlay and the quit flag.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use todo_core::view::{AuthPanel, TextInput};
use todo_core::{Screen, Task, TaskResult, TodoApp};

/// Which widget receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    LoginEmail,
    LoginPassword,
    RegisterEmail,
    RegisterPassword,
    RegisterConfirm,
    TodoTitle,
    TodoDescription,
}

impl Focus {
    /// Tab order for a screen
    fn order(screen: Screen) -> &'static [Focus] {
        match screen {
            Screen::Authenticated => &[Focus::List, Focus::TodoTitle, Focus::TodoDescription],
            Screen::Unauthenticated(AuthPanel::Login) => &[
                Focus::List,
                Focus::TodoTitle,
                Focus::TodoDescription,
                Focus::LoginEmail,
                Focus::LoginPassword,
            ],
            Screen::Unauthenticated(AuthPanel::Register) => &[
                Focus::List,
                Focus::TodoTitle,
                Focus::TodoDescription,
                Focus::RegisterEmail,
                Focus::RegisterPassword,
                Focus::RegisterConfirm,
            ],
        }
    }

    /// Whether key presses go into a text input
    pub fn is_input(self) -> bool {
        self != Focus::List
    }
}

/// Application state
pub struct App {
    /// View model
    pub todo: TodoApp,
    /// Focused widget
    pub focus: Focus,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    pub fn new(todo: TodoApp) -> Self {
        Self {
            todo,
            focus: Focus::List,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn next_focus(&mut self) {
        let order = Focus::order(self.todo.screen());
        let index = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(index + 1) % order.len()];
    }

    pub fn prev_focus(&mut self) {
        let order = Focus::order(self.todo.screen());
        let index = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(index + order.len() - 1) % order.len()];
    }

    /// Move focus back to the list if the current target is gone
    fn fix_focus(&mut self) {
        if !Focus::order(self.todo.screen()).contains(&self.focus) {
            self.focus = Focus::List;
        }
    }

    /// The focused text input, if any
    pub fn input_mut(&mut self) -> Option<&mut TextInput> {
        let todo = &mut self.todo;
        match self.focus {
            Focus::List => None,
            Focus::LoginEmail => Some(&mut todo.login.email),
            Focus::LoginPassword => Some(&mut todo.login.password),
            Focus::RegisterEmail => Some(&mut todo.register.email),
            Focus::RegisterPassword => Some(&mut todo.register.password),
            Focus::RegisterConfirm => Some(&mut todo.register.confirm),
            Focus::TodoTitle => Some(&mut todo.todo_form.title),
            Focus::TodoDescription => Some(&mut todo.todo_form.description),
        }
    }

    /// Handle a key press; returns tasks to spawn
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<Vec<Task>> {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(Vec::new());
        }

        // If help is showing, any key dismisses it
        if self.show_help {
            self.show_help = false;
            return Ok(Vec::new());
        }

        match code {
            KeyCode::Tab => {
                self.next_focus();
                return Ok(Vec::new());
            }
            KeyCode::BackTab => {
                self.prev_focus();
                return Ok(Vec::new());
            }
            _ => {}
        }

        if self.focus.is_input() {
            self.handle_input_key(code)
        } else {
            self.handle_list_key(code)
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) -> Result<Vec<Task>> {
        match code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Esc => self.focus = Focus::List,
            KeyCode::Backspace => {
                if let Some(input) = self.input_mut() {
                    input.backspace();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.input_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }
        Ok(Vec::new())
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Result<Vec<Task>> {
        let task = match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.todo.todos().len();
                self.todo.list.select_next(len);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.todo.list.select_previous();
                None
            }
            KeyCode::Char(' ') => self.todo.toggle_selected()?,
            KeyCode::Char('d') => self.todo.delete_selected()?,
            KeyCode::Char('r') => self.todo.refresh()?,
            KeyCode::Char('a') => {
                self.focus = Focus::TodoTitle;
                None
            }
            KeyCode::Char('l') if !self.todo.is_authenticated() => {
                self.todo.toggle_auth_panel();
                self.focus = match self.todo.auth_panel() {
                    AuthPanel::Login => Focus::LoginEmail,
                    AuthPanel::Register => Focus::RegisterEmail,
                };
                None
            }
            KeyCode::Char('L') if self.todo.is_authenticated() => {
                self.todo.logout()?;
                self.fix_focus();
                None
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                None
            }
            _ => None,
        };
        Ok(task.into_iter().collect())
    }

    /// Submit the form that owns the focused input
    fn submit(&mut self) -> Result<Vec<Task>> {
        let task = match self.focus {
            Focus::LoginEmail | Focus::LoginPassword => self.todo.submit_login(),
            Focus::RegisterEmail | Focus::RegisterPassword | Focus::RegisterConfirm => {
                self.todo.submit_register()
            }
            Focus::TodoTitle | Focus::TodoDescription => self.todo.submit_todo()?,
            Focus::List => None,
        };
        Ok(task.into_iter().collect())
    }

    /// Feed a finished task back to the view model
    pub fn complete(&mut self, result: TaskResult) -> Result<Vec<Task>> {
        let tasks = self.todo.complete(result)?;
        self.fix_focus();
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use todo_core::{HttpClient, MemoryStore};

    fn test_app() -> App {
        let http = HttpClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let todo =
            TodoApp::with_store(http, Arc::new(MemoryStore::new()), Duration::from_secs(3))
                .unwrap();
        App::new(todo)
    }

    fn press(app: &mut App, code: KeyCode) -> Vec<Task> {
        app.handle_key(code, KeyModifiers::NONE).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_tab_cycles_signed_out_focus() {
        let mut app = test_app();
        let mut seen = vec![app.focus];
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
            seen.push(app.focus);
        }
        assert_eq!(
            seen,
            vec![
                Focus::List,
                Focus::TodoTitle,
                Focus::TodoDescription,
                Focus::LoginEmail,
                Focus::LoginPassword,
                Focus::List
            ]
        );

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::LoginPassword);
    }

    #[test]
    fn test_add_local_todo_from_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus, Focus::TodoTitle);

        // 'q' is text while an input is focused
        type_text(&mut app, "Buy quinoa");
        let tasks = press(&mut app, KeyCode::Enter);

        assert!(tasks.is_empty());
        assert!(!app.should_quit);
        assert_eq!(app.todo.todos().len(), 1);
        assert_eq!(app.todo.todos()[0].title, "Buy quinoa");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.todo.todos()[0].completed);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.todo.todos().is_empty());
    }

    #[test]
    fn test_login_submit_returns_task() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.focus, Focus::LoginEmail);

        type_text(&mut app, "ada@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "pw");
        let tasks = press(&mut app, KeyCode::Enter);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name(), "login");
        assert!(app.todo.login.submitting);
    }

    #[test]
    fn test_register_panel_toggle() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.focus, Focus::RegisterEmail);

        type_text(&mut app, "ada@example.com");
        let tasks = press(&mut app, KeyCode::Enter);
        assert!(tasks.is_empty());
        assert_eq!(
            app.todo.register.error.as_deref(),
            Some("Please fill in all fields")
        );
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = test_app();
        app.focus = Focus::TodoTitle;
        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL)
            .unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_swallows_next_key() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}
