//! UI-agnostic view model
//!
//! `TodoApp` owns the forms, the list state, the session and the active
//! backend. User actions return `Task`s instead of awaiting the network
//! themselves; whoever drives the UI runs each task and hands the
//! `TaskResult` back to `complete`, which may return follow-up tasks.
//!
//! Every task records the session generation it was issued under. Login
//! and logout bump the generation, and results from an older generation
//! are dropped, so a late response can never touch the wrong list.

pub mod banner;
pub mod forms;
pub mod list;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::api::{ApiError, AuthClient, HttpClient, TodoClient};
use crate::backend::{Dispatch, TodoBackend};
use crate::config::Config;
use crate::error::Result;
use crate::models::Todo;
use crate::request::{TodoRequest, TodoResponse};
use crate::session::SessionStore;
use crate::storage::{FileStore, SharedStore, StorageResult};
use crate::validation::{validate_login, validate_registration, validate_title};

pub use banner::{Banner, BannerKind};
pub use forms::{LoginForm, RegisterForm, TextInput, TodoForm};
pub use list::TodoList;

pub const LOGGED_IN: &str = "Logged in";
pub const LOGGED_OUT: &str = "Logged out";
pub const REGISTERED: &str = "Registration successful";
pub const TODO_CREATED: &str = "Todo created";

/// Which auth form is shown while signed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPanel {
    #[default]
    Login,
    Register,
}

/// Top-level view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Signed out: auth panel plus the local list
    Unauthenticated(AuthPanel),
    /// Signed in: the remote list
    Authenticated,
}

/// A self-contained network operation issued by the view model
#[derive(Debug)]
pub struct Task {
    generation: u64,
    kind: TaskKind,
}

#[derive(Debug)]
enum TaskKind {
    Login {
        auth: AuthClient,
        email: String,
        password: String,
        after_register: bool,
    },
    Register {
        auth: AuthClient,
        email: String,
        password: String,
    },
    Todo {
        client: TodoClient,
        request: TodoRequest,
    },
}

impl Task {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match &self.kind {
            TaskKind::Login { .. } => "login",
            TaskKind::Register { .. } => "register",
            TaskKind::Todo { request, .. } => request.name(),
        }
    }

    /// Perform the network call
    pub async fn run(self) -> TaskResult {
        let outcome = match self.kind {
            TaskKind::Login {
                auth,
                email,
                password,
                after_register,
            } => {
                let result = auth.login(&email, &password).await;
                Outcome::LoggedIn {
                    email,
                    after_register,
                    result,
                }
            }
            TaskKind::Register {
                auth,
                email,
                password,
            } => {
                let result = auth.register(&email, &password).await;
                Outcome::Registered {
                    email,
                    password,
                    result,
                }
            }
            TaskKind::Todo { client, request } => {
                let result = client.execute(request.clone()).await;
                Outcome::Todo { request, result }
            }
        };

        TaskResult {
            generation: self.generation,
            outcome,
        }
    }
}

/// The result of running a `Task`
#[derive(Debug)]
pub struct TaskResult {
    generation: u64,
    outcome: Outcome,
}

impl TaskResult {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
enum Outcome {
    LoggedIn {
        email: String,
        after_register: bool,
        result: std::result::Result<String, ApiError>,
    },
    Registered {
        email: String,
        password: String,
        result: std::result::Result<(), ApiError>,
    },
    Todo {
        request: TodoRequest,
        result: std::result::Result<TodoResponse, ApiError>,
    },
}

/// View model for the whole client
pub struct TodoApp {
    http: HttpClient,
    store: SharedStore,
    sessions: SessionStore,
    backend: TodoBackend,
    generation: u64,
    auth_panel: AuthPanel,
    banner: Option<Banner>,
    banner_ttl: Duration,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub todo_form: TodoForm,
    pub list: TodoList,
}

impl TodoApp {
    /// Open the data directory and service client described by `config`
    ///
    /// Call `mount()` afterwards to fetch the remote list of a restored
    /// session.
    pub fn open(config: &Config) -> Result<Self> {
        let http = HttpClient::from_config(config)?;
        let store: SharedStore = Arc::new(FileStore::open(config.data_dir.clone())?);
        Ok(Self::with_store(http, store, config.banner_duration())?)
    }

    /// Build over an explicit store, restoring any persisted session
    pub fn with_store(
        http: HttpClient,
        store: SharedStore,
        banner_ttl: Duration,
    ) -> StorageResult<Self> {
        let mut sessions = SessionStore::new(store.clone());
        let backend = match sessions.restore()? {
            Some(session) => TodoBackend::remote(http.clone(), session),
            None => TodoBackend::local(store.clone())?,
        };

        Ok(Self {
            http,
            store,
            sessions,
            backend,
            generation: 0,
            auth_panel: AuthPanel::default(),
            banner: None,
            banner_ttl,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            todo_form: TodoForm::default(),
            list: TodoList::default(),
        })
    }

    pub fn screen(&self) -> Screen {
        if self.sessions.is_authenticated() {
            Screen::Authenticated
        } else {
            Screen::Unauthenticated(self.auth_panel)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn api_url(&self) -> &str {
        self.http.base_url()
    }

    /// Items to render: the remote list when signed in, else the local one
    pub fn todos(&self) -> &[Todo] {
        self.backend.todos()
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.todos().get(self.list.selected())
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn auth_panel(&self) -> AuthPanel {
        self.auth_panel
    }

    /// Switch between the login and register forms
    pub fn toggle_auth_panel(&mut self) {
        self.auth_panel = match self.auth_panel {
            AuthPanel::Login => AuthPanel::Register,
            AuthPanel::Register => AuthPanel::Login,
        };
    }

    /// Initial load: fetch the remote list when signed in
    pub fn mount(&mut self) -> StorageResult<Option<Task>> {
        self.refresh()
    }

    /// Re-read the active list; this is also the manual retry
    ///
    /// Signed out, the local list is reloaded in place and no task is
    /// returned. Signed in, nothing is issued while a fetch or an item
    /// request is still in flight.
    pub fn refresh(&mut self) -> StorageResult<Option<Task>> {
        if self.list.loading || self.list.has_busy() {
            debug!("List request already in flight");
            return Ok(None);
        }

        match self.backend.dispatch(TodoRequest::List)? {
            Dispatch::Applied(_) => {
                self.list.error = None;
                let len = self.todos().len();
                self.list.clamp(len);
                Ok(None)
            }
            Dispatch::Remote { client, request } => {
                self.list.loading = true;
                self.list.error = None;
                Ok(Some(self.todo_task(client, request)))
            }
        }
    }

    /// Validate and submit the login form
    ///
    /// The email is trimmed before validation, so an email of only spaces
    /// counts as missing. The password is sent as typed.
    pub fn submit_login(&mut self) -> Option<Task> {
        if self.login.submitting || self.is_authenticated() {
            return None;
        }

        let email = self.login.email.value().trim().to_string();
        let password = self.login.password.value().to_string();
        if let Err(e) = validate_login(&email, &password) {
            self.login.error = Some(e.to_string());
            return None;
        }

        self.login.submitting = true;
        self.login.error = None;
        Some(self.login_task(email, password, false))
    }

    /// Validate and submit the registration form
    ///
    /// The email is trimmed the same way as on the login form.
    pub fn submit_register(&mut self) -> Option<Task> {
        if self.register.submitting || self.is_authenticated() {
            return None;
        }

        let email = self.register.email.value().trim().to_string();
        let password = self.register.password.value().to_string();
        let confirm = self.register.confirm.value();
        if let Err(e) = validate_registration(&email, &password, confirm) {
            self.register.error = Some(e.to_string());
            return None;
        }

        self.register.submitting = true;
        self.register.error = None;
        Some(Task {
            generation: self.generation,
            kind: TaskKind::Register {
                auth: AuthClient::new(self.http.clone()),
                email,
                password,
            },
        })
    }

    /// Validate and submit the new todo form
    ///
    /// The title is trimmed before validation and is stored or sent to the
    /// service trimmed. Local todos are created immediately and the form is
    /// cleared.
    pub fn submit_todo(&mut self) -> StorageResult<Option<Task>> {
        if self.todo_form.submitting {
            return Ok(None);
        }

        let title = self.todo_form.title.value().trim().to_string();
        if let Err(e) = validate_title(&title) {
            self.todo_form.error = Some(e.to_string());
            return Ok(None);
        }

        let description = Some(self.todo_form.description.value().to_string());
        let request = TodoRequest::Create { title, description };
        match self.backend.dispatch(request)? {
            Dispatch::Applied(_) => {
                self.todo_form.reset();
                self.show_success(TODO_CREATED);
                Ok(None)
            }
            Dispatch::Remote { client, request } => {
                self.todo_form.submitting = true;
                self.todo_form.error = None;
                Ok(Some(self.todo_task(client, request)))
            }
        }
    }

    /// Flip the completed flag of the selected item
    pub fn toggle_selected(&mut self) -> StorageResult<Option<Task>> {
        let Some(todo) = self.selected_todo() else {
            return Ok(None);
        };
        let (id, completed) = (todo.id, !todo.completed);
        self.set_completed(id, completed)
    }

    /// Set the completed flag of `id`
    ///
    /// Signed in, the list only changes once the service confirms.
    pub fn set_completed(&mut self, id: i64, completed: bool) -> StorageResult<Option<Task>> {
        self.item_request(id, TodoRequest::SetCompleted { id, completed })
    }

    pub fn delete_selected(&mut self) -> StorageResult<Option<Task>> {
        match self.selected_todo() {
            Some(todo) => {
                let id = todo.id;
                self.delete(id)
            }
            None => Ok(None),
        }
    }

    /// Remove `id`
    pub fn delete(&mut self, id: i64) -> StorageResult<Option<Task>> {
        self.item_request(id, TodoRequest::Delete { id })
    }

    /// End the session and fall back to the local list
    pub fn logout(&mut self) -> StorageResult<()> {
        self.sessions.logout()?;
        self.generation += 1;
        self.backend = TodoBackend::local(self.store.clone())?;
        self.list.reset();
        self.todo_form.reset();
        self.login.reset();
        self.register.reset();
        self.auth_panel = AuthPanel::Login;
        self.show_success(LOGGED_OUT);
        Ok(())
    }

    /// Fold a finished task into the view state
    ///
    /// Returns follow-up tasks: the list fetch after a login, or the
    /// automatic login after a registration.
    pub fn complete(&mut self, result: TaskResult) -> StorageResult<Vec<Task>> {
        if result.generation != self.generation {
            debug!(
                task_generation = result.generation,
                generation = self.generation,
                "Ignoring result from an earlier session"
            );
            return Ok(Vec::new());
        }

        match result.outcome {
            Outcome::LoggedIn {
                email,
                after_register,
                result,
            } => self.finish_login(email, after_register, result),
            Outcome::Registered {
                email,
                password,
                result,
            } => Ok(self.finish_register(email, password, result)),
            Outcome::Todo { request, result } => {
                self.finish_todo(request, result);
                Ok(Vec::new())
            }
        }
    }

    /// Run a task and everything it leads to, in order
    pub async fn drive(&mut self, task: Task) -> StorageResult<()> {
        let mut queue = VecDeque::from([task]);
        while let Some(task) = queue.pop_front() {
            let result = task.run().await;
            queue.extend(self.complete(result)?);
        }
        Ok(())
    }

    /// Drop an expired banner; returns true when something changed
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.banner = None;
            return true;
        }
        false
    }

    fn finish_login(
        &mut self,
        email: String,
        after_register: bool,
        result: std::result::Result<String, ApiError>,
    ) -> StorageResult<Vec<Task>> {
        self.login.submitting = false;

        let token = match result {
            Ok(token) => token,
            Err(e) => {
                if after_register {
                    self.auth_panel = AuthPanel::Login;
                    self.login.email.set(email);
                }
                self.login.error = Some(e.to_string());
                return Ok(Vec::new());
            }
        };

        let session = self.sessions.login(token)?.clone();
        self.generation += 1;
        self.backend = TodoBackend::remote(self.http.clone(), &session);
        self.login.reset();
        self.register.reset();
        self.todo_form.reset();
        self.list.reset();
        info!("Signed in");
        self.show_success(LOGGED_IN);

        Ok(self.refresh()?.into_iter().collect())
    }

    fn finish_register(
        &mut self,
        email: String,
        password: String,
        result: std::result::Result<(), ApiError>,
    ) -> Vec<Task> {
        self.register.submitting = false;

        if let Err(e) = result {
            self.register.error = Some(e.to_string());
            return Vec::new();
        }

        self.show_success(REGISTERED);
        self.login.submitting = true;
        vec![self.login_task(email, password, true)]
    }

    fn finish_todo(&mut self, request: TodoRequest, result: std::result::Result<TodoResponse, ApiError>) {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.fail_todo(&request, e);
                return;
            }
        };

        self.backend.apply(&response);
        match request {
            TodoRequest::List => {
                self.list.loading = false;
                self.list.error = None;
            }
            TodoRequest::Create { .. } => {
                self.todo_form.reset();
                self.show_success(TODO_CREATED);
            }
            TodoRequest::SetCompleted { id, .. } | TodoRequest::Delete { id } => {
                self.list.finish(id);
            }
            TodoRequest::Get { .. } => {}
        }
        let len = self.todos().len();
        self.list.clamp(len);
    }

    fn fail_todo(&mut self, request: &TodoRequest, error: ApiError) {
        let message = error.to_string();
        match request {
            TodoRequest::List => {
                self.list.loading = false;
                self.list.error = Some(message);
            }
            TodoRequest::Create { .. } => {
                self.todo_form.submitting = false;
                self.todo_form.error = Some(message);
            }
            TodoRequest::SetCompleted { id, .. } | TodoRequest::Delete { id } => {
                self.list.finish(*id);
                self.list.error = Some(message.clone());
                self.show_error(message);
            }
            TodoRequest::Get { .. } => self.show_error(message),
        }
    }

    /// Signed in, item requests need a settled list: no fetch in flight,
    /// no error hiding the items, and no request on the same id
    fn item_request(&mut self, id: i64, request: TodoRequest) -> StorageResult<Option<Task>> {
        if self.backend.is_remote() {
            if self.list.loading || self.list.error.is_some() {
                debug!(id, "List is not settled");
                return Ok(None);
            }
            if !self.list.begin(id) {
                debug!(id, "Request already in flight");
                return Ok(None);
            }
        }

        match self.backend.dispatch(request)? {
            Dispatch::Applied(_) => {
                let len = self.todos().len();
                self.list.clamp(len);
                Ok(None)
            }
            Dispatch::Remote { client, request } => Ok(Some(self.todo_task(client, request))),
        }
    }

    fn login_task(&self, email: String, password: String, after_register: bool) -> Task {
        Task {
            generation: self.generation,
            kind: TaskKind::Login {
                auth: AuthClient::new(self.http.clone()),
                email,
                password,
                after_register,
            },
        }
    }

    fn todo_task(&self, client: TodoClient, request: TodoRequest) -> Task {
        Task {
            generation: self.generation,
            kind: TaskKind::Todo { client, request },
        }
    }

    fn show_success(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::new(message, BannerKind::Success, self.banner_ttl));
    }

    fn show_error(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner::new(message, BannerKind::Error, self.banner_ttl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, LOCAL_TODOS_KEY, TOKEN_KEY};

    fn app_with(store: Arc<MemoryStore>) -> TodoApp {
        // Nothing in these tests reaches the network
        let http = HttpClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        TodoApp::with_store(http, store, Duration::from_secs(3)).unwrap()
    }

    #[test]
    fn test_starts_signed_out_on_local_list() {
        let mut app = app_with(Arc::new(MemoryStore::new()));
        assert_eq!(app.screen(), Screen::Unauthenticated(AuthPanel::Login));
        assert!(app.mount().unwrap().is_none());
        assert!(!app.list.loading);
    }

    #[test]
    fn test_restored_session_fetches_once_on_mount() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();

        let mut app = app_with(store);
        assert_eq!(app.screen(), Screen::Authenticated);

        let task = app.mount().unwrap().unwrap();
        assert_eq!(task.name(), "list");
        assert!(app.list.loading);
    }

    #[test]
    fn test_login_validation_stays_offline() {
        let mut app = app_with(Arc::new(MemoryStore::new()));
        app.login.email.set("a@b.c");

        assert!(app.submit_login().is_none());
        assert_eq!(
            app.login.error.as_deref(),
            Some("Please enter your email address and password")
        );
        assert!(!app.login.submitting);
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let mut app = app_with(Arc::new(MemoryStore::new()));
        app.login.email.set("   ");
        app.login.password.set("pw");
        assert!(app.submit_login().is_none());
        assert_eq!(
            app.login.error.as_deref(),
            Some("Please enter your email address and password")
        );

        app.todo_form.title.set("  Buy milk  ");
        app.submit_todo().unwrap();
        assert_eq!(app.todos()[0].title, "Buy milk");
    }

    #[test]
    fn test_submitting_blocks_second_login() {
        let mut app = app_with(Arc::new(MemoryStore::new()));
        app.login.email.set("a@b.c");
        app.login.password.set("pw");

        assert!(app.submit_login().is_some());
        assert!(app.login.submitting);
        assert!(app.submit_login().is_none());
    }

    #[test]
    fn test_register_mismatch() {
        let mut app = app_with(Arc::new(MemoryStore::new()));
        app.toggle_auth_panel();
        app.register.email.set("a@b.c");
        app.register.password.set("one");
        app.register.confirm.set("two");

        assert!(app.submit_register().is_none());
        assert_eq!(app.register.error.as_deref(), Some("Passwords do not match"));
        assert_eq!(app.screen(), Screen::Unauthenticated(AuthPanel::Register));
    }

    #[test]
    fn test_local_add_toggle_delete() {
        let mut app = app_with(Arc::new(MemoryStore::new()));
        app.todo_form.title.set("Buy milk");

        assert!(app.submit_todo().unwrap().is_none());
        assert!(app.todo_form.title.is_empty());
        assert_eq!(app.banner().map(|b| b.message.as_str()), Some(TODO_CREATED));
        assert_eq!(app.todos().len(), 1);
        assert_eq!(app.todos()[0].description.as_deref(), Some(""));

        assert!(app.toggle_selected().unwrap().is_none());
        assert!(app.todos()[0].completed);

        assert!(app.delete_selected().unwrap().is_none());
        assert!(app.todos().is_empty());
    }

    #[test]
    fn test_blank_title_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut app = app_with(store.clone());
        app.todo_form.title.set("   ");

        assert!(app.submit_todo().unwrap().is_none());
        assert_eq!(app.todo_form.error.as_deref(), Some("Please enter a title"));
        assert!(app.todos().is_empty());
        assert!(store.get(LOCAL_TODOS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_remote_toggle_waits_for_service() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(store);
        app.backend
            .apply(&TodoResponse::Listed(vec![Todo::new(1, "remote", None)]));

        let task = app.toggle_selected().unwrap().unwrap();
        assert_eq!(task.name(), "set_completed");
        assert!(!app.todos()[0].completed);
        assert!(app.list.is_busy(1));

        // Same item again while in flight
        assert!(app.toggle_selected().unwrap().is_none());
    }

    #[test]
    fn test_refresh_refused_while_fetching() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(store);
        app.backend
            .apply(&TodoResponse::Listed(vec![Todo::new(1, "remote", None)]));

        assert!(app.refresh().unwrap().is_some());
        assert!(app.refresh().unwrap().is_none());

        // Item actions wait for the fetch too
        assert!(app.toggle_selected().unwrap().is_none());
        assert!(app.delete_selected().unwrap().is_none());
        assert!(!app.list.is_busy(1));
    }

    #[test]
    fn test_refresh_refused_while_item_in_flight() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(store);
        app.backend
            .apply(&TodoResponse::Listed(vec![Todo::new(1, "remote", None)]));

        assert!(app.toggle_selected().unwrap().is_some());
        assert!(app.refresh().unwrap().is_none());
        assert!(!app.list.loading);
    }

    #[test]
    fn test_item_actions_refused_while_list_shows_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(store);
        app.backend
            .apply(&TodoResponse::Listed(vec![Todo::new(1, "remote", None)]));
        app.list.error = Some("Failed to fetch todos".to_string());

        assert!(app.toggle_selected().unwrap().is_none());
        assert!(app.delete(1).unwrap().is_none());
        assert!(!app.list.is_busy(1));

        // Retry stays available
        assert!(app.refresh().unwrap().is_some());
        assert!(app.list.error.is_none());
    }

    #[test]
    fn test_logout_switches_to_local() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(store.clone());
        app.backend
            .apply(&TodoResponse::Listed(vec![Todo::new(1, "remote", None)]));
        let before = app.generation();

        app.logout().unwrap();
        assert_eq!(app.screen(), Screen::Unauthenticated(AuthPanel::Login));
        assert!(app.todos().is_empty());
        assert!(app.generation() > before);
        assert!(store.get(TOKEN_KEY).unwrap().is_none());
        assert_eq!(app.banner().map(|b| b.message.as_str()), Some(LOGGED_OUT));
    }

    #[test]
    fn test_banner_clears_on_tick() {
        let mut app = app_with(Arc::new(MemoryStore::new()));
        app.todo_form.title.set("Walk dog");
        app.submit_todo().unwrap();

        assert!(!app.tick(Instant::now()));
        assert!(app.banner().is_some());
        assert!(app.tick(Instant::now() + Duration::from_secs(3)));
        assert!(app.banner().is_none());
    }
}
