//! Form state: text inputs, inline errors and the submitting flag

/// A single-line text input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    masked: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// An input whose contents are hidden when rendered (passwords)
    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Text to draw: the value, or one `*` per character when masked
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Email/password login form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: TextInput,
    pub password: TextInput,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: TextInput::new(),
            password: TextInput::masked(),
            submitting: false,
            error: None,
        }
    }
}

impl LoginForm {
    /// Clear inputs, error and the submitting flag
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Registration form with password confirmation
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub email: TextInput,
    pub password: TextInput,
    pub confirm: TextInput,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            email: TextInput::new(),
            password: TextInput::masked(),
            confirm: TextInput::masked(),
            submitting: false,
            error: None,
        }
    }
}

impl RegisterForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// New todo form
#[derive(Debug, Clone, Default)]
pub struct TodoForm {
    pub title: TextInput,
    pub description: TextInput,
    pub submitting: bool,
    pub error: Option<String>,
}

impl TodoForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
