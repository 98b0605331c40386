//! Field-level input validation shared by every request body.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Implemented by every request body that arrives over the REST API.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Accumulates field errors so a client sees every problem at once.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &'static str, message: String) {
        self.errors.push(FieldError { field, message });
    }

    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, format!("{} is required", field));
        }
        self
    }

    pub fn min_len(&mut self, field: &'static str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.push(field, format!("{} must be at least {} characters", field, min));
        }
        self
    }

    pub fn max_len(&mut self, field: &'static str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.push(field, format!("{} must be at most {} characters", field, max));
        }
        self
    }

    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        let valid = match value.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
            None => false,
        };
        if !valid {
            self.push(field, format!("{} must be a valid email", field));
        }
        self
    }

    pub fn one_of(&mut self, field: &'static str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.contains(&value) {
            self.push(field, format!("{} must be one of: {}", field, allowed.join(", ")));
        }
        self
    }

    pub fn range(&mut self, field: &'static str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min || value > max {
            self.push(field, format!("{} must be between {} and {}", field, min, max));
        }
        self
    }

    /// Optional URLs are accepted when absent; present ones must be http(s).
    pub fn url(&mut self, field: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if !(v.starts_with("http://") || v.starts_with("https://") || v.starts_with('/')) {
                self.push(field, format!("{} must be an http(s) URL or absolute path", field));
            }
        }
        self
    }

    pub fn check(&mut self, field: &'static str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.push(field, message.to_string());
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
