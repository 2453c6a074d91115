use serde::{Deserialize, Serialize};

use crate::common::FormError;
use crate::forms::{required, validate_email};

/// Login request payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), FormError> {
        required("email", &self.email)?;
        required("password", &self.password)?;
        Ok(())
    }
}

/// Newsletter signup payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SubscribeRequest {
    pub fn validate(&self) -> Result<(), FormError> {
        required("email", &self.email)?;
        if !validate_email(&self.email) {
            return Err(FormError::Invalid {
                field: "email",
                reason: "not a valid email address".to_string(),
            });
        }
        Ok(())
    }
}

/// Contact form payload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), FormError> {
        required("name", &self.name)?;
        required("email", &self.email)?;
        required("message", &self.message)?;
        if !validate_email(&self.email) {
            return Err(FormError::Invalid {
                field: "email",
                reason: "not a valid email address".to_string(),
            });
        }
        Ok(())
    }

    pub fn subject_line(&self) -> String {
        match self.subject.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(subject) => format!("Website enquiry: {}", subject),
            None => format!("Website enquiry from {}", self.name.trim()),
        }
    }
}

/// Body returned by the local API routes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
