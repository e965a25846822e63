//! Error types for calendar operations.
//!
//! Every failure the engine can report is local, synchronous and recoverable.
//! Errors carry a structured [`ErrorContext`] so the host can tell which
//! operation and which input were rejected.

use std::fmt;

/// Result type for calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Structured context for calendar errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "go_to_date", "build_day_slots")
    pub operation: Option<String>,
    /// The configuration field or argument involved
    pub field: Option<String>,
    /// The offending input value, as received
    pub value: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the offending value.
    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none()
            && self.field.is_none()
            && self.value.is_none()
            && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref field) = self.field {
            parts.push(format!("field={}", field));
        }
        if let Some(ref value) = self.value {
            parts.push(format!("value={:?}", value));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for calendar operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Malformed working-hours or slot-duration settings, detected at initialization.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Unparsable or impossible date, or date arithmetic out of range.
    #[error("Invalid date: {message} {context}")]
    InvalidDateError {
        message: String,
        context: ErrorContext,
    },

    /// Unrecognized view name.
    #[error("Invalid view: {message} {context}")]
    InvalidViewError {
        message: String,
        context: ErrorContext,
    },
}

impl CalendarError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error with context.
    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context,
        }
    }

    /// Create an invalid date error.
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDateError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an invalid date error with context.
    pub fn invalid_date_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InvalidDateError {
            message: message.into(),
            context,
        }
    }

    /// Create an invalid view error for the rejected view name.
    pub fn invalid_view(view: impl ToString) -> Self {
        Self::InvalidViewError {
            message: "expected one of: month, week, day".to_string(),
            context: ErrorContext::default().with_value(view),
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConfigurationError { context, .. }
            | Self::InvalidDateError { context, .. }
            | Self::InvalidViewError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::ConfigurationError { context, .. }
            | Self::InvalidDateError { context, .. }
            | Self::InvalidViewError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError { .. })
    }

    pub fn is_invalid_date(&self) -> bool {
        matches!(self, Self::InvalidDateError { .. })
    }

    pub fn is_invalid_view(&self) -> bool {
        matches!(self, Self::InvalidViewError { .. })
    }
}

impl From<toml::de::Error> for CalendarError {
    fn from(err: toml::de::Error) -> Self {
        CalendarError::configuration_with_context(
            format!("Failed to parse config: {}", err),
            ErrorContext::default().with_details("toml"),
        )
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(err: serde_json::Error) -> Self {
        CalendarError::configuration_with_context(
            format!("Failed to parse properties: {}", err),
            ErrorContext::default().with_details("json"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("go_to_date")
            .with_field("date")
            .with_value("not-a-date");
        assert_eq!(
            ctx.to_string(),
            "[operation=go_to_date, field=date, value=\"not-a-date\"]"
        );
    }

    #[test]
    fn test_empty_context_display() {
        assert_eq!(ErrorContext::default().to_string(), "");
    }

    #[test]
    fn test_invalid_view_carries_value() {
        let err = CalendarError::invalid_view("year");
        assert!(err.is_invalid_view());
        assert_eq!(err.context().value.as_deref(), Some("year"));
        assert!(err.to_string().contains("month, week, day"));
    }

    #[test]
    fn test_with_operation_overrides() {
        let err = CalendarError::configuration("bad hours").with_operation("init");
        assert!(err.is_configuration());
        assert_eq!(err.context().operation.as_deref(), Some("init"));
    }

    #[test]
    fn test_toml_error_maps_to_configuration() {
        let parse: Result<toml::Value, _> = toml::from_str("= broken");
        let err: CalendarError = parse.unwrap_err().into();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
    }
}
