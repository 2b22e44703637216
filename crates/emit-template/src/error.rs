//! Error types for template parsing and rendering.

use thiserror::Error;

/// Errors raised while parsing a template. These are fatal to the emitter
/// that owns the template.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("template '{template}': unclosed action starting at byte {offset}")]
    UnclosedAction { template: String, offset: usize },

    #[error("template '{template}': empty action at byte {offset}")]
    EmptyAction { template: String, offset: usize },

    #[error("template '{template}': unterminated string literal in action '{action}'")]
    UnterminatedString { template: String, action: String },

    #[error("template '{template}': unknown function '{function}'")]
    UnknownFunction { template: String, function: String },

    #[error("template '{template}': invalid arguments for '{function}': {reason}")]
    InvalidArguments {
        template: String,
        function: String,
        reason: String,
    },
}

/// Errors raised while rendering a single record. These are never fatal:
/// callers log them and fall back to an empty string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("unsupported locale '{0}'")]
    UnsupportedLocale(String),

    #[error("environment variable '{0}' is not set")]
    MissingEnv(String),

    #[error("'{0}' is only available when formatting a produced record")]
    NoRecord(&'static str),

    #[error("invalid arguments for '{0}'")]
    InvalidArguments(&'static str),
}
