//! Error handling for zgoubidoo.
//!
//! A single error enum covers every failure mode of the crate. `Input` is the
//! structured "input exception" raised by the container and its validators;
//! the remaining variants wrap unit, field, I/O and configuration failures so
//! they propagate unmodified through `?`.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZgoubiError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ZgoubiError {
    /// Structural problem with an `Input`: bad beam binding, ceiling exceeded,
    /// failed validator, out-of-range access.
    #[error("{message}")]
    #[diagnostic(code(zgoubidoo::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unit error: {0}")]
    #[diagnostic(code(zgoubidoo::units))]
    Units(String),

    #[error("Field error: '{keyword}.{field}' expects {expected}, got {actual}")]
    #[diagnostic(code(zgoubidoo::field))]
    Field {
        keyword: String,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(zgoubidoo::io))]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    #[diagnostic(code(zgoubidoo::config::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(zgoubidoo::config::json))]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(zgoubidoo::config))]
    Config(String),
}

impl ZgoubiError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn units(message: impl Into<String>) -> Self {
        Self::Units(message.into())
    }

    /// True for the structured input exception, as opposed to I/O or unit failures.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. })
    }
}
