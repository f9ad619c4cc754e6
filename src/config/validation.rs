//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! reported together rather than stopping at the first one.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `listener.bind_address`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Render a list of errors on one line.
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("'{}' is not a socket address ({e})", config.listener.bind_address),
        });
    }

    if !config.proxy.path.starts_with('/') || config.proxy.path.len() < 2 {
        errors.push(ValidationError {
            field: "proxy.path",
            message: format!("'{}' must be an absolute path below '/'", config.proxy.path),
        });
    } else if config.proxy.path.contains(['{', '}']) {
        // braces would be read as route captures
        errors.push(ValidationError {
            field: "proxy.path",
            message: format!("'{}' must not contain '{{' or '}}'", config.proxy.path),
        });
    }

    if config.assets.index.is_empty() {
        errors.push(ValidationError {
            field: "assets.index",
            message: "must not be empty".to_string(),
        });
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.connect_secs",
            message: "must be greater than zero".to_string(),
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
