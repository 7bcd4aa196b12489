//! Error taxonomy of the SPP crates.
//!
//! Every failure carries an [`ErrorInfo`]: a stable kebab-case `code` that
//! tests and callers match on, a message, key/value context accumulated as
//! the error travels outward, and an optional remediation hint. The enum
//! variant names the family of the failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload shared by every [`SppError`] family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable code, e.g. `missing-branching-entry`.
    pub code: String,
    /// Diagnostic message.
    pub message: String,
    /// Context such as resonance, channel or energy.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// How the caller might fix it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds (or overwrites) one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        let mut sep = " {";
        for (key, value) in &self.context {
            write!(f, "{sep}{key}={value}")?;
            sep = ", ";
        }
        if !self.context.is_empty() {
            f.write_str("}")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Failure families of the resonance-summation engine.
///
/// "Not applicable" physics never reaches the caller from the engine's
/// differential or integrated cross sections: it collapses to zero. What
/// surfaces here are setup defects and numerical failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SppError {
    /// Interaction outside the weak resonant single-pion family.
    #[error("invalid process: {0}")]
    InvalidProcess(ErrorInfo),
    /// Missing isospin or branching-ratio entry.
    #[error("unknown channel: {0}")]
    UnknownChannel(ErrorInfo),
    /// Integrator failed to produce a usable value.
    #[error("integration failure: {0}")]
    Integration(ErrorInfo),
    /// Missing, rejected or repeated collaborator binding.
    #[error("binding error: {0}")]
    Binding(ErrorInfo),
    /// Single-resonance model failure or invalid output.
    #[error("model error: {0}")]
    Model(ErrorInfo),
    /// Unreadable or invalid configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl SppError {
    /// Shared payload.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SppError::InvalidProcess(info)
            | SppError::UnknownChannel(info)
            | SppError::Integration(info)
            | SppError::Binding(info)
            | SppError::Model(info)
            | SppError::Config(info) => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            SppError::InvalidProcess(info)
            | SppError::UnknownChannel(info)
            | SppError::Integration(info)
            | SppError::Binding(info)
            | SppError::Model(info)
            | SppError::Config(info) => info,
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Family name as it appears in the serialized form.
    pub fn family(&self) -> &'static str {
        match self {
            SppError::InvalidProcess(_) => "InvalidProcess",
            SppError::UnknownChannel(_) => "UnknownChannel",
            SppError::Integration(_) => "Integration",
            SppError::Binding(_) => "Binding",
            SppError::Model(_) => "Model",
            SppError::Config(_) => "Config",
        }
    }

    /// Same error with one more context entry; existing keys are kept.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.info_mut()
            .context
            .entry(key.into())
            .or_insert_with(|| value.to_string());
        self
    }
}
