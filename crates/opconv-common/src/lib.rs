//! Common types and utilities for the opconv toolkit.
//!
//! This crate provides foundational types used across all opconv crates:
//! - Name interning (`Atom`, `SharedInterner`)
//! - Diagnostic records produced by recoverable lowering failures
//! - Centralized limits and thresholds

// Name interning
pub mod interner;
pub use interner::{Atom, SharedInterner};

// Centralized limits and thresholds
pub mod limits;

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    /// A binary operator token with no IR operator mapping.
    pub const UNSUPPORTED_OPERATOR: u32 = 1001;
    /// An operator token that is recognized but has no IR operator tag.
    pub const OPERATOR_WITHOUT_IR_TAG: u32 = 1002;
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNSUPPORTED_OPERATOR,
        category: DiagnosticCategory::Error,
        message: "Unsupported binary operator '{0}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::OPERATOR_WITHOUT_IR_TAG,
        category: DiagnosticCategory::Error,
        message: "Operator '{0}' cannot be lowered as a binary expression.",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(start: u32, length: u32, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            start,
            length,
        }
    }

    /// Build an error diagnostic from a registered message template.
    pub fn from_code(start: u32, length: u32, code: u32, args: &[&str]) -> Self {
        let template = get_message_template(code).unwrap_or("{0}");
        Self::error(start, length, format_message(template, args), code)
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
