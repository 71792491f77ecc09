//! Diagnostic types and the fixed message table for companion checking.
//!
//! Every diagnostic the checker can produce is listed in
//! [`DIAGNOSTIC_MESSAGES`]. Codes are stable: tools and suppression lists key
//! on them, so existing entries are never renumbered.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

impl DiagnosticCategory {
    /// Lower-case label used by text reporters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A checker diagnostic anchored at a byte range of one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a diagnostic whose category comes from the message table.
    #[must_use]
    pub fn from_message(
        file: String,
        start: u32,
        length: u32,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file,
            start,
            length,
            message_text: format_message(message.message, args),
            category: message.category,
            code: message.code,
        }
    }

    /// Rendered code, e.g. `CMP1001`.
    #[must_use]
    pub fn display_code(&self) -> String {
        display_code(self.code)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Prefix shared by every rendered diagnostic code.
pub const CODE_PREFIX: &str = "CMP";

/// Render a numeric code with the tool prefix.
#[must_use]
pub fn display_code(code: u32) -> String {
    format!("{CODE_PREFIX}{code:04}")
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Message Table
// =============================================================================

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    /// A restricted member was referenced from a type outside its companion set.
    pub const MEMBER_IS_RESTRICTED_TO_COMPANION_TYPES: u32 = 1001;
    /// A name-valued companion annotation names no type in the program.
    pub const COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE: u32 = 1002;
}

pub mod diagnostic_messages {
    pub const MEMBER_IS_RESTRICTED_TO_COMPANION_TYPES: &str =
        "This member is restricted to its companion types and cannot be referenced from here.";
    pub const COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE: &str =
        "Companion name '{0}' does not match any type declared in the program.";
}

impl DiagnosticMessage {
    pub const MEMBER_IS_RESTRICTED_TO_COMPANION_TYPES: Self = Self {
        code: diagnostic_codes::MEMBER_IS_RESTRICTED_TO_COMPANION_TYPES,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::MEMBER_IS_RESTRICTED_TO_COMPANION_TYPES,
    };
    pub const COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE: Self = Self {
        code: diagnostic_codes::COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE,
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage::MEMBER_IS_RESTRICTED_TO_COMPANION_TYPES,
    DiagnosticMessage::COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE,
];
