//! Non-fatal diagnostics.
//!
//! Nothing in the topology resolver or the selector is allowed to fail hard
//! on bad geometry or stale ids.  Instead they degrade and describe what
//! happened with a [`Diagnostic`], which the caller forwards to a
//! [`DiagnosticSink`](crate::traits::DiagnosticSink).

use std::fmt;

/// What kind of degradation occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The displays could not be placed in a 3×3 grid by relative position;
    /// the row-major fallback layout is used instead.
    GeometricAmbiguity,
    /// A layout cell names a display that is no longer connected.
    StaleReference,
    /// More than nine displays exist; the extras are not reachable.
    CapacityOverflow,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::GeometricAmbiguity => write!(f, "geometric ambiguity"),
            DiagnosticKind::StaleReference => write!(f, "stale reference"),
            DiagnosticKind::CapacityOverflow => write!(f, "capacity overflow"),
        }
    }
}

/// An advisory, user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
