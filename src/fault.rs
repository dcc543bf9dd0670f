//! Captured faults and their textual form.
//!
//! Two kinds of fault flow through the handler:
//!
//! - a [`Fault::Direct`] is an exception raised by application code and
//!   observed as-is;
//! - a [`Fault::Escalated`] is a raw runtime fault (severity, message,
//!   file, line) that the raw-fault hook upgraded into a catchable
//!   value. The original call-site report travels along as
//!   [`FaultInfo`], so no call-stack inspection is needed later to
//!   recover where the fault textually originated.
//!
//! [`Fault`] implements [`std::error::Error`] and is intended to be
//! propagated with `?` until it reaches the request boundary.

use crate::severity::Severity;
use std::fmt;

/// The original call-site report of a raw runtime fault.
///
/// Also the shape of a shutdown-time fault report, which carries no
/// stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultInfo {
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl FaultInfo {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// Text body written to the fault log. Shutdown reports have no
    /// trace, so there is no trace segment.
    #[must_use]
    pub fn log_body(&self) -> String {
        format!("{} in {} on line {}", self.message, self.file, self.line)
    }
}

/// How a traced call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallKind {
    /// An instance call, rendered as `->`.
    #[default]
    Method,
    /// An associated (static) call, rendered as `::`.
    Static,
}

impl CallKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Method => "->",
            Self::Static => "::",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame of a fault's stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
    pub class: Option<String>,
    pub function: String,
    pub call_kind: CallKind,
}

impl TraceFrame {
    /// A frame for a free function call.
    pub fn function(function: impl Into<String>) -> Self {
        Self {
            class: None,
            function: function.into(),
            call_kind: CallKind::Method,
        }
    }

    /// A frame for an instance method call (`Class->function`).
    pub fn method(class: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            function: function.into(),
            call_kind: CallKind::Method,
        }
    }

    /// A frame for an associated call (`Class::function`).
    pub fn associated(class: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            function: function.into(),
            call_kind: CallKind::Static,
        }
    }
}

impl fmt::Display for TraceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "{}{}{}()", class, self.call_kind, self.function),
            None => write!(f, "{}()", self.function),
        }
    }
}

/// A fault observed by the handler.
#[derive(Debug, Clone)]
pub enum Fault {
    /// An exception raised directly by application code.
    Direct {
        code: Severity,
        message: String,
        file: String,
        line: u32,
        trace: Vec<TraceFrame>,
    },
    /// A raw runtime fault upgraded into a catchable value by the
    /// raw-fault hook, carrying the original call-site report.
    Escalated {
        original: FaultInfo,
        trace: Vec<TraceFrame>,
    },
}

impl Fault {
    /// An exception raised by application code, without severity code
    /// or trace. Attach those with [`Fault::with_code`] and
    /// [`Fault::with_trace`].
    pub fn direct(message: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self::Direct {
            code: Severity::from_raw(0),
            message: message.into(),
            file: file.into(),
            line,
            trace: Vec::new(),
        }
    }

    /// An escalated raw fault carrying its original call-site report.
    pub fn escalated(original: FaultInfo) -> Self {
        Self::Escalated {
            original,
            trace: Vec::new(),
        }
    }

    /// Set the severity code of a direct fault.
    ///
    /// Has no effect on an escalated fault, whose severity is fixed by
    /// the original report.
    #[must_use]
    pub fn with_code(mut self, severity: Severity) -> Self {
        if let Self::Direct { code, .. } = &mut self {
            *code = severity;
        }
        self
    }

    /// Attach a stack trace.
    #[must_use]
    pub fn with_trace(mut self, frames: Vec<TraceFrame>) -> Self {
        match &mut self {
            Self::Direct { trace, .. } | Self::Escalated { trace, .. } => *trace = frames,
        }
        self
    }

    /// Severity this fault is classified and colored by: an escalated
    /// fault reports the severity it originally carried.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Direct { code, .. } => *code,
            Self::Escalated { original, .. } => original.severity,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Direct { message, .. } => message,
            Self::Escalated { original, .. } => &original.message,
        }
    }

    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Direct { file, .. } => file,
            Self::Escalated { original, .. } => &original.file,
        }
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Self::Direct { line, .. } => *line,
            Self::Escalated { original, .. } => original.line,
        }
    }

    #[must_use]
    pub fn trace(&self) -> &[TraceFrame] {
        match self {
            Self::Direct { trace, .. } | Self::Escalated { trace, .. } => trace,
        }
    }

    /// Name of the fault kind, shown as the object heading of the
    /// development error page.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "Exception",
            Self::Escalated { .. } => "EscalatedFault",
        }
    }

    /// The frame naming where the fault textually originated.
    ///
    /// For an escalated fault the first frame is the escalation shim
    /// itself, so the origin context is one frame further up; if the
    /// trace has no such frame, fall back to whatever is first.
    #[must_use]
    pub fn context_frame(&self) -> Option<&TraceFrame> {
        match self {
            Self::Direct { trace, .. } => trace.first(),
            Self::Escalated { trace, .. } => trace.get(1).or_else(|| trace.first()),
        }
    }

    /// The trace rendered as text, one `#i frame` line per frame.
    #[must_use]
    pub fn trace_text(&self) -> String {
        let mut out = String::new();
        for (i, frame) in self.trace().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("#{i} {frame}"));
        }
        out
    }

    /// Text body written to the fault log: the primary message and
    /// location, followed by the trace when one exists.
    #[must_use]
    pub fn log_body(&self) -> String {
        let mut body = format!("{self}");
        if !self.trace().is_empty() {
            body.push('\n');
            body.push_str(&self.trace_text());
        }
        body
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} on line {}",
            self.message(),
            self.file(),
            self.line()
        )
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_message_and_location() {
        let fault = Fault::direct("Undefined method", "src/app.rs", 42);
        assert_eq!(
            fault.to_string(),
            "Undefined method in src/app.rs on line 42"
        );
    }

    #[test]
    fn log_body_without_trace_has_no_trace_segment() {
        let fault = Fault::direct("boom", "app.rs", 3);
        assert_eq!(fault.log_body(), "boom in app.rs on line 3");
    }

    #[test]
    fn log_body_appends_rendered_trace() {
        let fault = Fault::direct("boom", "app.rs", 3).with_trace(vec![
            TraceFrame::method("Router", "dispatch"),
            TraceFrame::associated("App", "run"),
        ]);
        assert_eq!(
            fault.log_body(),
            "boom in app.rs on line 3\n#0 Router->dispatch()\n#1 App::run()"
        );
    }

    #[test]
    fn escalated_fault_reports_original_values() {
        let info = FaultInfo::new(Severity::WARNING, "division by zero", "calc.rs", 9);
        let fault = Fault::escalated(info.clone());
        assert_eq!(fault.severity(), Severity::WARNING);
        assert_eq!(fault.message(), "division by zero");
        assert_eq!(fault.file(), "calc.rs");
        assert_eq!(fault.line(), 9);
        assert_eq!(info.log_body(), "division by zero in calc.rs on line 9");
    }

    #[test]
    fn context_frame_skips_the_escalation_shim() {
        let info = FaultInfo::new(Severity::ERROR, "boom", "app.rs", 1);
        let shim = TraceFrame::method("FaultHandler", "escalate");
        let origin = TraceFrame::method("Router", "dispatch");

        let fault = Fault::escalated(info.clone()).with_trace(vec![shim.clone(), origin.clone()]);
        assert_eq!(fault.context_frame(), Some(&origin));

        // a single-frame trace falls back to that frame
        let fault = Fault::escalated(info.clone()).with_trace(vec![shim.clone()]);
        assert_eq!(fault.context_frame(), Some(&shim));

        // direct faults use the first frame
        let fault = Fault::direct("boom", "app.rs", 1).with_trace(vec![origin.clone()]);
        assert_eq!(fault.context_frame(), Some(&origin));

        assert!(Fault::escalated(info).context_frame().is_none());
    }

    #[test]
    fn with_code_only_touches_direct_faults() {
        let fault = Fault::direct("boom", "app.rs", 1).with_code(Severity::USER_ERROR);
        assert_eq!(fault.severity(), Severity::USER_ERROR);

        let info = FaultInfo::new(Severity::WARNING, "boom", "app.rs", 1);
        let fault = Fault::escalated(info).with_code(Severity::USER_ERROR);
        assert_eq!(fault.severity(), Severity::WARNING);
    }
}
