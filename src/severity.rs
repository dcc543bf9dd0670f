//! Severity classification of runtime faults.
//!
//! A [`Severity`] value is a bit set: a single bit identifies one fault
//! severity, a union of bits forms a reporting mask such as
//! [`Severity::all`]. This mirrors the integer severity codes and
//! reporting bitmasks of the web runtimes this crate intercepts faults
//! for, so codes can cross the boundary unchanged.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Severity bits of a runtime fault.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Severity: u32 {
        const ERROR = 1;
        const WARNING = 1 << 1;
        const PARSE = 1 << 2;
        const NOTICE = 1 << 3;
        const CORE_ERROR = 1 << 4;
        const CORE_WARNING = 1 << 5;
        const COMPILE_ERROR = 1 << 6;
        const COMPILE_WARNING = 1 << 7;
        const USER_ERROR = 1 << 8;
        const USER_WARNING = 1 << 9;
        const USER_NOTICE = 1 << 10;
        // bit 11 is reserved
        const RECOVERABLE_ERROR = 1 << 12;
        const DEPRECATED = 1 << 13;
        const USER_DEPRECATED = 1 << 14;
    }
}

impl Severity {
    /// Interpret a raw severity code.
    ///
    /// Never fails: unknown bits are preserved so that classification
    /// of codes this crate does not know about stays total.
    #[must_use]
    pub const fn from_raw(code: u32) -> Self {
        Self::from_bits_retain(code)
    }

    /// The raw severity code.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.bits()
    }

    /// Human label for this severity.
    ///
    /// Total: any value that is not exactly one known severity bit
    /// falls back to `"FATAL_ERROR"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        if self == Self::ERROR {
            "ERROR"
        } else if self == Self::WARNING {
            "WARNING"
        } else if self == Self::PARSE {
            "PARSE"
        } else if self == Self::NOTICE {
            "NOTICE"
        } else if self == Self::CORE_ERROR {
            "CORE_ERROR"
        } else if self == Self::CORE_WARNING {
            "CORE_WARNING"
        } else if self == Self::COMPILE_ERROR {
            "COMPILE_ERROR"
        } else if self == Self::COMPILE_WARNING {
            "COMPILE_WARNING"
        } else if self == Self::USER_ERROR {
            "USER_ERROR"
        } else if self == Self::USER_WARNING {
            "USER_WARNING"
        } else if self == Self::USER_NOTICE {
            "USER_NOTICE"
        } else if self == Self::RECOVERABLE_ERROR {
            "RECOVERABLE_ERROR"
        } else if self == Self::DEPRECATED {
            "DEPRECATED"
        } else if self == Self::USER_DEPRECATED {
            "USER_DEPRECATED"
        } else {
            "FATAL_ERROR"
        }
    }

    /// Display color associated with this severity.
    ///
    /// Total: unknown or composite values fall back to
    /// [`SeverityColor::Gray`].
    #[must_use]
    pub fn color(self) -> SeverityColor {
        const DANGER: Severity = Severity::ERROR
            .union(Severity::PARSE)
            .union(Severity::CORE_ERROR)
            .union(Severity::COMPILE_ERROR)
            .union(Severity::USER_ERROR)
            .union(Severity::RECOVERABLE_ERROR);
        const WARNING: Severity = Severity::WARNING
            .union(Severity::CORE_WARNING)
            .union(Severity::COMPILE_WARNING)
            .union(Severity::USER_WARNING);
        const INFO: Severity = Severity::NOTICE
            .union(Severity::USER_NOTICE)
            .union(Severity::DEPRECATED)
            .union(Severity::USER_DEPRECATED);

        if self.is_empty() {
            // code 0: an exception raised without a severity
            SeverityColor::Danger
        } else if DANGER.contains(self) {
            SeverityColor::Danger
        } else if WARNING.contains(self) {
            SeverityColor::Warning
        } else if INFO.contains(self) {
            SeverityColor::Info
        } else {
            SeverityColor::Gray
        }
    }

    /// Whether a fault of this severity halts normal execution.
    ///
    /// The fatal set is closed and exact; composites and everything
    /// else are not fatal.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        self == Self::ERROR
            || self == Self::PARSE
            || self == Self::CORE_ERROR
            || self == Self::COMPILE_ERROR
            || self == Self::USER_ERROR
    }
}

/// Display color of a severity, as used by the error page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityColor {
    Danger,
    Warning,
    Info,
    Gray,
}

impl SeverityColor {
    /// The color name as used in rendered templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Gray => "gray",
        }
    }
}

impl fmt::Display for SeverityColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
