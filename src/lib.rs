//! Fault interception and error rendering for web services.
//!
//! `faultgate` sits at the request boundary of a web runtime and takes
//! over once something goes wrong. It covers three interception points:
//!
//! - **raw runtime faults** — severity-coded reports (message, file,
//!   line) are either suppressed by the configured reporting mask or
//!   escalated into a catchable [`Fault`] that propagates like any
//!   other error;
//! - **uncaught faults** — a [`Fault`] that reaches the end of a
//!   request is formatted, persisted to a per-fault log file (when
//!   logging is enabled) and rendered as a response;
//! - **shutdown reports** — the last fault a runtime recorded before
//!   shutdown is logged and rendered only when its severity is fatal.
//!
//! What a rendered response reveals depends on the request kind and the
//! configured environment: page views get an HTML error page (verbose
//! in development, sanitized in production), data-exchange requests get
//! a JSON payload, and messages matching a sanitization rule are
//! replaced outright so storage-layer internals never leak.
//!
//! # Example
//!
//! ```rust
//! use faultgate::{
//!     Environment, FaultHandler, HandlerConfig, RequestKind, Severity, ViewConfig,
//! };
//!
//! let handler = FaultHandler::new(
//!     HandlerConfig::default()
//!         .with_log_errors(false)
//!         .with_report_mask(Severity::ERROR | Severity::WARNING),
//!     ViewConfig::default().with_env(Environment::Development),
//! );
//!
//! // a notice is outside the reporting mask: suppressed, not handled
//! assert!(handler.escalate(Severity::NOTICE, "minor", "app.rs", 7).is_none());
//!
//! // an error is escalated into a catchable fault and, once it stays
//! // uncaught, rendered as a response
//! let fault = handler.escalate(Severity::ERROR, "boom", "app.rs", 3).unwrap();
//! let response = handler.handle_uncaught(&fault, RequestKind::DataExchange)?;
//! assert!(response.body().contains("boom"));
//! # Ok::<_, faultgate::LogWriteError>(())
//! ```

pub mod config;
pub mod error;
pub mod fault;
pub mod handler;
pub mod log;
pub mod severity;
pub mod view;

pub use config::HandlerConfig;
pub use fault::{CallKind, Fault, FaultInfo, TraceFrame};
pub use handler::FaultHandler;
pub use log::LogWriteError;
pub use severity::{Severity, SeverityColor};
pub use view::{Environment, ErrorView, RequestKind, SanitizeRule, ViewConfig};
