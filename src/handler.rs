//! The fault handler facade.
//!
//! A [`FaultHandler`] wires the three interception points of a web
//! runtime together: raw runtime faults ([`FaultHandler::escalate`]),
//! faults that reached the request boundary uncaught
//! ([`FaultHandler::handle_uncaught`]) and fatal faults surviving to
//! shutdown ([`FaultHandler::handle_shutdown`]). It is a capability
//! object: construct exactly one per process, hand it to the embedding
//! runtime and keep it alive for the process lifetime. Nothing is
//! installed globally.

use crate::config::HandlerConfig;
use crate::fault::{Fault, FaultInfo};
use crate::log::{LogWriteError, write_fault_log};
use crate::severity::Severity;
use crate::view::{ErrorView, RequestKind, ViewConfig};
use http::Response;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Intercepts runtime faults, persists them and renders responses.
///
/// See the [module docs](self) for the lifecycle.
#[derive(Debug)]
pub struct FaultHandler {
    config: HandlerConfig,
    view: ErrorView,
}

impl FaultHandler {
    /// Create a handler from its two configurations.
    ///
    /// The handler-level [`HandlerConfig`] governs escalation and
    /// logging, the [`ViewConfig`] governs what rendered responses
    /// reveal. Both are immutable from here on.
    #[must_use]
    pub fn new(config: HandlerConfig, view_config: ViewConfig) -> Self {
        tracing::debug!(
            display_errors = config.display_errors,
            report_mask = config.report_mask.raw(),
            "fault handler installed",
        );
        let view = ErrorView::new(view_config).maybe_with_error_page(config.error_view.clone());
        Self { config, view }
    }

    /// The active display-errors runtime setting.
    #[must_use]
    pub fn display_errors(&self) -> bool {
        self.config.display_errors
    }

    /// The active severity reporting mask.
    #[must_use]
    pub fn report_mask(&self) -> Severity {
        self.config.report_mask
    }

    /// The view this handler renders responses with.
    #[must_use]
    pub fn view(&self) -> &ErrorView {
        &self.view
    }

    /// Upgrade a raw runtime fault into a catchable [`Fault`].
    ///
    /// Returns `None` when the severity is not enabled under the
    /// configured reporting mask: the fault stays suppressed, and
    /// nothing is logged or rendered. Otherwise the escalated fault
    /// carries exactly the severity, message, file and line it was
    /// reported with; propagating it is the caller's job. This hook
    /// never logs or renders by itself.
    #[must_use]
    pub fn escalate(
        &self,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Option<Fault> {
        if !self.config.report_mask.intersects(severity) {
            return None;
        }
        Some(Fault::escalated(FaultInfo::new(
            severity, message, file, line,
        )))
    }

    /// Handle a fault that reached the request boundary uncaught:
    /// format it, persist it when logging is enabled, and render the
    /// response for the given request kind.
    ///
    /// A failing log write is fatal to this path and surfaces as
    /// [`LogWriteError`]; it is never swallowed.
    pub fn handle_uncaught(
        &self,
        fault: &Fault,
        kind: RequestKind,
    ) -> Result<Response<String>, LogWriteError> {
        tracing::error!(
            file = %fault.file(),
            line = fault.line(),
            "uncaught fault: {}",
            fault.message(),
        );
        self.log_fault(fault.line(), &fault.log_body())?;
        Ok(self.view.display(fault, kind))
    }

    /// Inspect the last fault reported before shutdown.
    ///
    /// Only reports classified fatal are logged and rendered; a missing
    /// or non-fatal report yields `Ok(None)`. The silence is
    /// intentional: ordinary warnings already went through the live
    /// fault hooks, and only unrecoverable faults surviving to shutdown
    /// are worth reporting.
    pub fn handle_shutdown(
        &self,
        last_report: Option<&FaultInfo>,
        kind: RequestKind,
    ) -> Result<Option<Response<String>>, LogWriteError> {
        let Some(report) = last_report else {
            return Ok(None);
        };
        if !report.severity.is_fatal() {
            return Ok(None);
        }

        tracing::error!(
            file = %report.file,
            line = report.line,
            "fatal fault at shutdown: {}",
            report.message,
        );
        self.log_fault(report.line, &report.log_body())?;
        let fault = Fault::escalated(report.clone());
        Ok(Some(self.view.display(&fault, kind)))
    }

    /// Run a request closure, routing an uncaught [`Fault`] or a panic
    /// through [`FaultHandler::handle_uncaught`].
    pub fn catch<F>(&self, kind: RequestKind, f: F) -> Result<Response<String>, LogWriteError>
    where
        F: FnOnce() -> Result<Response<String>, Fault>,
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(res)) => Ok(res),
            Ok(Err(fault)) => self.handle_uncaught(&fault, kind),
            Err(payload) => self.handle_uncaught(&Self::fault_from_panic(payload), kind),
        }
    }

    /// Build a [`Fault`] from a panic payload.
    #[must_use]
    pub fn fault_from_panic(payload: Box<dyn Any + Send>) -> Fault {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else {
            "Unknown panic message".to_owned()
        };
        Fault::direct(message, "<unknown>", 0)
    }

    fn log_fault(&self, line: u32, body: &str) -> Result<(), LogWriteError> {
        if !self.config.log_errors {
            return Ok(());
        }
        // dev_logs swaps the target directory for this write only
        let dir = if self.config.dev_logs {
            &self.config.dev_logs_directory
        } else {
            &self.config.log_directory
        };
        let _path = write_fault_log(dir, line, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escalate_carries_the_exact_report() {
        let handler = FaultHandler::new(
            HandlerConfig::default().with_log_errors(false),
            ViewConfig::default(),
        );
        let fault = handler
            .escalate(Severity::USER_WARNING, "slow query", "db.rs", 128)
            .unwrap();
        assert_eq!(fault.severity(), Severity::USER_WARNING);
        assert_eq!(fault.message(), "slow query");
        assert_eq!(fault.file(), "db.rs");
        assert_eq!(fault.line(), 128);
    }

    #[test]
    fn escalate_respects_the_mask() {
        let handler = FaultHandler::new(
            HandlerConfig::default()
                .with_log_errors(false)
                .with_report_mask(Severity::ERROR),
            ViewConfig::default(),
        );
        assert!(
            handler
                .escalate(Severity::WARNING, "noise", "app.rs", 1)
                .is_none()
        );
        assert!(
            handler
                .escalate(Severity::ERROR, "boom", "app.rs", 1)
                .is_some()
        );
    }

    #[test]
    fn fault_from_panic_downcasts_str_and_string() {
        let fault = FaultHandler::fault_from_panic(Box::new("went sideways"));
        assert_eq!(fault.message(), "went sideways");

        let fault = FaultHandler::fault_from_panic(Box::new("owned".to_owned()));
        assert_eq!(fault.message(), "owned");

        let fault = FaultHandler::fault_from_panic(Box::new(42_u8));
        assert_eq!(fault.message(), "Unknown panic message");
    }

    #[test]
    fn catch_passes_successful_responses_through() {
        let handler = FaultHandler::new(
            HandlerConfig::default().with_log_errors(false),
            ViewConfig::default(),
        );
        let res = handler
            .catch(RequestKind::PageView, || Ok(Response::new("ok".to_owned())))
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::OK);
        assert_eq!(res.body(), "ok");
    }

    #[test]
    fn catch_renders_panics_as_error_responses() {
        let handler = FaultHandler::new(
            HandlerConfig::default().with_log_errors(false),
            ViewConfig::default(),
        );
        let res = handler
            .catch(RequestKind::PageView, || panic!("service panic"))
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.body().contains("service panic"));
    }
}
