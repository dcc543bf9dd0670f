//! Configuration of the fault handler.

use crate::severity::Severity;
use std::path::PathBuf;

/// Options of a [`FaultHandler`][crate::FaultHandler].
///
/// Construct with [`HandlerConfig::default`] and override individual
/// fields with the `with_*` methods; the handler takes ownership at
/// construction and the configuration is immutable afterwards.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Whether uncaught faults are persisted to disk. Default: `true`.
    pub log_errors: bool,
    /// Directory fault log files are written to.
    /// Default: `storage/logs`.
    pub log_directory: PathBuf,
    /// Whether fault logs are redirected to the developer log
    /// directory. Default: `false`.
    pub dev_logs: bool,
    /// Directory developer fault logs are written to.
    /// Default: `storage/logs/dev`.
    pub dev_logs_directory: PathBuf,
    /// Severities that are escalated into catchable faults; severities
    /// outside the mask stay suppressed. Default: [`Severity::all`].
    pub report_mask: Severity,
    /// Runtime-wide display-errors setting, exposed to the embedding
    /// runtime. Default: `false`.
    pub display_errors: bool,
    /// Custom template file for the development error page. When the
    /// file cannot be read at render time the page degrades to a fixed
    /// fallback string. Default: the built-in template.
    pub error_view: Option<PathBuf>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            log_errors: true,
            log_directory: PathBuf::from("storage/logs"),
            dev_logs: false,
            dev_logs_directory: PathBuf::from("storage/logs/dev"),
            report_mask: Severity::all(),
            display_errors: false,
            error_view: None,
        }
    }
}

impl HandlerConfig {
    #[must_use]
    pub fn with_log_errors(mut self, log_errors: bool) -> Self {
        self.log_errors = log_errors;
        self
    }

    #[must_use]
    pub fn with_log_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_directory = dir.into();
        self
    }

    #[must_use]
    pub fn with_dev_logs(mut self, dev_logs: bool) -> Self {
        self.dev_logs = dev_logs;
        self
    }

    #[must_use]
    pub fn with_dev_logs_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dev_logs_directory = dir.into();
        self
    }

    #[must_use]
    pub fn with_report_mask(mut self, mask: Severity) -> Self {
        self.report_mask = mask;
        self
    }

    #[must_use]
    pub fn with_display_errors(mut self, display_errors: bool) -> Self {
        self.display_errors = display_errors;
        self
    }

    #[must_use]
    pub fn with_error_view(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_view = Some(path.into());
        self
    }

    #[must_use]
    pub fn maybe_with_error_view(mut self, path: Option<PathBuf>) -> Self {
        self.error_view = path;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = HandlerConfig::default();
        assert!(config.log_errors);
        assert_eq!(config.log_directory, PathBuf::from("storage/logs"));
        assert!(!config.dev_logs);
        assert_eq!(
            config.dev_logs_directory,
            PathBuf::from("storage/logs/dev")
        );
        assert_eq!(config.report_mask, Severity::all());
        assert!(!config.display_errors);
        assert!(config.error_view.is_none());
    }

    #[test]
    fn builders_override_field_by_field() {
        let config = HandlerConfig::default()
            .with_log_errors(false)
            .with_log_directory("/var/log/app")
            .with_report_mask(Severity::ERROR | Severity::WARNING)
            .with_error_view("views/errors/error.html");
        assert!(!config.log_errors);
        assert_eq!(config.log_directory, PathBuf::from("/var/log/app"));
        assert_eq!(config.report_mask, Severity::ERROR | Severity::WARNING);
        assert_eq!(
            config.error_view.as_deref(),
            Some(std::path::Path::new("views/errors/error.html"))
        );
        // untouched fields keep their defaults
        assert!(!config.dev_logs);
    }
}
