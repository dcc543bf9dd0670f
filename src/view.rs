//! Decide what detail a fault response reveals, and in which shape.
//!
//! The [`ErrorView`] renders a [`Fault`] either as an HTML error page
//! (page-view requests) or as a JSON payload (data-exchange requests).
//! How much detail the response carries depends on the configured
//! [`Environment`] and debug flag: development sees the full picture,
//! production never sees file paths, line numbers or traces on page
//! views, and known sensitive messages are replaced outright.

use crate::error::OpaqueError;
use crate::fault::Fault;
use http::{HeaderValue, Method, Response, StatusCode, header};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// The application environment a response is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = OpaqueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(OpaqueError::from_display(format!(
                "invalid environment: {s}"
            ))),
        }
    }
}

/// Options of an [`ErrorView`].
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Environment responses are rendered for. Default:
    /// [`Environment::Development`].
    pub env: Environment,
    /// Whether verbose fault detail is permitted in data-exchange
    /// responses. Default: `true`.
    pub debug: bool,
    /// Base URL of the application, possibly a full URL.
    /// Default: `"/"`.
    pub base_url: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            debug: true,
            base_url: "/".to_owned(),
        }
    }
}

impl ViewConfig {
    #[must_use]
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Base path safe for interpolation into generated links.
    ///
    /// A base URL carrying a scheme is reduced to its bare host:
    /// `http://`/`https://` and any `/` characters are stripped. Plain
    /// paths pass through unchanged.
    #[must_use]
    pub fn base_path(&self) -> String {
        if self.base_url.contains("http") {
            self.base_url
                .replace("http://", "")
                .replace("https://", "")
                .replace('/', "")
        } else {
            self.base_url.clone()
        }
    }
}

/// What shape of response the failing request expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// The request expects an HTML document.
    PageView,
    /// The request expects a structured (JSON) payload.
    DataExchange,
}

impl RequestKind {
    /// Classify an HTTP method: write-style methods expect a
    /// structured payload, everything else an HTML document.
    #[must_use]
    pub fn of_method(method: &Method) -> Self {
        if [Method::POST, Method::PUT, Method::PATCH, Method::DELETE].contains(method) {
            Self::DataExchange
        } else {
            Self::PageView
        }
    }
}

/// A case-sensitive substring rule hiding storage-layer internals from
/// data-exchange responses.
///
/// When the needle occurs in the outgoing message, the whole message is
/// replaced by the rule's replacement, regardless of environment or
/// debug flag.
#[derive(Debug, Clone)]
pub struct SanitizeRule {
    needle: String,
    replacement: String,
}

impl SanitizeRule {
    pub fn new(needle: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
            replacement: replacement.into(),
        }
    }

    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        message.contains(&self.needle)
    }

    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

fn default_sanitize_rules() -> Vec<SanitizeRule> {
    vec![SanitizeRule::new(
        "1062 Duplicate entry",
        "1062 Duplicate entry for documents is not allowed!",
    )]
}

#[derive(Debug, Serialize)]
struct ErrorPayload {
    #[serde(rename = "type")]
    kind: &'static str,
    msg: String,
}

const GENERIC_SUPPORT_MSG: &str =
    "Exception Server Error: Something didn't go right. Try again later or contact support.";

const GENERIC_ADMIN_MSG: &str =
    "An error occurred on the server. Please Contact your Administrator or try again later.";

const NO_VIEW_FALLBACK: &str = "No error view file found";

/// Renders faults as HTML error pages or JSON payloads.
#[derive(Debug)]
pub struct ErrorView {
    config: ViewConfig,
    custom_error_page: Option<PathBuf>,
    sanitizers: Vec<SanitizeRule>,
}

impl ErrorView {
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            custom_error_page: None,
            sanitizers: default_sanitize_rules(),
        }
    }

    /// Use a custom template file for the development error page.
    #[must_use]
    pub fn with_error_page(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_error_page = Some(path.into());
        self
    }

    #[must_use]
    pub fn maybe_with_error_page(mut self, path: Option<PathBuf>) -> Self {
        self.custom_error_page = path;
        self
    }

    /// Append a sanitization rule. Rules are checked in insertion
    /// order; the first match wins.
    #[must_use]
    pub fn with_sanitize_rule(mut self, rule: SanitizeRule) -> Self {
        self.sanitizers.push(rule);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Render the response for a fault.
    #[must_use]
    pub fn display(&self, fault: &Fault, kind: RequestKind) -> Response<String> {
        match kind {
            RequestKind::PageView => self.page_response(fault),
            RequestKind::DataExchange => self.payload_response(fault),
        }
    }

    fn page_response(&self, fault: &Fault) -> Response<String> {
        let body = if self.config.env.is_development() {
            self.render_error_page(&self.verbose_data(fault))
        } else {
            render_template(ERROR_PAGE_MINIMAL, &self.reduced_data(fault))
        };

        let mut res = Response::new(body);
        *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        res
    }

    fn payload_response(&self, fault: &Fault) -> Response<String> {
        let detail = if self.config.debug {
            format!(
                "Error {}: {} in file {} on line {}",
                fault.severity().label(),
                fault.message(),
                fault.file(),
                fault.line()
            )
        } else {
            fault.message().to_owned()
        };

        let msg = if let Some(rule) = self.sanitizers.iter().find(|rule| rule.matches(&detail)) {
            rule.replacement().to_owned()
        } else if self.config.env.is_development() {
            format!("Exception Server Error: {detail}")
        } else if self.config.debug {
            detail
        } else {
            GENERIC_SUPPORT_MSG.to_owned()
        };

        let payload = ErrorPayload { kind: "error", msg };
        let body = serde_json::to_string(&payload).unwrap_or_else(|_| {
            r#"{"type":"error","msg":"Exception Server Error"}"#.to_owned()
        });

        let mut res = Response::new(body);
        res.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        res
    }

    fn verbose_data(&self, fault: &Fault) -> Vec<(&'static str, String)> {
        let severity = fault.severity();
        let frame = fault.context_frame();
        let class = frame
            .and_then(|frame| frame.class.as_deref())
            .unwrap_or("FaultHandler");
        let function = frame.map_or("escalate", |frame| frame.function.as_str());
        let call_kind = frame.map_or_else(Default::default, |frame| frame.call_kind);

        vec![
            ("status_code", "500".to_owned()),
            ("object", escape_html(fault.kind_name())),
            ("class", escape_html(class)),
            ("call_kind", escape_html(call_kind.as_str())),
            ("function", escape_html(function)),
            ("label", escape_html(severity.label())),
            ("color", severity.color().as_str().to_owned()),
            ("message", escape_html(fault.message())),
            ("file", escape_html(fault.file())),
            ("line", fault.line().to_string()),
            ("base_path", escape_html(&self.config.base_path())),
            ("trace", escape_html(&fault.trace_text())),
        ]
    }

    fn reduced_data(&self, fault: &Fault) -> Vec<(&'static str, String)> {
        let message = if self.config.debug {
            fault.message().to_owned()
        } else {
            GENERIC_ADMIN_MSG.to_owned()
        };
        vec![
            ("status_code", "500".to_owned()),
            ("message", escape_html(&message)),
            ("base_path", escape_html(&self.config.base_path())),
        ]
    }

    fn render_error_page(&self, data: &[(&'static str, String)]) -> String {
        let source = match &self.custom_error_page {
            Some(path) => match fs::read_to_string(path) {
                Ok(source) => Cow::Owned(source),
                Err(err) => {
                    tracing::warn!(
                        file = %path.display(),
                        error = %err,
                        "error view template not found",
                    );
                    return NO_VIEW_FALLBACK.to_owned();
                }
            },
            None => Cow::Borrowed(ERROR_PAGE),
        };
        render_template(&source, data)
    }
}

fn render_template(source: &str, data: &[(&'static str, String)]) -> String {
    let mut out = source.to_owned();
    for (key, value) in data {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{status_code}} | Server Error</title>
<style>
body{font-family:'Segoe UI',Tahoma,Geneva,Verdana,sans-serif;background:#f7fafc;color:#1a202c;margin:0}
.wrap{max-width:46rem;margin:0 auto;padding:2rem 1rem}
.status{font-size:30px;color:#a0aec0;letter-spacing:.05em;text-align:center;padding:1rem 0}
.badge{display:inline-block;padding:.25rem .5rem;border-radius:.25rem;color:#fff}
.badge.danger{background:#e53e3e}
.badge.warning{background:#dd6b20}
.badge.info{background:#3182ce}
.badge.gray{background:#718096}
table{width:100%;border:1px solid #1a202c;border-collapse:collapse}
th,td{border:1px solid #2d3748;padding:15px;text-align:left}
pre{background:#1a202c;color:#edf2f7;padding:1rem;overflow:auto}
.back-btn{color:#a0aec0;margin-top:30px;display:inline-block}
</style>
</head>
<body>
<div class="wrap">
<div class="status">{{status_code}} | SERVER ERROR</div>
<p><span class="badge {{color}}">{{label}}</span>
{{object}} thrown in {{class}}{{call_kind}}{{function}}()</p>
<table>
<tr><th>Error</th><td>{{message}}</td></tr>
<tr><th>File</th><td>{{file}}</td></tr>
<tr><th>Line</th><td>{{line}}</td></tr>
</table>
<pre>{{trace}}</pre>
<a class="back-btn" href="{{base_path}}">Home</a>
</div>
</body>
</html>
"#;

const ERROR_PAGE_MINIMAL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{status_code}} | Server Error</title>
<style>
body{font-family:'Segoe UI',Tahoma,Geneva,Verdana,sans-serif;background:#f7fafc;color:#1a202c;margin:0}
.wrap{max-width:46rem;margin:0 auto;padding:2rem 1rem}
.status{font-size:30px;color:#a0aec0;letter-spacing:.05em;text-align:center;padding:1rem 0}
table{width:100%;border:1px solid #1a202c;border-collapse:collapse}
th,td{border:1px solid #2d3748;padding:15px;text-align:left}
.back-btn{color:#a0aec0;margin-top:30px;display:inline-block}
</style>
</head>
<body>
<div class="wrap">
<div class="status">{{status_code}} | SERVER ERROR</div>
<table>
<tr><th>Error</th><td>{{message}}</td></tr>
</table>
<a class="back-btn" href="{{base_path}}">Home</a>
</div>
</body>
</html>
"#;
