use std::backtrace::Backtrace;
use std::panic::Location;

/// Where an error was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// One frame of the call stack at the point of failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    /// Module path (or type path for methods) enclosing the function.
    pub scope: String,
    pub function: String,
}

impl StackFrame {
    /// Frames of a captured backtrace, innermost first.
    ///
    /// A disabled or unsupported backtrace yields no frames.
    pub fn from_backtrace(backtrace: &Backtrace) -> Vec<StackFrame> {
        Self::parse_backtrace(&backtrace.to_string())
    }

    /// Parse the `Display` rendering of a [`Backtrace`].
    ///
    /// Frames without a resolved source location are dropped, as are the
    /// capture machinery frames at the top of the stack.
    pub fn parse_backtrace(rendered: &str) -> Vec<StackFrame> {
        let mut frames = Vec::new();
        let mut pending: Option<&str> = None;

        for line in rendered.lines() {
            let trimmed = line.trim();

            if let Some(location) = trimmed.strip_prefix("at ") {
                let Some(symbol) = pending.take() else {
                    continue;
                };
                if let Some((file, line)) = split_file_line(location) {
                    let (scope, function) = split_symbol(symbol);
                    frames.push(StackFrame {
                        file: file.to_string(),
                        line,
                        scope: scope.to_string(),
                        function: function.to_string(),
                    });
                }
            } else if let Some((index, symbol)) = trimmed.split_once(": ") {
                if index.chars().all(|c| c.is_ascii_digit()) {
                    pending = Some(strip_hash(symbol));
                }
            }
        }

        let skip = frames
            .iter()
            .take_while(|frame| is_capture_frame(&frame.scope))
            .count();
        frames.drain(..skip);
        frames
    }
}

fn is_capture_frame(scope: &str) -> bool {
    let scope = scope.trim_start_matches('<');
    scope.starts_with("std::backtrace") || scope.starts_with("std::panic::Location")
}

/// `path/to/file.rs:12:5` → (`path/to/file.rs`, 12)
fn split_file_line(location: &str) -> Option<(&str, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next()?;
    let middle = parts.next()?;

    match parts.next() {
        Some(file) => Some((file, middle.parse().ok()?)),
        None => Some((middle, last.parse().ok()?)),
    }
}

/// Drop the `::h0123456789abcdef` disambiguator of a mangled-looking symbol.
fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) => {
            head
        }
        _ => symbol,
    }
}

/// Split `a::b::<T as c::D>::f` at the last `::` outside angle brackets.
fn split_symbol(symbol: &str) -> (&str, &str) {
    let bytes = symbol.as_bytes();
    let mut depth = 0i32;
    let mut split_at = None;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth -= 1,
            b':' if depth == 0 && i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                split_at = Some(i);
            }
            _ => {}
        }
    }

    match split_at {
        Some(i) if i > 0 && bytes[i - 1] != b':' => (&symbol[..i], &symbol[i + 2..]),
        _ => ("", symbol),
    }
}

/// Everything known about one unhandled error and the request it broke.
///
/// Built at the error boundary, consumed by the filter and the formatter,
/// then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionContext {
    /// HTTP status carried by the error itself, if it is an HTTP-level error.
    pub status_code: Option<u16>,
    pub exception_type: String,
    /// `exception_type` followed by its ancestors, nearest first.
    pub type_lineage: Vec<String>,
    pub message: String,
    pub source_location: SourceLocation,
    pub stack_frames: Vec<StackFrame>,
    pub http_method: String,
    pub request_uri: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ExceptionContext {
    pub fn new(
        exception_type: impl Into<String>,
        message: impl Into<String>,
        source_location: SourceLocation,
    ) -> Self {
        let exception_type = exception_type.into();
        Self {
            status_code: None,
            type_lineage: vec![exception_type.clone()],
            exception_type,
            message: message.into(),
            source_location,
            stack_frames: Vec::new(),
            http_method: String::new(),
            request_uri: String::new(),
            user_agent: None,
            referer: None,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Replace the lineage; the exception type itself is always kept first.
    pub fn with_lineage(mut self, lineage: Vec<String>) -> Self {
        let mut full = vec![self.exception_type.clone()];
        full.extend(lineage.into_iter().filter(|t| *t != self.exception_type));
        self.type_lineage = full;
        self
    }

    pub fn with_request(mut self, method: impl Into<String>, uri: impl Into<String>) -> Self {
        self.http_method = method.into();
        self.request_uri = uri.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_referer(mut self, referer: Option<String>) -> Self {
        self.referer = referer;
        self
    }

    pub fn with_stack_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.stack_frames = frames;
        self
    }

    /// Exact-or-ancestor type match. Empty names never match.
    pub fn is_a(&self, type_name: &str) -> bool {
        !type_name.is_empty() && self.type_lineage.iter().any(|t| t == type_name)
    }

    /// Referer header, if present and non-empty.
    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref().filter(|r| !r.is_empty())
    }

    /// User-Agent header, if present and non-empty.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref().filter(|ua| !ua.is_empty())
    }
}
