//! Alert formatter - renders the chat message for an unhandled error.

use std::fmt::Write;

use crate::domain::{AlertConfiguration, ExceptionContext, MAX_MESSAGE_CHARS, StackFrame};

/// Compose the alert text, truncated to [`MAX_MESSAGE_CHARS`].
pub fn format(ctx: &ExceptionContext, cfg: &AlertConfiguration) -> String {
    let mut text = mentions(&cfg.mention_handles);

    let _ = writeln!(text, "{} request to {}", ctx.http_method, ctx.request_uri);
    if let Some(user_agent) = ctx.user_agent() {
        let _ = writeln!(text, "\twith user agent: {user_agent}");
    }
    if let Some(referer) = ctx.referer() {
        let _ = writeln!(text, "\twith referer: {referer}");
    }
    let _ = write!(
        text,
        "\tthrew\n\n{}\n\n\"{}\" at {} line {}",
        ctx.exception_type, ctx.message, ctx.source_location.file, ctx.source_location.line
    );

    if cfg.include_stack_trace {
        let trace = trace_block(&ctx.stack_frames, cfg.application_root.as_deref());
        if !trace.is_empty() {
            text.push_str("\n\n\n");
            text.push_str(&trace);
        }
    }

    truncate(text, MAX_MESSAGE_CHARS)
}

/// ` <ops> <dev-team>\n`, or nothing without handles.
fn mentions(handles: &[String]) -> String {
    let mut out: String = handles
        .iter()
        .map(|handle| handle.trim())
        .filter(|handle| !handle.is_empty())
        .map(|handle| format!(" <{handle}>"))
        .collect();

    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn trace_block(frames: &[StackFrame], application_root: Option<&str>) -> String {
    frames
        .iter()
        .map(|frame| {
            format!(
                "*{}:{}*   {}:{}",
                relative_path(&frame.file, application_root),
                frame.line,
                frame.scope,
                frame.function
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn relative_path<'a>(file: &'a str, application_root: Option<&str>) -> &'a str {
    let Some(root) = application_root
        .map(|root| root.trim_end_matches(['/', '\\']))
        .filter(|root| !root.is_empty())
    else {
        return file;
    };

    // Only strip whole path segments.
    match file.strip_prefix(root) {
        Some(rest) if rest.starts_with(['/', '\\']) => rest.trim_start_matches(['/', '\\']),
        _ => file,
    }
}

/// Keep the first `max_chars` characters.
fn truncate(mut text: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
    text
}
