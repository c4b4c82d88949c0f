//! Error rendering using ariadne
//!
//! Script failures carry their position only inside the engine's backtrace.
//! This module recovers it with [`ScriptError::location`] and draws the
//! offending source line with a labelled report.

use crate::{Error, ScriptError};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;

/// Render an error with formatting to stderr
///
/// `source` is the text that was evaluated; it is only used when the
/// error's stack points into it.
///
/// # Example
/// ```no_run
/// use quickbind::{EvalType, Runtime, render_error};
///
/// let runtime = Runtime::new().unwrap();
/// let ctx = runtime.new_context().unwrap();
///
/// let source = "null.x";
/// if let Err(e) = ctx.eval(source, "<input>", EvalType::Global) {
///     render_error(&e.into(), source);
/// }
/// ```
pub fn render_error(error: &Error, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, source: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String (useful for web UIs, logs, etc.)
pub fn render_error_to_string(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Script(script) => render_script_error(script, source, writer, use_color),
        Error::Allocation(what) => writeln!(writer, "Error: failed to allocate {}", what),
    }
}

fn render_script_error(
    error: &ScriptError,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let headline = error.to_string();
    let Some(location) = error.location() else {
        return writeln!(writer, "Error: {}", headline);
    };
    let Some(span) = line_span(source, location.line, location.column) else {
        writeln!(writer, "Error: {}", headline)?;
        return writeln!(writer, "  at {}", location);
    };

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let file = location.file.as_str();
    let report = Report::build(ReportKind::Error, (file, span.clone()))
        .with_message(&headline)
        .with_config(ariadne::Config::default().with_color(use_color))
        .with_label(
            Label::new((file, span))
                .with_message(format!("{} thrown here", error.name))
                .with_color(colors.next()),
        );

    report.finish().write((file, Source::from(source)), &mut *writer)
}

/// Byte range of a 1-based line, narrowed to a single character when a
/// 1-based column is known. Leading indentation is not underlined.
fn line_span(source: &str, line: u32, column: Option<u32>) -> Option<Range<usize>> {
    let index = usize::try_from(line).ok()?.checked_sub(1)?;
    let mut start = 0;
    for (i, text) in source.split('\n').enumerate() {
        let end = start + text.len();
        if i == index {
            if let Some(column) = column {
                let offset = start + usize::try_from(column).ok()?.saturating_sub(1);
                if offset < end {
                    return Some(offset..offset + 1);
                }
            }
            let indent = text.len() - text.trim_start().len();
            let text_end = start + text.trim_end().len();
            return Some((start + indent).min(text_end)..text_end.max(start + indent));
        }
        start = end + 1;
    }
    None
}
