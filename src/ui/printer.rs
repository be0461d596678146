// sls-logs - ui/printer.rs
//
// Renders stream events as coloured terminal lines.
//
// Layout:
//   <name> stdout: <text>            name green, text red if it mentions "error"
//   <name> stderr: <text>            name and text red
//   <name> child process exited with code <n>   green on 0, red otherwise
//   (blank line after every session summary)
//
// Successful summaries go to stdout; failures and stderr lines to stderr.

use crate::app::run::EventSink;
use crate::core::model::{StreamEvent, Tone};
use crate::core::relay;
use crate::ui::theme::paint;
use std::io::{self, Write};

/// Which of the parent's output streams a rendered line belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Stdout,
    Stderr,
}

/// Render one event into zero or more `(target, line)` pairs.
pub fn render_event(event: &StreamEvent) -> Vec<(Target, String)> {
    match event {
        StreamEvent::Started { .. } => Vec::new(),
        StreamEvent::Line { name, stream, text } => {
            let target = match stream {
                crate::core::model::StreamKind::Stdout => Target::Stdout,
                crate::core::model::StreamKind::Stderr => Target::Stderr,
            };
            let line = format!(
                "{} {} {}",
                paint(name, relay::name_tone(*stream)),
                stream.label(),
                paint(text, relay::classify(*stream, text)),
            );
            vec![(target, line)]
        }
        StreamEvent::Exited { name, status } => {
            let (target, tone) = if status.is_success() {
                (Target::Stdout, Tone::Success)
            } else {
                (Target::Stderr, Tone::Error)
            };
            let summary = format!("{name} child process exited with {status}");
            vec![(target, paint(&summary, tone).to_string()), (Target::Stdout, String::new())]
        }
        StreamEvent::Failed { name, message } => {
            let summary = format!("{name} {message}");
            vec![
                (Target::Stderr, paint(&summary, Tone::Error).to_string()),
                (Target::Stdout, String::new()),
            ]
        }
    }
}

/// Writes rendered events to a pair of writers.
pub struct Printer<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Printer<io::Stdout, io::Stderr> {
    /// Printer over the process's own stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Printer<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }
}

impl<O: Write, E: Write> EventSink for Printer<O, E> {
    fn handle(&mut self, event: &StreamEvent) -> io::Result<()> {
        for (target, line) in render_event(event) {
            match target {
                Target::Stdout => {
                    writeln!(self.out, "{line}")?;
                    self.out.flush()?;
                }
                Target::Stderr => {
                    writeln!(self.err, "{line}")?;
                    self.err.flush()?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{SessionExit, StreamKind};

    const RED: &str = "\u{1b}[31m";
    const GREEN: &str = "\u{1b}[32m";

    fn line(stream: StreamKind, text: &str) -> StreamEvent {
        StreamEvent::Line {
            name: "getUser".into(),
            stream,
            text: text.into(),
        }
    }

    #[test]
    fn test_stdout_error_line_is_red() {
        colored::control::set_override(true);
        let rendered = render_event(&line(StreamKind::Stdout, "ERROR: boom"));
        assert_eq!(rendered.len(), 1);
        let (target, text) = &rendered[0];
        assert_eq!(*target, Target::Stdout);
        assert!(text.starts_with(&format!("{GREEN}getUser")), "{text:?}");
        assert!(text.contains(&format!("stdout: {RED}ERROR: boom")), "{text:?}");
    }

    #[test]
    fn test_stdout_plain_line_has_no_colour_on_text() {
        colored::control::set_override(true);
        let rendered = render_event(&line(StreamKind::Stdout, "START RequestId"));
        assert!(rendered[0].1.ends_with("stdout: START RequestId"));
    }

    #[test]
    fn test_stderr_line_always_red() {
        colored::control::set_override(true);
        let rendered = render_event(&line(StreamKind::Stderr, "warning: slow"));
        let (target, text) = &rendered[0];
        assert_eq!(*target, Target::Stderr);
        assert!(text.starts_with(&format!("{RED}getUser")));
        assert!(text.contains(&format!("stderr: {RED}warning: slow")));
    }

    #[test]
    fn test_exit_summaries() {
        colored::control::set_override(true);
        let ok = render_event(&StreamEvent::Exited {
            name: "a".into(),
            status: SessionExit::Code(0),
        });
        assert_eq!(ok[0].0, Target::Stdout);
        assert!(ok[0].1.contains(GREEN));
        assert!(ok[0].1.contains("a child process exited with code 0"));
        assert_eq!(ok[1], (Target::Stdout, String::new()));

        let bad = render_event(&StreamEvent::Exited {
            name: "b".into(),
            status: SessionExit::Code(2),
        });
        assert_eq!(bad[0].0, Target::Stderr);
        assert!(bad[0].1.contains(RED));
        assert!(bad[0].1.contains("exited with code 2"));
    }

    #[test]
    fn test_started_prints_nothing() {
        let rendered = render_event(&StreamEvent::Started {
            name: "a".into(),
            command: "yarn sls logs -t -f a".into(),
        });
        assert!(rendered.is_empty());
    }

    #[test]
    fn test_printer_routes_to_writers() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut printer = Printer::new(&mut out, &mut err);
        printer.handle(&line(StreamKind::Stdout, "hello")).unwrap();
        printer.handle(&line(StreamKind::Stderr, "oops")).unwrap();
        drop(printer);
        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert!(out.contains("stdout: hello"));
        assert!(err.contains("stderr: oops"));
    }
}
