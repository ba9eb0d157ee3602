//! Running user-configured external commands.
//!
//! Click injection and desktop notifications are delegated to whatever tool
//! the user has (`ydotool`, `wtype`, `notify-send`, …).  Commands are
//! configured as argv vectors and run without a shell.

use crate::diagnostic::Diagnostic;
use crate::traits::DiagnosticSink;
use log::{debug, warn};
use std::process::Command;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("no command configured")]
    Empty,
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Status {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Run `argv` followed by `extra` and wait for it to exit successfully.
pub fn run(argv: &[String], extra: &[&str]) -> Result<(), ExecError> {
    let (program, args) = argv.split_first().ok_or(ExecError::Empty)?;
    debug!("exec {} {:?} {:?}", program, args, extra);

    let status = Command::new(program)
        .args(args)
        .args(extra)
        .status()
        .map_err(|source| ExecError::Spawn {
            program: program.clone(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(ExecError::Status {
            program: program.clone(),
            status,
        })
    }
}

/// A [`DiagnosticSink`] that hands every notice to an external notifier,
/// with the notice text as the last argument.
///
/// With an empty command, notices are only logged by the selector.
pub struct CommandSink {
    argv: Vec<String>,
}

impl CommandSink {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl DiagnosticSink for CommandSink {
    fn report(&self, diagnostic: &Diagnostic) {
        if self.argv.is_empty() {
            return;
        }
        let text = diagnostic.to_string();
        if let Err(e) = run(&self.argv, &[text.as_str()]) {
            warn!("could not deliver notice: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_argv_is_an_error() {
        assert!(matches!(run(&[], &[]), Err(ExecError::Empty)));
    }

    #[test]
    fn successful_command() {
        run(&argv(&["true"]), &[]).unwrap();
    }

    #[test]
    fn failing_command_reports_status() {
        let err = run(&argv(&["false"]), &[]).unwrap_err();
        assert!(matches!(err, ExecError::Status { .. }));
        assert!(err.to_string().starts_with("false exited"));
    }

    #[test]
    fn missing_program_reports_spawn_error() {
        let err = run(&argv(&["/nonexistent/gridpointer-notify"]), &[]).unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn extra_arguments_are_appended() {
        // `test` succeeds only if it receives exactly these operands.
        run(&argv(&["test", "a"]), &["=", "a"]).unwrap();
        assert!(run(&argv(&["test", "a"]), &["=", "b"]).is_err());
    }

    #[test]
    fn sink_tolerates_empty_and_failing_commands() {
        let notice = Diagnostic::new(DiagnosticKind::StaleReference, "gone");
        CommandSink::new(Vec::new()).report(&notice);
        CommandSink::new(argv(&["false"])).report(&notice);
    }
}
