//! Subprocess helper shared by the bundler and the runtime validator.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::{CompileError, CompileResult};

/// Run `program` to completion and capture its output.
///
/// The child is killed if the future is dropped (client went away) or the
/// optional timeout fires.
pub(crate) async fn run_tool<I, S>(
    program: &Path,
    args: I,
    timeout: Option<Duration>,
) -> CompileResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program_name = program.display().to_string();

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => CompileError::ToolUnavailable {
                program: program_name.clone(),
                source,
            },
            _ => CompileError::io("spawn", program, source),
        })?;

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| CompileError::Timeout {
                program: program_name.clone(),
                timeout: limit,
            })?,
        None => child.wait_with_output().await,
    };

    output.map_err(|source| CompileError::io("wait for", program, source))
}

/// Best human-readable message from a failed tool run.
pub(crate) fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    format!("process exited with {}", output.status)
}
