//! External process execution behind a narrow, testable seam.
//!
//! Every media tool invocation (normalize, probe, compress, segment) goes
//! through `ProcessRunner`, so the pipeline stages are unit-testable with a
//! mock runner and never depend on ffmpeg being installed.

use crate::error::{MediascribeError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::process::Command;

/// Captured result of a finished external process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// Exit code; -1 when the process was killed by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Returns true if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Trait for running external commands.
///
/// Object-safe, Send + Sync for use across async stages.
/// Enables testability by allowing mock implementations.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command to completion and capture its output.
    ///
    /// Returns `ToolNotFound` if the binary is missing, `Io` for other spawn
    /// failures. A non-zero exit is NOT an error at this level — callers
    /// decide how to interpret the exit code.
    async fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput>;
}

/// Production runner using tokio::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MediascribeError::ToolNotFound {
                        tool: program.to_string(),
                    }
                } else {
                    MediascribeError::ToolFailed {
                        tool: program.to_string(),
                        message: format!("failed to start: {}", e),
                    }
                }
            })?;

        Ok(ProcessOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// A single call recorded by `MockProcessRunner`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
}

/// Mock runner for testing pipeline stages without external tools.
///
/// Responses are consumed in FIFO order, one per `run` call; when the queue
/// is empty, a successful empty output is returned. All calls are recorded.
#[derive(Default)]
pub struct MockProcessRunner {
    responses: Mutex<VecDeque<Result<ProcessOutput>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful run with the given stdout.
    pub fn with_stdout(self, stdout: &str) -> Self {
        self.push_response(Ok(ProcessOutput {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));
        self
    }

    /// Queue a run that exits with the given non-zero code.
    pub fn with_exit_code(self, code: i32, stderr: &str) -> Self {
        self.push_response(Ok(ProcessOutput {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }));
        self
    }

    /// Queue a missing-binary failure.
    pub fn with_tool_missing(self, tool: &str) -> Self {
        self.push_response(Err(MediascribeError::ToolNotFound {
            tool: tool.to_string(),
        }));
        self
    }

    fn push_response(&self, response: Result<ProcessOutput>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            });
        }
        let queued = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front());
        match queued {
            Some(response) => response,
            None => Ok(ProcessOutput {
                code: 0,
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }
}
