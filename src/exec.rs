// src/exec.rs

//! Command-backed tasks.
//!
//! The scheduler core is agnostic about what a task does; this module is
//! the boundary adapter the CLI uses. Each plan task becomes a [`CmdTask`]
//! that runs a shell command with `tokio::process::Command`: the current
//! fact-store snapshot is written to the child's stdin as JSON, and the
//! child's stdout becomes the result payload (parsed as JSON when possible,
//! kept as a string otherwise).

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::model::TaskSection;
use crate::facts::FactStore;
use crate::task::{Capability, Task};

/// A task whose work is an external command.
#[derive(Debug, Clone)]
pub struct CmdTask {
    name: String,
    cmd: String,
    produces: Vec<Capability>,
    requires: Vec<Capability>,
}

impl CmdTask {
    pub fn new(
        name: impl Into<String>,
        cmd: impl Into<String>,
        produces: Vec<Capability>,
        requires: Vec<Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            produces,
            requires,
        }
    }

    pub fn from_plan(section: &TaskSection) -> Self {
        Self::new(
            section.name.clone(),
            section.cmd.clone(),
            section.produces.clone(),
            section.requires.clone(),
        )
    }
}

#[async_trait]
impl Task for CmdTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn produces(&self) -> &[Capability] {
        &self.produces
    }

    fn requires(&self) -> &[Capability] {
        &self.requires
    }

    async fn run(&self, facts: &FactStore) -> Result<Value> {
        debug!(task = %self.name, cmd = %self.cmd, "starting task process");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for task '{}'", self.name))?;

        // Hand the child the current facts; closing stdin signals EOF.
        let snapshot = serde_json::to_vec(&facts.as_json())
            .context("serializing fact snapshot")?;
        let stdin = child.stdin.take();

        // The write and the output collection must proceed concurrently: a
        // snapshot larger than the pipe buffers would otherwise deadlock
        // against a child that emits output while it reads.
        let write_facts = async {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(&snapshot).await {
                    Ok(()) => Ok(()),
                    // A child may exit without reading its input.
                    Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                    Err(err) => Err(err),
                }
            } else {
                Ok(())
            }
        };

        let (written, output) = tokio::join!(write_facts, child.wait_with_output());
        written.with_context(|| format!("writing facts to task '{}'", self.name))?;
        let output =
            output.with_context(|| format!("waiting for task '{}'", self.name))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "command exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        Ok(parse_payload(&output.stdout))
    }
}

/// Interpret a child's stdout as a result payload.
///
/// Valid JSON is taken as-is (objects get the shallow-union merge in the
/// fact store); anything else is stored as a plain string; empty output
/// becomes an empty object so the produced capabilities still register.
fn parse_payload(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Value::Object(Map::new());
    }

    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}
