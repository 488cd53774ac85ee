#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;

use capflow::facts::FactStore;
use capflow::task::{Capability, Task};

/// In-memory task for driving the scheduler without processes.
pub struct StubTask {
    name: String,
    produces: Vec<Capability>,
    requires: Vec<Capability>,
    payload: Value,
    fail_with: Option<String>,
}

impl StubTask {
    pub fn ok(
        name: &str,
        produces: &[&str],
        requires: &[&str],
        payload: Value,
    ) -> Box<dyn Task> {
        Box::new(Self {
            name: name.to_string(),
            produces: produces.iter().map(|s| s.to_string()).collect(),
            requires: requires.iter().map(|s| s.to_string()).collect(),
            payload,
            fail_with: None,
        })
    }

    pub fn failing(
        name: &str,
        produces: &[&str],
        requires: &[&str],
        message: &str,
    ) -> Box<dyn Task> {
        Box::new(Self {
            name: name.to_string(),
            produces: produces.iter().map(|s| s.to_string()).collect(),
            requires: requires.iter().map(|s| s.to_string()).collect(),
            payload: Value::Null,
            fail_with: Some(message.to_string()),
        })
    }
}

#[async_trait]
impl Task for StubTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn produces(&self) -> &[Capability] {
        &self.produces
    }

    fn requires(&self) -> &[Capability] {
        &self.requires
    }

    async fn run(&self, _facts: &FactStore) -> Result<Value> {
        match &self.fail_with {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(self.payload.clone()),
        }
    }
}
