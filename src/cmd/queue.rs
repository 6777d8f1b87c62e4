//! Command output and deferred hooks

use std::collections::VecDeque;

use tracing::debug;

use super::find::FindState;
use super::format::{self, FormatContext};

/// Output side of a running command
///
/// Everything here is fire-and-forget: nothing the pipeline does can fail the
/// command that uses it.
pub trait CommandPipeline {
    fn format(&self, template: &str, context: &FormatContext) -> String {
        format::expand(template, context)
    }

    fn print(&mut self, line: String);

    /// Queue a hook to run after the current command
    fn insert_hook(&mut self, name: &str, state: FindState);
}

/// A hook waiting to run, with the target it fires for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledHook {
    pub name: String,
    pub state: FindState,
}

/// Collects what commands print and the hooks they schedule
#[derive(Debug, Default)]
pub struct CommandQueue {
    output: Vec<String>,
    errors: Vec<String>,
    hooks: VecDeque<ScheduledHook>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    pub fn next_hook(&mut self) -> Option<ScheduledHook> {
        self.hooks.pop_front()
    }

    pub fn pending_hooks(&self) -> usize {
        self.hooks.len()
    }
}

impl CommandPipeline for CommandQueue {
    fn print(&mut self, line: String) {
        self.output.push(line);
    }

    fn insert_hook(&mut self, name: &str, state: FindState) {
        debug!("scheduling hook {} for %{}", name, state.pane);
        self.hooks.push_back(ScheduledHook {
            name: name.to_string(),
            state,
        });
    }
}
