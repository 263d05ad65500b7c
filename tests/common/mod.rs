#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use deskgate::{ProvisionError, ProvisionResult, Shell};

#[derive(Default)]
struct State {
    calls: Vec<String>,
    stdin: Vec<(String, String)>,
    failing: Vec<String>,
    outputs: HashMap<String, String>,
    missing: Vec<String>,
}

/// Shell fake that records command lines instead of running them.
///
/// Clones share state, so a test can keep a handle after handing
/// one to a pipeline.
#[derive(Clone, Default)]
pub struct RecordingShell {
    state: Rc<RefCell<State>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands whose line starts with `prefix` fail.
    pub fn fail(self, prefix: &str) -> Self {
        self.state.borrow_mut().failing.push(prefix.to_string());
        self
    }

    /// The exact command line `line` prints `stdout`.
    pub fn output(self, line: &str, stdout: &str) -> Self {
        self.state
            .borrow_mut()
            .outputs
            .insert(line.to_string(), stdout.to_string());
        self
    }

    /// `program` is not on PATH.
    pub fn missing(self, program: &str) -> Self {
        self.state.borrow_mut().missing.push(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn stdin_for(&self, program: &str) -> Vec<String> {
        self.state
            .borrow()
            .stdin
            .iter()
            .filter(|(line, _)| line.starts_with(program))
            .map(|(_, data)| data.clone())
            .collect()
    }

    fn record(&self, program: &str, args: &[&str]) -> ProvisionResult<String> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }

        let mut state = self.state.borrow_mut();
        state.calls.push(line.clone());

        if state.missing.iter().any(|m| m == program) {
            return Err(ProvisionError::CommandNotFound(program.to_string()));
        }
        if state.failing.iter().any(|p| line.starts_with(p.as_str())) {
            return Err(ProvisionError::Other(format!("{line} failed")));
        }
        Ok(state.outputs.get(&line).cloned().unwrap_or_default())
    }
}

impl Shell for RecordingShell {
    fn run(&self, program: &str, args: &[&str]) -> ProvisionResult<String> {
        self.record(program, args)
    }

    fn run_interactive(&self, program: &str, args: &[&str]) -> ProvisionResult<()> {
        self.record(program, args).map(|_| ())
    }

    fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        stdin_data: &[u8],
    ) -> ProvisionResult<String> {
        let out = self.record(program, args)?;
        let line = self.calls().last().cloned().unwrap_or_default();
        self.state
            .borrow_mut()
            .stdin
            .push((line, String::from_utf8_lossy(stdin_data).to_string()));
        Ok(out)
    }

    fn command_exists(&self, program: &str) -> bool {
        !self.state.borrow().missing.iter().any(|m| m == program)
    }
}
