//! In-memory stand-in for the management tool.
//!
//! Behaves like vmadm as far as the reconciler can observe: success is
//! reported on stderr with the marker prefix, `get` dumps JSON carrying a
//! `last_modified` stamp that moves on every write.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::{Backend, CommandOutput};
use crate::error::StateError;

#[derive(Default)]
struct HostState {
    vms: BTreeMap<String, Map<String, Value>>,
    next_id: u32,
    clock: u32,
    calls: Vec<Vec<String>>,
    scripted: Vec<(Vec<String>, CommandOutput)>,
}

impl HostState {
    fn stamp(&mut self, id: &str) {
        self.clock += 1;
        let stamp = format!("2026-01-01T00:00:{:02}Z", self.clock);
        if let Some(vm) = self.vms.get_mut(id) {
            vm.insert("last_modified".into(), Value::String(stamp));
        }
    }

    fn add(&mut self, mut config: Map<String, Value>) -> String {
        self.next_id += 1;
        let id = format!("uuid-{}", self.next_id);
        config.insert("uuid".into(), Value::String(id.clone()));
        config
            .entry("state")
            .or_insert_with(|| Value::String("running".into()));
        self.vms.insert(id.clone(), config);
        self.stamp(&id);
        id
    }
}

#[derive(Default)]
pub struct FakeHost {
    state: Mutex<HostState>,
}

fn reply(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> CommandOutput {
    CommandOutput {
        code: Some(code),
        stdout: stdout.into(),
        stderr: stderr.into(),
    }
}

fn not_found(id: &str) -> CommandOutput {
    reply(1, "", format!("Could not find VM {id}\n"))
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a VM directly, bypassing `create`. Returns its uuid.
    pub fn insert(&self, config: Value) -> String {
        let Value::Object(map) = config else {
            panic!("fake VM config must be an object");
        };
        self.state.lock().unwrap().add(map)
    }

    /// Bump `last_modified` without changing anything else.
    pub fn touch(&self, id: &str) {
        self.state.lock().unwrap().stamp(id);
    }

    /// Answer `args` with a fixed reply instead of emulating it.
    pub fn script(&self, args: &[&str], code: i32, stdout: &str, stderr: &str) {
        let args = args.iter().map(|a| a.to_string()).collect();
        self.state
            .lock()
            .unwrap()
            .scripted
            .push((args, reply(code, stdout, stderr)));
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than `lookup` and `get`.
    pub fn mutating_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c[0].as_str(), "lookup" | "get"))
            .collect()
    }

    pub fn vm(&self, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.vms.get(id).cloned().map(Value::Object)
    }

    pub fn vm_count(&self) -> usize {
        self.state.lock().unwrap().vms.len()
    }

    fn emulate(state: &mut HostState, args: &[String]) -> CommandOutput {
        let verb = args.first().map(String::as_str).unwrap_or_default();
        let id = args.get(1).cloned().unwrap_or_default();
        let forced = args.iter().any(|a| a == "-F");

        match verb {
            "lookup" => {
                let alias = id.strip_prefix("alias=").unwrap_or_default();
                let matches: String = state
                    .vms
                    .iter()
                    .filter(|(_, vm)| vm.get("alias").and_then(Value::as_str) == Some(alias))
                    .map(|(uuid, _)| format!("{uuid}\n"))
                    .collect();
                reply(0, matches, "")
            }
            "get" => match state.vms.get(&id) {
                Some(vm) => reply(0, Value::Object(vm.clone()).to_string(), ""),
                None => not_found(&id),
            },
            "create" => {
                let Some(path) = args.get(2) else {
                    return reply(2, "", "usage: create -f <file>\n");
                };
                let parsed = std::fs::read_to_string(path)
                    .ok()
                    .and_then(|s| serde_json::from_str::<Value>(&s).ok());
                match parsed {
                    Some(Value::Object(config)) => {
                        let id = state.add(config);
                        reply(0, "", format!("Successfully created VM {id}\n"))
                    }
                    _ => reply(1, "", format!("Invalid manifest {path}\n")),
                }
            }
            "start" | "stop" | "reboot" => {
                let Some(vm) = state.vms.get_mut(&id) else {
                    return not_found(&id);
                };
                let running = vm.get("state").and_then(Value::as_str) == Some("running");
                let result = match (verb, running) {
                    ("start", true) => reply(0, "", format!("VM {id} is already running\n")),
                    ("start", false) => {
                        vm.insert("state".into(), Value::String("running".into()));
                        reply(0, "", format!("Successfully started VM {id}\n"))
                    }
                    ("stop", false) => reply(0, "", format!("VM {id} is already stopped\n")),
                    ("stop", true) => {
                        vm.insert("state".into(), Value::String("stopped".into()));
                        let how = if forced { "forcibly stopped" } else { "stopped" };
                        reply(0, "", format!("Successfully {how} VM {id}\n"))
                    }
                    (_, false) => reply(
                        1,
                        "",
                        format!("Unable to reboot VM {id}: VM is not running\n"),
                    ),
                    (_, true) => reply(0, "", format!("Successfully completed reboot for VM {id}\n")),
                };
                state.stamp(&id);
                result
            }
            "destroy" => match state.vms.remove(&id) {
                Some(_) => reply(0, "", format!("Successfully deleted VM {id}\n")),
                None => not_found(&id),
            },
            "update" => {
                if !state.vms.contains_key(&id) {
                    return not_found(&id);
                }
                let mut changes = Map::new();
                if args.get(2).map(String::as_str) == Some("-f") {
                    let parsed = args
                        .get(3)
                        .and_then(|p| std::fs::read_to_string(p).ok())
                        .and_then(|s| serde_json::from_str::<Value>(&s).ok());
                    match parsed {
                        Some(Value::Object(map)) => changes = map,
                        _ => return reply(1, "", "Invalid update payload\n"),
                    }
                } else {
                    for pair in &args[2..] {
                        let Some((key, raw)) = pair.split_once('=') else {
                            return reply(1, "", format!("Invalid property {pair}\n"));
                        };
                        let value = serde_json::from_str(raw)
                            .unwrap_or_else(|_| Value::String(raw.to_string()));
                        changes.insert(key.to_string(), value);
                    }
                }
                if let Some(vm) = state.vms.get_mut(&id) {
                    vm.extend(changes);
                }
                state.stamp(&id);
                reply(0, "", format!("Successfully updated VM {id}\n"))
            }
            other => reply(2, "", format!("unknown command '{other}'\n")),
        }
    }
}

impl Backend for FakeHost {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, StateError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(args.to_vec());
        if let Some((_, output)) = state.scripted.iter().find(|(a, _)| a.as_slice() == args) {
            return Ok(output.clone());
        }
        Ok(Self::emulate(&mut state, args))
    }

    fn program(&self) -> &str {
        "vmadm"
    }
}
