//! Lifecycle hooks the caller should fire around execution.

use std::collections::BTreeMap;

use crate::types::TaskType;

/// Fired for every task, always first.
pub const INIT_HOOK: &str = "task.init";

const DEFAULT_HOOKS: &[(TaskType, &[&str])] = &[
    (
        TaskType::Calculation,
        &["calc.validate_inputs", "calc.safety_bounds"],
    ),
    (TaskType::DataQuery, &["data.cache_lookup"]),
    (
        TaskType::CodeGeneration,
        &["code.pre_write", "code.post_write_lint"],
    ),
    (TaskType::Analysis, &["analysis.capture_findings"]),
    (
        TaskType::Orchestration,
        &["swarm.pre_deploy", "swarm.collect_results"],
    ),
    (TaskType::Session, &["session.checkpoint"]),
    (TaskType::Validation, &["validation.record_verdict"]),
    (TaskType::DevTools, &["devtools.pre_commit"]),
];

#[derive(Debug, Clone)]
pub struct HookRegistry {
    init_hook: String,
    entries: BTreeMap<TaskType, Vec<String>>,
}

impl HookRegistry {
    pub fn builtin() -> Self {
        let entries = DEFAULT_HOOKS
            .iter()
            .map(|(t, hooks)| (*t, hooks.iter().map(|h| h.to_string()).collect()))
            .collect();
        Self {
            init_hook: INIT_HOOK.to_string(),
            entries,
        }
    }

    pub fn insert(&mut self, task_type: TaskType, hooks: Vec<String>) {
        self.entries.insert(task_type, hooks);
    }

    /// Task types with type-specific hooks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Init hook, then the type's own hooks. Total.
    pub fn hooks_for(&self, task_type: TaskType) -> Vec<String> {
        let mut hooks = vec![self.init_hook.clone()];
        if let Some(specific) = self.entries.get(&task_type) {
            hooks.extend(specific.iter().filter(|h| **h != self.init_hook).cloned());
        }
        hooks
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
