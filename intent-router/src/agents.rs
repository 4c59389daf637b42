//! Agent routing with capability-tagged agents per task type.
//!
//! # Escalation
//!
//! Complex tasks get the oversight agent prepended so a reviewer sits above
//! the specialists. Task types without a registry entry fall back to the
//! default agent, so `route` never returns an empty list.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::types::{Complexity, TaskType};

/// Agent prepended for complex tasks.
pub const OVERSIGHT_AGENT: &str = "oversight_reviewer";
/// Agent used when a task type has no registered agents.
pub const DEFAULT_AGENT: &str = "general_assistant";

/// Format: (task type, [(agent id, capability tags)])
const DEFAULT_AGENTS: &[(TaskType, &[(&str, &[&str])])] = &[
    (
        TaskType::Calculation,
        &[
            ("physics_engine", &["machining_physics", "numerics"]),
            ("materials_expert", &["material_science"]),
        ],
    ),
    (
        TaskType::DataQuery,
        &[("data_retriever", &["lookup", "search"])],
    ),
    (
        TaskType::CodeGeneration,
        &[
            ("code_architect", &["design", "review"]),
            ("code_generator", &["implementation"]),
        ],
    ),
    (
        TaskType::Analysis,
        &[
            ("data_analyst", &["statistics", "reporting"]),
            ("pattern_detector", &["trend_detection", "anomaly_detection"]),
        ],
    ),
    (
        TaskType::Orchestration,
        &[
            ("swarm_coordinator", &["delegation", "scheduling"]),
            ("task_decomposer", &["planning"]),
            ("result_aggregator", &["merging", "voting"]),
        ],
    ),
    (
        TaskType::Session,
        &[("session_manager", &["state", "checkpointing"])],
    ),
    (
        TaskType::Validation,
        &[
            ("quality_inspector", &["verification", "testing"]),
            ("safety_auditor", &["safety", "compliance"]),
        ],
    ),
    (
        TaskType::Documentation,
        &[("technical_writer", &["writing", "summarization"])],
    ),
    (
        TaskType::DevTools,
        &[("devops_engineer", &["build", "version_control"])],
    ),
];

/// One routable agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    pub capabilities: Vec<String>,
}

impl AgentProfile {
    pub fn new(id: impl Into<String>, capabilities: &[&str]) -> Self {
        Self {
            id: id.into(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

/// Static task-type → agent table.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    entries: BTreeMap<TaskType, Vec<AgentProfile>>,
    oversight_agent: String,
    default_agent: String,
}

impl AgentRegistry {
    /// Registry populated with the built-in agent tables.
    pub fn builtin() -> Self {
        let entries = DEFAULT_AGENTS
            .iter()
            .map(|(task_type, agents)| {
                let profiles = agents
                    .iter()
                    .map(|(id, caps)| AgentProfile::new(*id, caps))
                    .collect();
                (*task_type, profiles)
            })
            .collect();
        Self {
            entries,
            oversight_agent: OVERSIGHT_AGENT.to_string(),
            default_agent: DEFAULT_AGENT.to_string(),
        }
    }

    /// Registry with no entries; every route falls back to the default agent.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            oversight_agent: OVERSIGHT_AGENT.to_string(),
            default_agent: DEFAULT_AGENT.to_string(),
        }
    }

    /// Register agents for a task type. An empty list removes the entry so
    /// the fallback still applies.
    pub fn insert(&mut self, task_type: TaskType, agents: Vec<AgentProfile>) {
        if agents.is_empty() {
            self.entries.remove(&task_type);
        } else {
            self.entries.insert(task_type, agents);
        }
    }

    pub fn remove(&mut self, task_type: TaskType) -> Option<Vec<AgentProfile>> {
        self.entries.remove(&task_type)
    }

    pub fn agents_for(&self, task_type: TaskType) -> Option<&[AgentProfile]> {
        self.entries.get(&task_type).map(|v| v.as_slice())
    }

    /// All registered agents with a capability tag, in task-type order.
    pub fn with_capability(&self, capability: &str) -> Vec<&AgentProfile> {
        self.entries
            .values()
            .flatten()
            .filter(|a| a.has_capability(capability))
            .collect()
    }

    /// Capability tag → number of registered agents carrying it.
    pub fn capability_counts(&self) -> BTreeMap<String, usize> {
        let tags: BTreeSet<&str> = self
            .entries
            .values()
            .flatten()
            .flat_map(|a| a.capabilities.iter().map(String::as_str))
            .collect();
        tags.into_iter()
            .map(|tag| (tag.to_string(), self.with_capability(tag).len()))
            .collect()
    }

    pub fn oversight_agent(&self) -> &str {
        &self.oversight_agent
    }

    pub fn default_agent(&self) -> &str {
        &self.default_agent
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Agent ids for a task. Never empty.
    pub fn route(&self, task_type: TaskType, complexity: Complexity) -> Vec<String> {
        let mut agents: Vec<String> = match self.entries.get(&task_type) {
            Some(profiles) if !profiles.is_empty() => {
                profiles.iter().map(|p| p.id.clone()).collect()
            }
            _ => {
                debug!(task_type = %task_type, "No agents registered, using default agent");
                vec![self.default_agent.clone()]
            }
        };

        if complexity == Complexity::Complex && !agents.contains(&self.oversight_agent) {
            agents.insert(0, self.oversight_agent.clone());
        }

        agents
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
