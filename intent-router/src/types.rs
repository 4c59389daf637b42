//! Core routing enums.
//!
//! Every enum here is closed and carries a fixed ordering through `all()`.
//! Iteration and tie-breaking always go through that ordering, never through
//! map iteration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Domain of a task description.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Engineering calculations (forces, tool life, feeds and speeds)
    Calculation,
    /// Lookups against material, machine and alarm data
    DataQuery,
    /// Writing or refactoring code
    CodeGeneration,
    /// Trend, pattern and root-cause analysis
    Analysis,
    /// Multi-agent coordination
    Orchestration,
    /// Session state: resume, checkpoint, handoff
    Session,
    /// Checks, audits and test runs
    Validation,
    /// Writing or explaining documentation
    Documentation,
    /// Build, git and dependency tooling
    DevTools,
}

impl TaskType {
    /// All task types in declaration order. Earlier entries win score ties.
    pub fn all() -> &'static [TaskType] {
        &[
            Self::Calculation,
            Self::DataQuery,
            Self::CodeGeneration,
            Self::Analysis,
            Self::Orchestration,
            Self::Session,
            Self::Validation,
            Self::Documentation,
            Self::DevTools,
        ]
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calculation => write!(f, "calculation"),
            Self::DataQuery => write!(f, "data_query"),
            Self::CodeGeneration => write!(f, "code_generation"),
            Self::Analysis => write!(f, "analysis"),
            Self::Orchestration => write!(f, "orchestration"),
            Self::Session => write!(f, "session"),
            Self::Validation => write!(f, "validation"),
            Self::Documentation => write!(f, "documentation"),
            Self::DevTools => write!(f, "dev_tools"),
        }
    }
}

/// Strategy shape for fulfilling a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One direct tool call
    SingleTool,
    /// A short sequence of tool calls
    ToolChain,
    /// Hand the task to one agent
    AgentSingle,
    /// Agents work independently and results are merged
    SwarmParallel,
    /// Agents hand results to each other in order
    SwarmPipeline,
    /// Agents answer independently and vote
    SwarmConsensus,
}

impl ExecutionMode {
    pub fn all() -> &'static [ExecutionMode] {
        &[
            Self::SingleTool,
            Self::ToolChain,
            Self::AgentSingle,
            Self::SwarmParallel,
            Self::SwarmPipeline,
            Self::SwarmConsensus,
        ]
    }

    /// Whether this mode deploys a multi-agent swarm.
    pub fn is_swarm(&self) -> bool {
        matches!(
            self,
            Self::SwarmParallel | Self::SwarmPipeline | Self::SwarmConsensus
        )
    }

    /// Swarm topology name (the mode name without its `swarm_` prefix).
    pub fn swarm_pattern(&self) -> Option<&'static str> {
        match self {
            Self::SwarmParallel => Some("parallel"),
            Self::SwarmPipeline => Some("pipeline"),
            Self::SwarmConsensus => Some("consensus"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleTool => write!(f, "single_tool"),
            Self::ToolChain => write!(f, "tool_chain"),
            Self::AgentSingle => write!(f, "agent_single"),
            Self::SwarmParallel => write!(f, "swarm_parallel"),
            Self::SwarmPipeline => write!(f, "swarm_pipeline"),
            Self::SwarmConsensus => write!(f, "swarm_consensus"),
        }
    }
}

/// Coarse size tier of a task description, derived from word count alone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Moderate => write!(f, "moderate"),
            Self::Complex => write!(f, "complex"),
        }
    }
}
