//! Tool selection: candidate tools per task type.
//!
//! Each task type maps to an ordered list of primary tools (the ones a plan
//! would call) and supporting tools (lookups the primary tools lean on). A
//! secondary keyword table narrows the primary list to one recommended tool.
//!
//! # Usage
//!
//! ```text
//! let registry = ToolRegistry::builtin();
//! let selection = registry.select_tools(TaskType::Calculation, "cutting force for 4140");
//! assert_eq!(selection.recommended.as_deref(), Some("calc_cutting_force"));
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::TaskType;

/// Format: (task type, primary tools, supporting tools)
const DEFAULT_TOOLS: &[(TaskType, &[&str], &[&str])] = &[
    (
        TaskType::Calculation,
        &[
            "calc_cutting_force",
            "calc_tool_life",
            "calc_speed_feed",
            "calc_surface_finish",
            "calc_mrr",
        ],
        &["material_lookup", "formula_registry"],
    ),
    (
        TaskType::DataQuery,
        &[
            "material_lookup",
            "machine_lookup",
            "alarm_decode",
            "knowledge_search",
        ],
        &["data_export"],
    ),
    (
        TaskType::CodeGeneration,
        &["code_template", "code_write", "code_refactor"],
        &["code_read", "code_search"],
    ),
    (
        TaskType::Analysis,
        &[
            "pattern_analyzer",
            "trend_analyzer",
            "compare_datasets",
            "root_cause_analyzer",
        ],
        &["knowledge_search", "report_builder"],
    ),
    (
        TaskType::Orchestration,
        &["swarm_deploy", "swarm_status", "agent_dispatch"],
        &["task_decompose", "result_merge"],
    ),
    (
        TaskType::Session,
        &[
            "session_save",
            "session_resume",
            "checkpoint_create",
            "context_compress",
        ],
        &["state_inspect"],
    ),
    (
        TaskType::Validation,
        &[
            "quality_gate",
            "safety_check",
            "test_runner",
            "compliance_audit",
        ],
        &["code_read"],
    ),
    (
        TaskType::Documentation,
        &["doc_generate", "doc_update", "doc_summarize"],
        &["code_read", "knowledge_search"],
    ),
    (
        TaskType::DevTools,
        &["git_ops", "build_runner", "lint_runner", "dependency_audit"],
        &["code_search"],
    ),
];

/// Secondary keyword table, scanned in order.
///
/// Format: (keyword in text, substring of the tool identifier)
const RECOMMENDATION_KEYWORDS: &[(&str, &str)] = &[
    ("force", "cutting_force"),
    ("tool life", "tool_life"),
    ("wear", "tool_life"),
    ("speed", "speed_feed"),
    ("feed", "speed_feed"),
    ("finish", "surface_finish"),
    ("roughness", "surface_finish"),
    ("removal rate", "mrr"),
    ("mrr", "mrr"),
    ("alarm", "alarm"),
    ("machine", "machine"),
    ("material", "material"),
    ("trend", "trend"),
    ("compare", "compare"),
    ("root cause", "root_cause"),
    ("refactor", "refactor"),
    ("template", "template"),
    ("resume", "resume"),
    ("checkpoint", "checkpoint"),
    ("compress", "compress"),
    ("save", "save"),
    ("safety", "safety"),
    ("test", "test"),
    ("compliance", "compliance"),
    ("summar", "summarize"),
    ("update", "update"),
    ("status", "status"),
    ("dispatch", "dispatch"),
    ("commit", "git"),
    ("git", "git"),
    ("lint", "lint"),
    ("build", "build"),
    ("dependenc", "dependency"),
];

/// Candidate tools for one task type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolSelection {
    pub primary: Vec<String>,
    pub supporting: Vec<String>,
    /// Best single primary tool for this text, if any primary tool exists
    pub recommended: Option<String>,
}

impl ToolSelection {
    /// Recommended tool first, then the rest of primary, then supporting.
    /// Duplicates removed, truncated to `limit`.
    pub fn ordered(&self, limit: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let candidates = self
            .recommended
            .iter()
            .chain(self.primary.iter())
            .chain(self.supporting.iter());
        for tool in candidates {
            if out.len() >= limit {
                break;
            }
            if !out.contains(tool) {
                out.push(tool.clone());
            }
        }
        out
    }
}

/// Registered tools for one task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub primary: Vec<String>,
    pub supporting: Vec<String>,
}

/// Static task-type → tool registry.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    entries: BTreeMap<TaskType, ToolEntry>,
    recommendations: Vec<(String, String)>,
}

impl ToolRegistry {
    /// Registry populated with the built-in tool tables.
    pub fn builtin() -> Self {
        let entries = DEFAULT_TOOLS
            .iter()
            .map(|(task_type, primary, supporting)| {
                (
                    *task_type,
                    ToolEntry {
                        primary: primary.iter().map(|s| s.to_string()).collect(),
                        supporting: supporting.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect();
        let recommendations = RECOMMENDATION_KEYWORDS
            .iter()
            .map(|(k, t)| (k.to_string(), t.to_string()))
            .collect();
        Self {
            entries,
            recommendations,
        }
    }

    /// Registry with no entries and no recommendation keywords.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn insert(&mut self, task_type: TaskType, entry: ToolEntry) {
        self.entries.insert(task_type, entry);
    }

    pub fn remove(&mut self, task_type: TaskType) -> Option<ToolEntry> {
        self.entries.remove(&task_type)
    }

    pub fn get(&self, task_type: TaskType) -> Option<&ToolEntry> {
        self.entries.get(&task_type)
    }

    /// Number of task types with registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate tools for a task. An unregistered type yields empty lists
    /// and no recommendation.
    pub fn select_tools(&self, task_type: TaskType, text: &str) -> ToolSelection {
        let Some(entry) = self.entries.get(&task_type) else {
            return ToolSelection::default();
        };

        ToolSelection {
            primary: entry.primary.clone(),
            supporting: entry.supporting.clone(),
            recommended: self.recommend(&entry.primary, text),
        }
    }

    /// First primary tool containing the mapped substring of a keyword found
    /// in `text`; falls back to the first primary tool.
    fn recommend(&self, primary: &[String], text: &str) -> Option<String> {
        let lowered = text.to_lowercase();

        self.recommendations
            .iter()
            .filter(|(keyword, _)| lowered.contains(keyword.as_str()))
            .find_map(|(_, fragment)| primary.iter().find(|t| t.contains(fragment.as_str())))
            .or_else(|| primary.first())
            .cloned()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
