//! Plan assembly and the router façade.
//!
//! ```text
//! text ──▶ Classifier ──▶ TaskClassification
//!                │
//!                ├──▶ ToolRegistry::select_tools ──▶ tools (≤ max_plan_tools)
//!                ├──▶ AgentRegistry::route       ──▶ agents
//!                ├──▶ HookRegistry::hooks_for    ──▶ hooks
//!                └──▶ CostTable::estimate        ──▶ calls / time
//!                                 │
//!                                 ▼
//!                          ExecutionPlan ──▶ history + events
//! ```
//!
//! No stage can fail. Unknown or unmatched input degrades to defaults so a
//! caller always gets some plan.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::agents::AgentRegistry;
use crate::classifier::{Classifier, TaskClassification};
use crate::config::{CostTable, RouterConfig};
use crate::error::{RouterError, RouterResult};
use crate::events::{preview, PlanEventBus, RouterEvent, SharedPlanEventBus};
use crate::history::{ExecutionHistory, HistoryStats, PlanSummary};
use crate::hooks::HookRegistry;
use crate::patterns::PatternSet;
use crate::tools::{ToolRegistry, ToolSelection};
use crate::types::{Complexity, ExecutionMode, TaskType};

/// Last issued task-id value, process-wide.
static LAST_TASK_MILLIS: AtomicU64 = AtomicU64::new(0);

static GLOBAL_ROUTER: OnceLock<TaskRouter> = OnceLock::new();

/// Mint `task_<millis>`. Values are wall-clock milliseconds bumped to
/// `last + 1` when needed, so ids are unique and strictly increasing.
pub fn next_task_id() -> String {
    let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
    let mut prev = LAST_TASK_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_TASK_MILLIS.compare_exchange_weak(
            prev,
            next,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return format!("task_{}", next),
            Err(actual) => prev = actual,
        }
    }
}

/// Structured recommendation handed to an external executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionPlan {
    pub task_id: String,
    pub task_type: TaskType,
    pub execution_mode: ExecutionMode,
    pub tools: Vec<String>,
    pub agents: Vec<String>,
    pub swarm_pattern: Option<String>,
    pub estimated_calls: u32,
    pub estimated_time_ms: u64,
    pub hooks_to_fire: Vec<String>,
}

/// `classification` block of an [`ExecutionResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationSummary {
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub mode: ExecutionMode,
    pub confidence: f64,
    pub complexity: Complexity,
}

/// `plan` block of an [`ExecutionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlanDetails {
    pub tools: Vec<String>,
    pub agents: Vec<String>,
    pub swarm_pattern: Option<String>,
    pub estimated_calls: u32,
    pub estimated_time_ms: u64,
}

/// Output of [`TaskRouter::execute`]: the JSON contract for executors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionResult {
    pub task_id: String,
    pub classification: ClassificationSummary,
    pub plan: PlanDetails,
    pub hooks: Vec<String>,
    pub recommended_action: String,
}

impl ExecutionResult {
    /// JSON Schema of the serialized result.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ExecutionResult)
    }
}

/// Diagnostics for telemetry sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterStatus {
    pub total_plans: usize,
    /// Oldest first
    pub recent_task_types: Vec<TaskType>,
    pub pattern_tables: usize,
    pub tool_entries: usize,
    pub agent_entries: usize,
    pub hook_entries: usize,
    /// Capability tag → agents carrying it
    pub agent_capabilities: BTreeMap<String, usize>,
    pub subscribers: usize,
}

/// Classifier, registries, cost table and history in one context object.
#[derive(Debug)]
pub struct TaskRouter {
    classifier: Classifier,
    tools: ToolRegistry,
    agents: AgentRegistry,
    hooks: HookRegistry,
    costs: CostTable,
    max_plan_tools: usize,
    recent_window: usize,
    history: ExecutionHistory,
    events: SharedPlanEventBus,
}

impl TaskRouter {
    /// Router over the built-in tables with default settings.
    pub fn new() -> Self {
        Self::build(&RouterConfig::default(), PatternSet::default())
    }

    /// Router from a validated configuration. Fails only on invalid values
    /// or pattern extensions that do not compile.
    pub fn from_config(config: RouterConfig) -> RouterResult<Self> {
        config.validate()?;

        let mut tables = Vec::new();
        for table in PatternSet::builtin().iter() {
            let task_type = table.task_type;
            let mut table = table.clone();
            for ext in config
                .pattern_extensions
                .iter()
                .filter(|e| e.task_type == task_type)
            {
                table = table
                    .extended(&ext.keywords, &ext.patterns)
                    .map_err(|source| RouterError::Pattern {
                        task_type: ext.task_type,
                        source,
                    })?;
            }
            tables.push(table);
        }

        Ok(Self::build(&config, PatternSet::from_tables(tables)))
    }

    fn build(config: &RouterConfig, patterns: PatternSet) -> Self {
        let history = match &config.history_path {
            Some(path) => ExecutionHistory::with_file(path),
            None => ExecutionHistory::new(),
        };

        let router = Self {
            classifier: Classifier::with_patterns(patterns, config),
            tools: ToolRegistry::builtin(),
            agents: AgentRegistry::builtin(),
            hooks: HookRegistry::builtin(),
            costs: config.costs,
            max_plan_tools: config.max_plan_tools,
            recent_window: config.recent_window,
            history,
            events: PlanEventBus::with_capacity(config.event_capacity).shared(),
        };

        info!(
            pattern_tables = router.classifier.patterns().len(),
            tool_entries = router.tools.len(),
            agent_entries = router.agents.len(),
            history_file = ?config.history_path,
            "Task router initialized"
        );

        router
    }

    /// Process-wide router, configured from the environment on first use.
    /// Invalid environment configuration falls back to defaults.
    pub fn global() -> &'static TaskRouter {
        GLOBAL_ROUTER.get_or_init(|| {
            match RouterConfig::from_env()
                .map_err(RouterError::from)
                .and_then(TaskRouter::from_config)
            {
                Ok(router) => router,
                Err(e) => {
                    warn!(error = %e, "Invalid router configuration, using defaults");
                    TaskRouter::new()
                }
            }
        })
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_agents(mut self, agents: AgentRegistry) -> Self {
        self.agents = agents;
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn classify(&self, text: &str) -> TaskClassification {
        self.classifier.classify(text)
    }

    pub fn select_tools(&self, task_type: TaskType, text: &str) -> ToolSelection {
        self.tools.select_tools(task_type, text)
    }

    pub fn route(&self, task_type: TaskType, complexity: Complexity) -> Vec<String> {
        self.agents.route(task_type, complexity)
    }

    pub fn hooks_for(&self, task_type: TaskType) -> Vec<String> {
        self.hooks.hooks_for(task_type)
    }

    /// Assemble a plan and record it in history.
    pub fn plan(&self, text: &str) -> ExecutionPlan {
        self.assemble(text).1
    }

    /// Assemble a plan and attach a one-line recommendation.
    pub fn execute(&self, text: &str) -> ExecutionResult {
        let (classification, plan) = self.assemble(text);
        let recommended_action = self.recommend_action(&plan);

        ExecutionResult {
            task_id: plan.task_id,
            classification: ClassificationSummary {
                task_type: classification.task_type,
                mode: classification.execution_mode,
                confidence: classification.confidence,
                complexity: classification.complexity,
            },
            plan: PlanDetails {
                tools: plan.tools,
                agents: plan.agents,
                swarm_pattern: plan.swarm_pattern,
                estimated_calls: plan.estimated_calls,
                estimated_time_ms: plan.estimated_time_ms,
            },
            hooks: plan.hooks_to_fire,
            recommended_action,
        }
    }

    fn assemble(&self, text: &str) -> (TaskClassification, ExecutionPlan) {
        let classification = self.classifier.classify(text);
        let task_type = classification.task_type;
        let mode = classification.execution_mode;

        let selection = self.select_tools(task_type, text);
        let agents = self.route(task_type, classification.complexity);
        let hooks_to_fire = self.hooks_for(task_type);
        let (estimated_calls, estimated_time_ms) = self.costs.estimate(mode, agents.len());

        let plan = ExecutionPlan {
            task_id: next_task_id(),
            task_type,
            execution_mode: mode,
            tools: selection.ordered(self.max_plan_tools),
            agents,
            swarm_pattern: mode.swarm_pattern().map(str::to_string),
            estimated_calls,
            estimated_time_ms,
            hooks_to_fire,
        };

        debug!(
            task_id = %plan.task_id,
            task_type = %task_type,
            mode = %mode,
            tools = plan.tools.len(),
            agents = plan.agents.len(),
            estimated_calls,
            "Plan assembled"
        );

        self.record(&plan, &classification, text);
        (classification, plan)
    }

    fn record(&self, plan: &ExecutionPlan, classification: &TaskClassification, text: &str) {
        let summary = PlanSummary::from_plan(plan, classification.confidence);
        if let Err(e) = self.history.append(summary) {
            warn!(task_id = %plan.task_id, error = %e, "Failed to mirror plan to history file");
        }

        let timestamp = chrono::Utc::now();
        if classification.is_low_confidence() {
            self.events.publish(RouterEvent::LowConfidence {
                task_id: plan.task_id.clone(),
                text_preview: preview(text, 80),
                timestamp,
            });
        }
        self.events.publish(RouterEvent::PlanCreated {
            task_id: plan.task_id.clone(),
            task_type: plan.task_type,
            execution_mode: plan.execution_mode,
            complexity: classification.complexity,
            confidence: classification.confidence,
            timestamp,
        });
    }

    /// One-line human-readable action for a plan.
    pub fn recommend_action(&self, plan: &ExecutionPlan) -> String {
        let no_tool = || {
            format!(
                "No tool registered for {}; route to agent {}",
                plan.task_type,
                plan.agents
                    .first()
                    .map(String::as_str)
                    .unwrap_or(self.agents.default_agent())
            )
        };

        match plan.execution_mode {
            ExecutionMode::SingleTool => match plan.tools.first() {
                Some(tool) => format!("Call {} directly", tool),
                None => no_tool(),
            },
            ExecutionMode::ToolChain if plan.tools.is_empty() => no_tool(),
            ExecutionMode::ToolChain => format!("Chain tools: {}", plan.tools.join(" -> ")),
            ExecutionMode::AgentSingle => {
                let oversight = self.agents.oversight_agent();
                let specialist = plan
                    .agents
                    .iter()
                    .find(|a| a.as_str() != oversight)
                    .or_else(|| plan.agents.first())
                    .map(String::as_str)
                    .unwrap_or(self.agents.default_agent());
                format!("Delegate to agent {}", specialist)
            }
            ExecutionMode::SwarmParallel
            | ExecutionMode::SwarmPipeline
            | ExecutionMode::SwarmConsensus => format!(
                "Deploy {} swarm with agents: {}",
                plan.swarm_pattern.as_deref().unwrap_or("parallel"),
                plan.agents.join(", ")
            ),
        }
    }

    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    pub fn events(&self) -> SharedPlanEventBus {
        self.events.clone()
    }

    pub fn status(&self) -> RouterStatus {
        RouterStatus {
            total_plans: self.history.len(),
            recent_task_types: self.history.recent_task_types(self.recent_window),
            pattern_tables: self.classifier.patterns().len(),
            tool_entries: self.tools.len(),
            agent_entries: self.agents.len(),
            hook_entries: self.hooks.len(),
            agent_capabilities: self.agents.capability_counts(),
            subscribers: self.events.subscriber_count(),
        }
    }
}

impl Default for TaskRouter {
    fn default() -> Self {
        Self::new()
    }
}
