//! Intent Router: deterministic task-intent routing
//!
//! Turns a free-text task description into an execution plan: a task type,
//! an execution mode, candidate tools, agents, lifecycle hooks and a rough
//! cost estimate. Classification is keyword/regex scoring over fixed tables,
//! so the same text always yields the same plan (task id aside).
//!
//! # Pipeline
//!
//! | Stage         | Module         | Output                          |
//! |---------------|----------------|---------------------------------|
//! | Classify      | [`classifier`] | task type, confidence, evidence |
//! | Mode select   | [`classifier`] | complexity, execution mode      |
//! | Tool select   | [`tools`]      | primary/supporting/recommended  |
//! | Agent route   | [`agents`]     | agent ids (oversight escalation)|
//! | Hook select   | [`hooks`]      | hook ids, init hook first       |
//! | Plan assembly | [`planner`]    | `ExecutionPlan` / `ExecutionResult` |
//!
//! Every plan is recorded in [`history`] and announced on the [`events`] bus.

pub mod agents;
pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod hooks;
pub mod patterns;
pub mod planner;
pub mod tools;
pub mod types;

pub use agents::{AgentProfile, AgentRegistry, DEFAULT_AGENT, OVERSIGHT_AGENT};
pub use classifier::{Classifier, TaskClassification};
pub use config::{CostTable, RouterConfig};
pub use error::{ConfigError, HistoryError, RouterError, RouterResult};
pub use events::{PlanEventBus, RouterEvent, SharedPlanEventBus};
pub use history::{ExecutionHistory, HistoryStats, PlanSummary};
pub use hooks::{HookRegistry, INIT_HOOK};
pub use patterns::{PatternSet, PatternTable};
pub use planner::{next_task_id, ExecutionPlan, ExecutionResult, RouterStatus, TaskRouter};
pub use tools::{ToolEntry, ToolRegistry, ToolSelection};
pub use types::{Complexity, ExecutionMode, TaskType};
