//! Router configuration
//!
//! Every heuristic constant of the pipeline lives here instead of inline:
//! the confidence scale, the word-count complexity limits and the per-mode
//! cost table. Values come from defaults, a TOML file, or `INTENT_ROUTER_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::types::{ExecutionMode, TaskType};

/// Environment variable naming a TOML config file
pub const CONFIG_PATH_ENV: &str = "INTENT_ROUTER_CONFIG";

/// Call/time estimate for one execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCost {
    pub calls: u32,
    pub time_ms: u64,
}

/// Swarm cost: calls scale with the number of agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmCost {
    /// Calls added on top of one call per agent (dispatch + merge)
    pub overhead_calls: u32,
    pub time_ms: u64,
}

/// Cost lookup indexed by execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    pub single_tool: ModeCost,
    pub tool_chain: ModeCost,
    pub agent_single: ModeCost,
    pub swarm: SwarmCost,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            single_tool: ModeCost {
                calls: 1,
                time_ms: 500,
            },
            tool_chain: ModeCost {
                calls: 3,
                time_ms: 1_500,
            },
            agent_single: ModeCost {
                calls: 4,
                time_ms: 5_000,
            },
            swarm: SwarmCost {
                overhead_calls: 2,
                time_ms: 10_000,
            },
        }
    }
}

impl CostTable {
    /// Estimated `(calls, time_ms)` for a mode.
    pub fn estimate(&self, mode: ExecutionMode, agent_count: usize) -> (u32, u64) {
        match mode {
            ExecutionMode::SingleTool => (self.single_tool.calls, self.single_tool.time_ms),
            ExecutionMode::ToolChain => (self.tool_chain.calls, self.tool_chain.time_ms),
            ExecutionMode::AgentSingle => (self.agent_single.calls, self.agent_single.time_ms),
            ExecutionMode::SwarmParallel
            | ExecutionMode::SwarmPipeline
            | ExecutionMode::SwarmConsensus => {
                // A swarm never costs less than handing the task to one agent,
                // even when routing falls back to a single default agent.
                let agents = u32::try_from(agent_count).unwrap_or(u32::MAX);
                let calls = agents
                    .saturating_add(self.swarm.overhead_calls)
                    .max(self.agent_single.calls);
                (calls, self.swarm.time_ms.max(self.agent_single.time_ms))
            }
        }
    }

    /// Modes must stay strictly ordered single < chain < agent, and swarm
    /// time must exceed agent time. Swarm calls are floored at the agent
    /// cost in `estimate`, so any `overhead_calls` keeps agent <= swarm.
    fn validate(&self) -> ConfigResult<()> {
        let rows = [
            ("single_tool", self.single_tool),
            ("tool_chain", self.tool_chain),
            ("agent_single", self.agent_single),
        ];
        if self.single_tool.calls == 0 {
            return Err(ConfigError::invalid("costs.single_tool", "calls must be > 0"));
        }
        for pair in rows.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if lower.calls >= upper.calls || lower.time_ms >= upper.time_ms {
                return Err(ConfigError::invalid(
                    "costs",
                    format!("{} must be cheaper than {}", lower_name, upper_name),
                ));
            }
        }
        if self.agent_single.time_ms >= self.swarm.time_ms {
            return Err(ConfigError::invalid(
                "costs.swarm",
                "swarm time must exceed agent_single time",
            ));
        }
        Ok(())
    }
}

/// Extra keywords/patterns merged into a built-in pattern table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternExtension {
    pub task_type: TaskType,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Top-level router configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Fraction of a table's maximum score that counts as full confidence
    pub confidence_scale: f64,
    /// Word counts below this are `simple`
    pub simple_word_limit: usize,
    /// Word counts below this (and not simple) are `moderate`
    pub moderate_word_limit: usize,
    pub costs: CostTable,
    /// Upper bound on tools listed in a plan
    pub max_plan_tools: usize,
    /// How many recent task types `status()` reports
    pub recent_window: usize,
    /// Optional append-only JSONL copy of the history
    pub history_path: Option<PathBuf>,
    /// Capacity of the telemetry broadcast channel
    pub event_capacity: usize,
    pub pattern_extensions: Vec<PatternExtension>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            confidence_scale: 0.3,
            simple_word_limit: 10,
            moderate_word_limit: 30,
            costs: CostTable::default(),
            max_plan_tools: 3,
            recent_window: 5,
            history_path: None,
            event_capacity: 256,
            pattern_extensions: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defaults (or the file named by `INTENT_ROUTER_CONFIG`) with
    /// environment overrides applied.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(raw) = std::env::var("INTENT_ROUTER_CONFIDENCE_SCALE") {
            match raw.parse() {
                Ok(v) => config.confidence_scale = v,
                Err(_) => warn!(value = %raw, "Ignoring unparsable INTENT_ROUTER_CONFIDENCE_SCALE"),
            }
        }
        if let Ok(raw) = std::env::var("INTENT_ROUTER_SIMPLE_WORDS") {
            match raw.parse() {
                Ok(v) => config.simple_word_limit = v,
                Err(_) => warn!(value = %raw, "Ignoring unparsable INTENT_ROUTER_SIMPLE_WORDS"),
            }
        }
        if let Ok(raw) = std::env::var("INTENT_ROUTER_MODERATE_WORDS") {
            match raw.parse() {
                Ok(v) => config.moderate_word_limit = v,
                Err(_) => warn!(value = %raw, "Ignoring unparsable INTENT_ROUTER_MODERATE_WORDS"),
            }
        }
        if let Ok(path) = std::env::var("INTENT_ROUTER_HISTORY_PATH") {
            config.history_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.confidence_scale.is_finite() || self.confidence_scale <= 0.0 {
            return Err(ConfigError::invalid(
                "confidence_scale",
                format!("must be a positive number, got {}", self.confidence_scale),
            ));
        }
        if self.simple_word_limit == 0 {
            return Err(ConfigError::invalid("simple_word_limit", "must be > 0"));
        }
        if self.simple_word_limit >= self.moderate_word_limit {
            return Err(ConfigError::invalid(
                "moderate_word_limit",
                format!(
                    "must exceed simple_word_limit ({} >= {})",
                    self.simple_word_limit, self.moderate_word_limit
                ),
            ));
        }
        if self.max_plan_tools == 0 {
            return Err(ConfigError::invalid("max_plan_tools", "must be > 0"));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::invalid("event_capacity", "must be > 0"));
        }
        self.costs.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = RouterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_scale, 0.3);
        assert_eq!(config.simple_word_limit, 10);
        assert_eq!(config.moderate_word_limit, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RouterConfig::from_toml_str(
            r#"
            confidence_scale = 0.5

            [costs.swarm]
            overhead_calls = 3
            time_ms = 12000
            "#,
        )
        .unwrap();
        assert_eq!(config.confidence_scale, 0.5);
        assert_eq!(config.simple_word_limit, 10);
        assert_eq!(config.costs.swarm.overhead_calls, 3);
        assert_eq!(config.costs.tool_chain.calls, 3);
    }

    #[test]
    fn test_pattern_extensions_parse() {
        let config = RouterConfig::from_toml_str(
            r#"
            [[pattern_extensions]]
            task_type = "dev_tools"
            keywords = ["rebase"]
            patterns = ['\bgit\s+rebase\b']
            "#,
        )
        .unwrap();
        assert_eq!(config.pattern_extensions.len(), 1);
        assert_eq!(config.pattern_extensions[0].task_type, TaskType::DevTools);
        assert_eq!(config.pattern_extensions[0].keywords, vec!["rebase"]);
    }

    #[test]
    fn test_rejects_inverted_word_limits() {
        let err = RouterConfig::from_toml_str("simple_word_limit = 30\nmoderate_word_limit = 10")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "moderate_word_limit",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let err = RouterConfig::from_toml_str("confidence_scale = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "confidence_scale",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unordered_costs() {
        let err = RouterConfig::from_toml_str(
            r#"
            [costs.tool_chain]
            calls = 1
            time_ms = 1500
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "costs", .. }));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = RouterConfig::from_toml_str("confidence_scale = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "moderate_word_limit = 40").unwrap();
        let config = RouterConfig::load(file.path()).unwrap();
        assert_eq!(config.moderate_word_limit, 40);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RouterConfig::load("/nonexistent/intent-router.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_cost_estimates() {
        let costs = CostTable::default();
        assert_eq!(costs.estimate(ExecutionMode::SingleTool, 0), (1, 500));
        assert_eq!(costs.estimate(ExecutionMode::ToolChain, 0), (3, 1_500));
        assert_eq!(costs.estimate(ExecutionMode::AgentSingle, 1), (4, 5_000));
        assert_eq!(costs.estimate(ExecutionMode::SwarmParallel, 3), (5, 10_000));
        assert_eq!(costs.estimate(ExecutionMode::SwarmConsensus, 4), (6, 10_000));
    }

    #[test]
    fn test_small_swarm_floors_at_agent_cost() {
        let costs = CostTable::default();
        assert_eq!(costs.estimate(ExecutionMode::SwarmParallel, 0), (4, 10_000));
        assert_eq!(costs.estimate(ExecutionMode::SwarmParallel, 1), (4, 10_000));
        assert_eq!(costs.estimate(ExecutionMode::SwarmPipeline, 2), (4, 10_000));
    }

    #[test]
    fn test_zero_overhead_swarm_keeps_ordering() {
        let config = RouterConfig::from_toml_str(
            r#"
            [costs.swarm]
            overhead_calls = 0
            time_ms = 10000
            "#,
        )
        .unwrap();
        let costs = config.costs;
        let (agent_calls, agent_time) = costs.estimate(ExecutionMode::AgentSingle, 1);
        for agents in 0..=6 {
            let (calls, time) = costs.estimate(ExecutionMode::SwarmConsensus, agents);
            assert!(calls >= agent_calls, "{} agents: {} < {}", agents, calls, agent_calls);
            assert!(time >= agent_time);
        }
        assert_eq!(costs.estimate(ExecutionMode::SwarmConsensus, 6), (6, 10_000));
    }
}
