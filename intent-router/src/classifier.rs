//! Task classification and execution-mode selection
//!
//! Scores a description against every pattern table, picks the best task
//! type, normalizes a confidence, buckets the description by word count and
//! chooses an execution mode.
//!
//! # Mode decision table
//!
//! ```text
//! Task type       | Condition                         | Mode
//! ----------------|-----------------------------------|----------------
//! orchestration   | text contains "consensus"         | swarm_consensus
//! orchestration   | "pipeline" or "sequential"        | swarm_pipeline
//! orchestration   | otherwise                         | swarm_parallel
//! any             | simple                            | single_tool
//! analysis/codegen| complex                           | agent_single
//! validation      | moderate or complex               | tool_chain
//! any             | otherwise                         | single_tool
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RouterConfig;
use crate::patterns::PatternSet;
use crate::types::{Complexity, ExecutionMode, TaskType};

/// Result of classifying one description. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaskClassification {
    pub task_type: TaskType,
    /// Heuristic match strength in [0, 1]; 0.0 means nothing matched
    pub confidence: f64,
    /// Keywords and patterns of the winning table that matched
    pub matched_evidence: Vec<String>,
    pub execution_mode: ExecutionMode,
    pub complexity: Complexity,
    /// Raw score of the winning table
    pub score: u32,
    pub word_count: usize,
}

impl TaskClassification {
    /// No table matched anything; the task type is only the tie-break default.
    pub fn is_low_confidence(&self) -> bool {
        self.score == 0
    }
}

/// Bucket a word count into a complexity tier.
pub fn complexity_for(word_count: usize, simple_limit: usize, moderate_limit: usize) -> Complexity {
    if word_count < simple_limit {
        Complexity::Simple
    } else if word_count < moderate_limit {
        Complexity::Moderate
    } else {
        Complexity::Complex
    }
}

/// Choose an execution mode. First matching rule wins.
pub fn select_execution_mode(
    task_type: TaskType,
    complexity: Complexity,
    text: &str,
) -> ExecutionMode {
    let lowered = text.to_lowercase();

    if task_type == TaskType::Orchestration {
        if lowered.contains("consensus") {
            return ExecutionMode::SwarmConsensus;
        }
        if lowered.contains("pipeline") || lowered.contains("sequential") {
            return ExecutionMode::SwarmPipeline;
        }
        return ExecutionMode::SwarmParallel;
    }

    if complexity == Complexity::Simple {
        return ExecutionMode::SingleTool;
    }

    match task_type {
        TaskType::Analysis | TaskType::CodeGeneration if complexity == Complexity::Complex => {
            ExecutionMode::AgentSingle
        }
        TaskType::Validation => ExecutionMode::ToolChain,
        _ => ExecutionMode::SingleTool,
    }
}

/// Keyword/regex classifier over a fixed pattern set.
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: PatternSet,
    confidence_scale: f64,
    simple_word_limit: usize,
    moderate_word_limit: usize,
}

impl Classifier {
    /// Classifier over the built-in tables with default thresholds.
    pub fn new() -> Self {
        Self::with_patterns(PatternSet::default(), &RouterConfig::default())
    }

    pub fn with_patterns(patterns: PatternSet, config: &RouterConfig) -> Self {
        Self {
            patterns,
            confidence_scale: config.confidence_scale,
            simple_word_limit: config.simple_word_limit,
            moderate_word_limit: config.moderate_word_limit,
        }
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Classify a description. Never fails: text matching nothing yields the
    /// first task type with confidence 0.0.
    pub fn classify(&self, text: &str) -> TaskClassification {
        let lowered = text.to_lowercase();

        // Strict `>` keeps the earliest table on ties.
        let mut best: Option<(TaskType, crate::patterns::TableMatch, u32)> = None;
        for table in self.patterns.iter() {
            let m = table.score(text, &lowered);
            let replace = match &best {
                Some((_, current, _)) => m.score > current.score,
                None => true,
            };
            if replace {
                best = Some((table.task_type, m, table.max_score()));
            }
        }

        let (task_type, matched, max_score) =
            best.unwrap_or((TaskType::all()[0], Default::default(), 0));

        let confidence = self.confidence(matched.score, max_score);
        let word_count = text.split_whitespace().count();
        let complexity = complexity_for(word_count, self.simple_word_limit, self.moderate_word_limit);
        let execution_mode = select_execution_mode(task_type, complexity, text);

        debug!(
            task_type = %task_type,
            score = matched.score,
            confidence,
            complexity = %complexity,
            mode = %execution_mode,
            "Classified task"
        );

        TaskClassification {
            task_type,
            confidence,
            matched_evidence: matched.evidence,
            execution_mode,
            complexity,
            score: matched.score,
            word_count,
        }
    }

    /// `score / max(scale * max_score, 1)`, capped at 1.0.
    fn confidence(&self, score: u32, max_score: u32) -> f64 {
        let denominator = (self.confidence_scale * f64::from(max_score)).max(1.0);
        (f64::from(score) / denominator).min(1.0)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
