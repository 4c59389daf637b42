//! Per-task-type keyword and regex tables.
//!
//! Keywords match as case-insensitive substrings; patterns are compiled with
//! `(?i)`. Each keyword and each pattern counts at most once per text, so a
//! table's theoretical maximum score is `keywords + 2 * patterns`.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::TaskType;

/// Weight of a keyword hit.
pub const KEYWORD_WEIGHT: u32 = 1;
/// Weight of a pattern hit.
pub const PATTERN_WEIGHT: u32 = 2;

/// Format: (task type, keywords, patterns)
const DEFAULT_TABLES: &[(TaskType, &[&str], &[&str])] = &[
    (
        TaskType::Calculation,
        &[
            "calculate",
            "calculation",
            "compute",
            "force",
            "torque",
            "tool life",
            "surface finish",
            "mrr",
            "formula",
            "deflection",
        ],
        &[
            r"\b(calculate|compute)\b",
            r"\bcutting\s+(force|speed)\b",
            r"\d+(\.\d+)?\s*(mm|rpm|m/min|kw)\b",
        ],
    ),
    (
        TaskType::DataQuery,
        &[
            "material",
            "properties",
            "lookup",
            "look up",
            "query",
            "find",
            "search",
            "retrieve",
            "database",
            "alarm",
        ],
        &[
            r"\b(what|which)\s+(is|are)\b",
            r"\b(get|show|fetch)\s+(me\s+)?(the\s+)?\w+",
            r"\balarm\s+(code\s+)?\d+",
        ],
    ),
    (
        TaskType::CodeGeneration,
        &[
            "write code",
            "implement",
            "generate",
            "create",
            "function",
            "class",
            "script",
            "module",
            "refactor",
            "endpoint",
        ],
        &[
            r"\b(write|create|generate)\s+(a\s+|an\s+)?(function|class|script|module|api)\b",
            r"\b(python|rust|javascript|typescript)\b",
        ],
    ),
    (
        TaskType::Analysis,
        &[
            "analyze",
            "analyse",
            "analysis",
            "pattern",
            "trend",
            "compare",
            "evaluate",
            "insight",
            "statistics",
            "root cause",
        ],
        &[
            r"\banaly[sz](e|is)\b",
            r"\b(why|how)\s+(does|did|is)\b",
            r"\bcompare\b.*\b(with|to|against)\b",
        ],
    ),
    (
        TaskType::Orchestration,
        &[
            "swarm",
            "orchestrate",
            "coordinate",
            "parallel",
            "pipeline",
            "consensus",
            "multi-agent",
            "agents",
            "deploy",
            "delegate",
        ],
        &[
            r"\b(parallel|pipeline|consensus)\s+swarm\b",
            r"\bdeploy\b.*\b(swarm|agents?)\b",
            r"\bmulti[- ]agent\b",
        ],
    ),
    (
        TaskType::Session,
        &[
            "session",
            "resume",
            "checkpoint",
            "save state",
            "restore",
            "context",
            "handoff",
            "continue",
        ],
        &[
            r"\b(resume|continue)\s+(the\s+)?(previous|last|session)\b",
            r"\bsave\s+(the\s+)?(state|progress)\b",
        ],
    ),
    (
        TaskType::Validation,
        &[
            "validate",
            "validation",
            "verify",
            "check",
            "test",
            "audit",
            "quality",
            "compliance",
            "safety",
        ],
        &[
            r"\b(validate|verify)\b",
            r"\b(run|execute)\s+(the\s+)?tests?\b",
            r"\bquality\s+(gate|check)\b",
        ],
    ),
    (
        TaskType::Documentation,
        &[
            "document",
            "readme",
            "explain",
            "describe",
            "summarize",
            "guide",
            "manual",
            "comment",
        ],
        &[
            r"\b(write|update)\s+(the\s+)?(docs|documentation|readme)\b",
            r"\bexplain\b",
        ],
    ),
    (
        TaskType::DevTools,
        &[
            "git",
            "commit",
            "build",
            "lint",
            "format",
            "debug",
            "compile",
            "install",
            "dependency",
        ],
        &[
            r"\bgit\s+(commit|push|pull|status|diff)\b",
            r"\b(cargo|npm|pip)\s+\w+",
        ],
    ),
];

static DEFAULT_PATTERN_SET: LazyLock<PatternSet> = LazyLock::new(|| {
    let tables = DEFAULT_TABLES
        .iter()
        .map(|(task_type, keywords, patterns)| {
            PatternTable::new(*task_type, *keywords, *patterns)
                .expect("default pattern tables should compile")
        })
        .collect();
    PatternSet { tables }
});

/// Keywords and patterns for one task type.
#[derive(Debug, Clone)]
pub struct PatternTable {
    pub task_type: TaskType,
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

/// Hits of one table against one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableMatch {
    pub score: u32,
    pub keyword_hits: usize,
    pub pattern_hits: usize,
    /// `keyword:<kw>` and `pattern:<re>` entries, keywords first, in table order
    pub evidence: Vec<String>,
}

impl PatternTable {
    /// Build a table. Keywords are lower-cased; patterns get the `(?i)` flag.
    pub fn new<K, P>(task_type: TaskType, keywords: &[K], patterns: &[P]) -> Result<Self, regex::Error>
    where
        K: AsRef<str>,
        P: AsRef<str>,
    {
        let keywords = keywords
            .iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            task_type,
            keywords,
            patterns,
        })
    }

    /// Copy of this table with extra keywords and patterns appended.
    pub fn extended<K, P>(&self, keywords: &[K], patterns: &[P]) -> Result<Self, regex::Error>
    where
        K: AsRef<str>,
        P: AsRef<str>,
    {
        let mut table = self.clone();
        for keyword in keywords {
            let keyword = keyword.as_ref().to_lowercase();
            if !keyword.is_empty() && !table.keywords.contains(&keyword) {
                table.keywords.push(keyword);
            }
        }
        for pattern in patterns {
            table
                .patterns
                .push(Regex::new(&format!("(?i){}", pattern.as_ref()))?);
        }
        Ok(table)
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.as_str())
    }

    /// Highest score this table can produce.
    pub fn max_score(&self) -> u32 {
        self.keywords.len() as u32 * KEYWORD_WEIGHT + self.patterns.len() as u32 * PATTERN_WEIGHT
    }

    /// Score `text`. `lowered` must be `text.to_lowercase()`.
    pub fn score(&self, text: &str, lowered: &str) -> TableMatch {
        let mut result = TableMatch::default();

        for keyword in &self.keywords {
            if lowered.contains(keyword.as_str()) {
                result.keyword_hits += 1;
                result.evidence.push(format!("keyword:{}", keyword));
            }
        }

        for pattern in &self.patterns {
            if pattern.is_match(text) {
                result.pattern_hits += 1;
                let source = pattern.as_str();
                result.evidence.push(format!(
                    "pattern:{}",
                    source.strip_prefix("(?i)").unwrap_or(source)
                ));
            }
        }

        result.score = result.keyword_hits as u32 * KEYWORD_WEIGHT
            + result.pattern_hits as u32 * PATTERN_WEIGHT;
        result
    }
}

/// One table per task type, kept in `TaskType::all()` order.
#[derive(Debug, Clone)]
pub struct PatternSet {
    tables: Vec<PatternTable>,
}

impl PatternSet {
    /// The built-in tables, compiled once per process.
    pub fn builtin() -> &'static PatternSet {
        &DEFAULT_PATTERN_SET
    }

    /// Build a set from arbitrary tables. Tables are reordered into
    /// declaration order; a later table for the same type replaces an earlier one.
    pub fn from_tables(tables: Vec<PatternTable>) -> Self {
        let mut ordered: Vec<PatternTable> = Vec::with_capacity(tables.len());
        for &task_type in TaskType::all() {
            if let Some(table) = tables.iter().rev().find(|t| t.task_type == task_type) {
                ordered.push(table.clone());
            }
        }
        Self { tables: ordered }
    }

    pub fn get(&self, task_type: TaskType) -> Option<&PatternTable> {
        self.tables.iter().find(|t| t.task_type == task_type)
    }

    /// Tables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PatternTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_type_in_order() {
        let set = PatternSet::builtin();
        let order: Vec<TaskType> = set.iter().map(|t| t.task_type).collect();
        assert_eq!(order, TaskType::all());
        for table in set.iter() {
            assert!(table.keyword_count() > 0, "{} has no keywords", table.task_type);
            assert!(table.pattern_count() > 0, "{} has no patterns", table.task_type);
        }
    }

    #[test]
    fn test_keyword_is_case_insensitive_substring() {
        let table = PatternTable::new(TaskType::Analysis, &["Trend"], &[] as &[&str]).unwrap();
        let text = "Show TRENDS for spindle load";
        let m = table.score(text, &text.to_lowercase());
        assert_eq!(m.keyword_hits, 1);
        assert_eq!(m.score, 1);
        assert_eq!(m.evidence, vec!["keyword:trend".to_string()]);
    }

    #[test]
    fn test_pattern_counts_once_and_weighs_double() {
        let table = PatternTable::new(TaskType::Validation, &[] as &[&str], &[r"\bverify\b"]).unwrap();
        let text = "verify this, then verify that";
        let m = table.score(text, &text.to_lowercase());
        assert_eq!(m.pattern_hits, 1);
        assert_eq!(m.score, PATTERN_WEIGHT);
        assert_eq!(m.evidence, vec![r"pattern:\bverify\b".to_string()]);
    }

    #[test]
    fn test_max_score() {
        let table = PatternTable::new(TaskType::Session, &["a", "b", "c"], &["x", "y"]).unwrap();
        assert_eq!(table.max_score(), 3 + 4);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(PatternTable::new(TaskType::Session, &["a"], &["(unclosed"]).is_err());
    }

    #[test]
    fn test_extended_appends_without_duplicates() {
        let base = PatternTable::new(TaskType::DevTools, &["git"], &[r"\bgit\b"]).unwrap();
        let ext = base.extended(&["GIT", "rebase"], &[r"\brebase\b"]).unwrap();
        assert_eq!(ext.keywords().collect::<Vec<_>>(), vec!["git", "rebase"]);
        assert_eq!(ext.pattern_count(), 2);
        let text = "rebase onto main";
        assert_eq!(ext.score(text, &text.to_lowercase()).score, 3);
        assert!(base.extended(&["x"], &["[bad"]).is_err());
    }

    #[test]
    fn test_from_tables_reorders_and_replaces() {
        let set = PatternSet::from_tables(vec![
            PatternTable::new(TaskType::DevTools, &["git"], &[] as &[&str]).unwrap(),
            PatternTable::new(TaskType::Calculation, &["old"], &[] as &[&str]).unwrap(),
            PatternTable::new(TaskType::Calculation, &["new"], &[] as &[&str]).unwrap(),
        ]);
        let order: Vec<TaskType> = set.iter().map(|t| t.task_type).collect();
        assert_eq!(order, vec![TaskType::Calculation, TaskType::DevTools]);
        let calc = set.get(TaskType::Calculation).unwrap();
        assert_eq!(calc.keywords().collect::<Vec<_>>(), vec!["new"]);
    }
}
