//! End-to-end routing scenarios: one description in, one full plan out.

use intent_router::{
    Complexity, ExecutionMode, TaskRouter, TaskType, DEFAULT_AGENT, INIT_HOOK, OVERSIGHT_AGENT,
};

const CUTTING_FORCE: &str = "Calculate the cutting force for Ti-6Al-4V with 10mm depth";
const PARALLEL_SWARM: &str = "Deploy a parallel swarm to extract all material properties";
const VIBRATION_ANALYSIS: &str = "Please analyze the spindle vibration logs from last week and \
    look for recurring patterns that appear before the tool breaks so we can understand whether \
    feed changes or coolant interruptions are the real drivers behind it";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("intent_router=debug")
        .with_test_writer()
        .try_init();
}

// ── Single tool calculation ──────────────────────────────────────────

#[test]
fn scenario_cutting_force_single_tool() {
    init_tracing();
    let router = TaskRouter::new();
    let classification = router.classify(CUTTING_FORCE);
    assert_eq!(classification.task_type, TaskType::Calculation);
    assert_eq!(classification.execution_mode, ExecutionMode::SingleTool);
    assert_eq!(classification.confidence, 1.0);

    let plan = router.plan(CUTTING_FORCE);
    assert_eq!(plan.tools[0], "calc_cutting_force");
    assert_eq!(plan.tools.len(), 3);
    assert_eq!(plan.estimated_calls, 1);
    assert_eq!(plan.estimated_time_ms, 500);
    assert!(plan.swarm_pattern.is_none());
    assert_eq!(
        plan.hooks_to_fire,
        vec![INIT_HOOK, "calc.validate_inputs", "calc.safety_bounds"]
    );
}

#[test]
fn scenario_cutting_force_result_json() {
    let result = TaskRouter::new().execute(CUTTING_FORCE);
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["task_id"].as_str().unwrap().starts_with("task_"));
    assert_eq!(json["classification"]["type"], "calculation");
    assert_eq!(json["classification"]["mode"], "single_tool");
    assert_eq!(json["classification"]["complexity"], "simple");
    assert_eq!(json["plan"]["swarm_pattern"], serde_json::Value::Null);
    assert_eq!(json["plan"]["estimated_calls"], 1);
    assert_eq!(json["hooks"][0], INIT_HOOK);
    assert_eq!(json["recommended_action"], "Call calc_cutting_force directly");
}

// ── Swarm ────────────────────────────────────────────────────────────

#[test]
fn scenario_parallel_swarm() {
    init_tracing();
    let router = TaskRouter::new();
    let plan = router.plan(PARALLEL_SWARM);
    assert_eq!(plan.task_type, TaskType::Orchestration);
    assert_eq!(plan.execution_mode, ExecutionMode::SwarmParallel);
    assert_eq!(plan.swarm_pattern.as_deref(), Some("parallel"));
    assert_eq!(
        plan.agents,
        vec!["swarm_coordinator", "task_decomposer", "result_aggregator"]
    );
    assert_eq!(plan.estimated_calls, 5);
    assert_eq!(plan.estimated_time_ms, 10_000);
}

#[test]
fn scenario_parallel_swarm_recommendation() {
    let result = TaskRouter::new().execute(PARALLEL_SWARM);
    assert_eq!(
        result.recommended_action,
        "Deploy parallel swarm with agents: swarm_coordinator, task_decomposer, result_aggregator"
    );
}

// ── Empty input ──────────────────────────────────────────────────────

#[test]
fn scenario_empty_text_degrades_to_defaults() {
    init_tracing();
    let router = TaskRouter::new();
    let classification = router.classify("");
    assert_eq!(classification.confidence, 0.0);
    assert_eq!(classification.complexity, Complexity::Simple);
    assert_eq!(classification.execution_mode, ExecutionMode::SingleTool);
    assert_eq!(classification.word_count, 0);

    let plan = router.plan("");
    assert_eq!(plan.task_type, TaskType::Calculation);
    assert!(!plan.tools.is_empty());
    assert!(!plan.agents.is_empty());
    assert_eq!(plan.hooks_to_fire[0], INIT_HOOK);
}

#[test]
fn scenario_empty_registries_still_plan() {
    let router = TaskRouter::new()
        .with_tools(intent_router::ToolRegistry::empty())
        .with_agents(intent_router::AgentRegistry::empty());
    let result = router.execute("");
    assert!(result.plan.tools.is_empty());
    assert_eq!(result.plan.agents, vec![DEFAULT_AGENT]);
    assert_eq!(
        result.recommended_action,
        "No tool registered for calculation; route to agent general_assistant"
    );
}

// ── Complex analysis ─────────────────────────────────────────────────

#[test]
fn scenario_long_analysis_escalates_to_agent() {
    init_tracing();
    let router = TaskRouter::new();
    let classification = router.classify(VIBRATION_ANALYSIS);
    assert!(classification.word_count >= 30);
    assert_eq!(classification.task_type, TaskType::Analysis);
    assert_eq!(classification.complexity, Complexity::Complex);
    assert_eq!(classification.execution_mode, ExecutionMode::AgentSingle);

    let plan = router.plan(VIBRATION_ANALYSIS);
    assert_eq!(
        plan.agents,
        vec![OVERSIGHT_AGENT, "data_analyst", "pattern_detector"]
    );
    assert_eq!(
        plan.tools,
        vec!["pattern_analyzer", "trend_analyzer", "compare_datasets"]
    );
    assert_eq!(plan.estimated_calls, 4);
    assert_eq!(plan.estimated_time_ms, 5_000);
}

#[test]
fn scenario_long_analysis_delegates_to_specialist() {
    let result = TaskRouter::new().execute(VIBRATION_ANALYSIS);
    assert_eq!(result.recommended_action, "Delegate to agent data_analyst");
}

// ── Tool chain ───────────────────────────────────────────────────────

#[test]
fn scenario_moderate_validation_chains_tools() {
    let text = "Run the tests and validate the output of the new probing routine before release";
    let result = TaskRouter::new().execute(text);
    assert_eq!(result.classification.task_type, TaskType::Validation);
    assert_eq!(result.classification.complexity, Complexity::Moderate);
    assert_eq!(result.classification.mode, ExecutionMode::ToolChain);
    assert_eq!(result.plan.estimated_calls, 3);
    assert_eq!(
        result.recommended_action,
        "Chain tools: test_runner -> quality_gate -> safety_check"
    );
}

// ── History ──────────────────────────────────────────────────────────

#[test]
fn scenarios_are_recorded_in_order() {
    let router = TaskRouter::new();
    router.plan(CUTTING_FORCE);
    router.plan(PARALLEL_SWARM);
    router.plan("");
    router.execute(VIBRATION_ANALYSIS);

    let stats = router.history_stats();
    assert_eq!(stats.total_plans, 4);
    assert_eq!(stats.low_confidence, 1);
    assert_eq!(stats.by_task_type[&TaskType::Calculation], 2);

    let status = router.status();
    assert_eq!(
        status.recent_task_types,
        vec![
            TaskType::Calculation,
            TaskType::Orchestration,
            TaskType::Calculation,
            TaskType::Analysis
        ]
    );
}
