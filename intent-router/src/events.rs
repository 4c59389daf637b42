//! Telemetry events for plan observers
//!
//! Broadcast-based pub/sub: the planner publishes one event per plan and any
//! number of sinks subscribe. Publishing with no subscribers is not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::types::{Complexity, ExecutionMode, TaskType};

/// Default channel capacity
pub const CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouterEvent {
    /// A plan was assembled
    PlanCreated {
        task_id: String,
        task_type: TaskType,
        execution_mode: ExecutionMode,
        complexity: Complexity,
        confidence: f64,
        timestamp: DateTime<Utc>,
    },

    /// No pattern table matched; the plan is a best-effort default
    LowConfidence {
        task_id: String,
        text_preview: String,
        timestamp: DateTime<Utc>,
    },
}

impl RouterEvent {
    pub fn task_id(&self) -> &str {
        match self {
            Self::PlanCreated { task_id, .. } | Self::LowConfidence { task_id, .. } => task_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PlanCreated { .. } => "plan_created",
            Self::LowConfidence { .. } => "low_confidence",
        }
    }
}

/// Shared reference to a PlanEventBus
pub type SharedPlanEventBus = Arc<PlanEventBus>;

/// Broadcast bus for router telemetry
#[derive(Debug)]
pub struct PlanEventBus {
    sender: broadcast::Sender<RouterEvent>,
}

impl PlanEventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    /// `capacity` is clamped to at least 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn shared(self) -> SharedPlanEventBus {
        Arc::new(self)
    }

    /// Publish to all current subscribers; returns how many received it.
    pub fn publish(&self, event: RouterEvent) -> usize {
        let event_type = event.event_type();
        match self.sender.send(event) {
            Ok(count) => {
                debug!(event_type, receivers = count, "Event published");
                count
            }
            Err(_) => {
                debug!(event_type, "Event published (no receivers)");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PlanEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
