//! Shared-router behaviour under concurrent planning.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use intent_router::{ExecutionHistory, RouterConfig, TaskRouter};

const THREADS: usize = 8;
const PLANS_PER_THREAD: usize = 50;

fn texts() -> [&'static str; 4] {
    [
        "Calculate the cutting force for Ti-6Al-4V with 10mm depth",
        "Deploy a parallel swarm to extract all material properties",
        "git commit the fixture changes",
        "",
    ]
}

#[test]
fn concurrent_plans_get_unique_task_ids() {
    let router = Arc::new(TaskRouter::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                (0..PLANS_PER_THREAD)
                    .map(|j| router.plan(texts()[(i + j) % 4]).task_id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(id.starts_with("task_"));
            assert!(ids.insert(id), "duplicate task id");
        }
    }

    assert_eq!(ids.len(), THREADS * PLANS_PER_THREAD);
    assert_eq!(router.history().len(), THREADS * PLANS_PER_THREAD);
    assert_eq!(router.status().total_plans, THREADS * PLANS_PER_THREAD);
}

#[test]
fn concurrent_history_keeps_every_plan() {
    let router = Arc::new(TaskRouter::new());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for text in texts() {
                    router.plan(text);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = router.history().snapshot();
    assert_eq!(snapshot.len(), 16);
    let ids: HashSet<_> = snapshot.iter().map(|s| s.task_id.as_str()).collect();
    assert_eq!(ids.len(), 16);
}

#[test]
fn concurrent_plans_mirror_every_line_to_file() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    let config = RouterConfig::default().with_history_path(&path);
    let router = Arc::new(TaskRouter::from_config(config).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for text in texts() {
                    router.plan(text);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let loaded = ExecutionHistory::load_jsonl(&path).unwrap();
    assert_eq!(loaded, router.history().snapshot());
}

#[test]
fn subscribers_see_every_plan() {
    let router = Arc::new(TaskRouter::new());
    let mut rx = router.events().subscribe();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                router.plan("verify the probe");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut created = 0;
    while let Ok(event) = rx.try_recv() {
        if event.event_type() == "plan_created" {
            created += 1;
        }
    }
    assert_eq!(created, 4);
}

#[test]
fn global_router_is_shared() {
    let a = TaskRouter::global() as *const TaskRouter;
    let b = thread::spawn(|| TaskRouter::global() as *const TaskRouter as usize)
        .join()
        .unwrap();
    assert_eq!(a as usize, b);
}
