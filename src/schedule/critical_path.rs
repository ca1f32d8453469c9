//! Critical path method over a task-dependency DAG.
//!
//! Forward pass for earliest start dates, backward pass for latest start
//! dates, margins, and the zero-margin chain of greatest total duration.

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};
use serde::Serialize;

use crate::graph::Weight;
use crate::schedule::task::{TaskId, TaskSet};
use crate::{Error, Result};

/// One line of the schedule table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow<W> {
    pub id: TaskId,
    pub duration: W,
    pub predecessors: Vec<TaskId>,
    pub successors: Vec<TaskId>,
    pub earliest_start: W,
    pub earliest_finish: W,
    pub latest_start: W,
    pub latest_finish: W,
    pub margin: W,
    pub critical: bool,
}

/// Dates, margins and critical path of a task set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResult<W> {
    /// Earliest start date of each task
    pub earliest: BTreeMap<TaskId, W>,
    /// Latest start date of each task that keeps the project duration
    pub latest: BTreeMap<TaskId, W>,
    /// `latest - earliest`
    pub margin: BTreeMap<TaskId, W>,
    pub successors: BTreeMap<TaskId, Vec<TaskId>>,
    /// Zero-margin tasks in task order
    pub critical_tasks: Vec<TaskId>,
    pub critical_path: Vec<TaskId>,
    pub project_duration: W,
    /// One row per task, in task order
    pub rows: Vec<ScheduleRow<W>>,
}

impl<W: Weight> ScheduleResult<W> {
    pub fn row(&self, id: &str) -> Option<&ScheduleRow<W>> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn is_critical(&self, id: &str) -> bool {
        self.row(id).map_or(false, |row| row.critical)
    }
}

/// Computes the schedule of `tasks`.
///
/// Fails with `UnknownPredecessor` on a dangling reference and with
/// `CycleDetected` if the predecessor relation is not acyclic. Both checks
/// run before any date is computed.
pub fn compute_schedule<W: Weight>(tasks: &TaskSet<W>) -> Result<ScheduleResult<W>> {
    tasks.validate_references()?;

    let tasks = tasks.as_slice();
    let n = tasks.len();
    let position: BTreeMap<&str, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| (task.id.as_str(), i))
        .collect();

    let predecessors: Vec<Vec<usize>> = tasks
        .iter()
        .map(|task| {
            task.predecessors
                .iter()
                .filter_map(|pred| position.get(pred.as_str()).copied())
                .collect()
        })
        .collect();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, preds) in predecessors.iter().enumerate() {
        for &p in preds {
            successors[p].push(i);
        }
    }

    let order = topological_order(&predecessors, &successors).map_err(|stuck| {
        Error::CycleDetected(stuck.into_iter().map(|i| tasks[i].id.clone()).collect())
    })?;

    // Forward pass
    let duration: Vec<W> = tasks.iter().map(|task| task.duration).collect();
    let mut earliest = vec![W::zero(); n];
    for &i in &order {
        earliest[i] = predecessors[i]
            .iter()
            .map(|&p| earliest[p] + duration[p])
            .fold(W::zero(), W::max);
    }
    let project_duration = (0..n)
        .map(|i| earliest[i] + duration[i])
        .fold(W::zero(), W::max);

    // Backward pass
    let mut latest = vec![W::zero(); n];
    for &i in order.iter().rev() {
        let finish = if successors[i].is_empty() {
            project_duration
        } else {
            successors[i]
                .iter()
                .map(|&s| latest[s])
                .fold(W::infinity(), W::min)
        };
        latest[i] = finish - duration[i];
        trace!(
            "task {}: earliest {}, latest {}",
            tasks[i].id,
            earliest[i],
            latest[i]
        );
    }

    let tolerance = W::epsilon() * project_duration.max(W::one()) * W::from(64).unwrap_or_else(W::one);
    let margin: Vec<W> = (0..n)
        .map(|i| {
            let slack = latest[i] - earliest[i];
            if slack.abs() <= tolerance {
                W::zero()
            } else {
                slack
            }
        })
        .collect();
    let critical: Vec<bool> = margin.iter().map(|m| *m == W::zero()).collect();

    let chain = longest_critical_chain(&duration, &predecessors, &successors, &critical, &order);

    let ids = |list: &[usize]| -> Vec<TaskId> { list.iter().map(|&i| tasks[i].id.clone()).collect() };
    let rows: Vec<ScheduleRow<W>> = (0..n)
        .map(|i| ScheduleRow {
            id: tasks[i].id.clone(),
            duration: duration[i],
            predecessors: ids(&predecessors[i]),
            successors: ids(&successors[i]),
            earliest_start: earliest[i],
            earliest_finish: earliest[i] + duration[i],
            latest_start: latest[i],
            latest_finish: latest[i] + duration[i],
            margin: margin[i],
            critical: critical[i],
        })
        .collect();

    let critical_path = ids(&chain);
    debug!(
        "scheduled {} tasks: project duration {}, critical path {}",
        n,
        project_duration,
        critical_path.join(" -> ")
    );

    Ok(ScheduleResult {
        earliest: rows.iter().map(|row| (row.id.clone(), row.earliest_start)).collect(),
        latest: rows.iter().map(|row| (row.id.clone(), row.latest_start)).collect(),
        margin: rows.iter().map(|row| (row.id.clone(), row.margin)).collect(),
        successors: rows.iter().map(|row| (row.id.clone(), row.successors.clone())).collect(),
        critical_tasks: rows.iter().filter(|row| row.critical).map(|row| row.id.clone()).collect(),
        critical_path,
        project_duration,
        rows,
    })
}

/// Kahn's algorithm, seeded in task order.
///
/// On a cycle, returns the tasks that never became ready (in task order).
fn topological_order(
    predecessors: &[Vec<usize>],
    successors: &[Vec<usize>],
) -> std::result::Result<Vec<usize>, Vec<usize>> {
    let n = predecessors.len();
    let mut pending: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut ready: VecDeque<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(i) = ready.pop_front() {
        order.push(i);
        for &s in &successors[i] {
            pending[s] -= 1;
            if pending[s] == 0 {
                ready.push_back(s);
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        Err((0..n).filter(|&i| pending[i] > 0).collect())
    }
}

/// Chain of critical tasks with the greatest total duration.
///
/// Chains run from a critical task without critical predecessors to one
/// without critical successors. On equal durations the earlier start task
/// wins, then the earlier successor at each step.
fn longest_critical_chain<W: Weight>(
    duration: &[W],
    predecessors: &[Vec<usize>],
    successors: &[Vec<usize>],
    critical: &[bool],
    order: &[usize],
) -> Vec<usize> {
    let n = duration.len();
    let mut best: Vec<W> = vec![W::zero(); n];
    let mut next: Vec<Option<usize>> = vec![None; n];

    for &i in order.iter().rev() {
        if !critical[i] {
            continue;
        }
        let mut tail = W::zero();
        for &s in successors[i].iter().filter(|&&s| critical[s]) {
            if next[i].is_none() || best[s] > tail {
                tail = best[s];
                next[i] = Some(s);
            }
        }
        best[i] = duration[i] + tail;
    }

    let start = (0..n)
        .filter(|&i| critical[i] && !predecessors[i].iter().any(|&p| critical[p]))
        .fold(None, |chosen: Option<usize>, i| match chosen {
            Some(c) if best[c] >= best[i] => Some(c),
            _ => Some(i),
        });

    let mut chain = Vec::new();
    let mut current = start;
    while let Some(i) = current {
        chain.push(i);
        current = next[i];
    }
    chain
}
