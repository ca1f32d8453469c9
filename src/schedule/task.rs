use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::graph::Weight;
use crate::{Error, Result};

/// Identifier of a task
pub type TaskId = String;

/// Textual marker for "no predecessor, starts with the project"
pub const PROJECT_START: &str = "-";

/// A unit of work with a duration and the tasks that must finish before it starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task<W = f64> {
    pub id: TaskId,
    pub duration: W,
    #[serde(default)]
    pub predecessors: Vec<TaskId>,
}

impl<W: Weight> Task<W> {
    pub fn new<I, S>(id: impl Into<TaskId>, duration: W, predecessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        Task {
            id: id.into(),
            duration,
            predecessors: predecessors.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the task starts with the project
    pub fn is_start(&self) -> bool {
        self.predecessors.is_empty()
    }
}

/// Tasks keyed by id, kept in insertion order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSet<W = f64> {
    tasks: Vec<Task<W>>,
    #[serde(skip)]
    index: HashMap<TaskId, usize>,
}

impl<W: Weight> TaskSet<W> {
    pub fn new() -> Self {
        TaskSet {
            tasks: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_tasks<I>(tasks: I) -> Result<Self>
    where
        I: IntoIterator<Item = Task<W>>,
    {
        let mut set = Self::new();
        for task in tasks {
            set.insert(task)?;
        }
        Ok(set)
    }

    /// Adds a task after normalizing its predecessor list.
    ///
    /// `-` markers and repeated ids are dropped. Predecessors are not
    /// resolved here so tasks can be inserted in any order.
    pub fn insert(&mut self, mut task: Task<W>) -> Result<()> {
        if self.index.contains_key(&task.id) {
            return Err(Error::DuplicateTask(task.id));
        }
        if !task.duration.is_finite() || task.duration < W::zero() {
            return Err(Error::InvalidDuration {
                task: task.id,
                duration: task.duration.to_string(),
            });
        }

        let mut seen = Vec::with_capacity(task.predecessors.len());
        task.predecessors.retain(|pred| {
            let keep = pred != PROJECT_START && !seen.contains(pred);
            if keep {
                seen.push(pred.clone());
            }
            keep
        });

        self.index.insert(task.id.clone(), self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    /// Removes a task and strips it from every predecessor list
    pub fn remove(&mut self, id: &str) -> Option<Task<W>> {
        let position = self.index.remove(id)?;
        let removed = self.tasks.remove(position);

        for task in &mut self.tasks {
            task.predecessors.retain(|pred| pred != id);
        }
        self.index = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (task.id.clone(), i))
            .collect();

        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Task<W>> {
        self.index.get(id).and_then(|&i| self.tasks.get(i))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task<W>> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task<W>] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Fails with `UnknownPredecessor` on the first dangling reference, in task order
    pub fn validate_references(&self) -> Result<()> {
        for task in &self.tasks {
            if let Some(missing) = task.predecessors.iter().find(|pred| !self.contains(pred)) {
                return Err(Error::UnknownPredecessor {
                    task: task.id.clone(),
                    predecessor: missing.clone(),
                });
            }
        }
        Ok(())
    }

    /// Inverse of the predecessor relation. Every task has an entry and
    /// successor lists follow task order.
    pub fn successors(&self) -> BTreeMap<TaskId, Vec<TaskId>> {
        let mut successors: BTreeMap<TaskId, Vec<TaskId>> = self
            .tasks
            .iter()
            .map(|task| (task.id.clone(), Vec::new()))
            .collect();
        for task in &self.tasks {
            for pred in &task.predecessors {
                if let Some(list) = successors.get_mut(pred) {
                    list.push(task.id.clone());
                }
            }
        }
        successors
    }
}

impl<W: Weight> Default for TaskSet<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a comma separated predecessor list as typed in a schedule table.
///
/// An empty string or `-` means the task starts with the project. Entries
/// that are not letters followed by optional digits (`a`, `b2`) are ignored.
pub fn parse_predecessors(text: &str) -> Vec<TaskId> {
    let trimmed = text.trim().trim_end_matches(|c: char| c == ',' || c.is_whitespace());
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|entry| is_task_id(entry))
        .map(str::to_string)
        .collect()
}

fn is_task_id(entry: &str) -> bool {
    let digits_start = entry
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(entry.len());
    let (letters, digits) = entry.split_at(digits_start);
    !letters.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// The 23-task project shipped with the scheduling demo
pub fn demo_project() -> TaskSet<f64> {
    let rows: [(&str, f64, &[&str]); 23] = [
        ("a", 7.0, &[]),
        ("b", 7.0, &["a"]),
        ("c", 15.0, &["b"]),
        ("d", 30.0, &["c"]),
        ("e", 45.0, &["d"]),
        ("f", 15.0, &["e"]),
        ("g", 45.0, &["d"]),
        ("h", 60.0, &["d"]),
        ("i", 20.0, &["h"]),
        ("j", 30.0, &["i"]),
        ("k", 30.0, &["f"]),
        ("l", 15.0, &["k"]),
        ("m", 30.0, &["g", "j", "l"]),
        ("n", 15.0, &["m"]),
        ("o", 30.0, &["n"]),
        ("p", 15.0, &["m"]),
        ("q", 15.0, &["o"]),
        ("r", 15.0, &["q"]),
        ("s", 30.0, &["q"]),
        ("t", 7.0, &["p"]),
        ("u", 4.0, &["r", "t"]),
        ("v", 2.0, &["s"]),
        ("w", 7.0, &["r", "s"]),
    ];

    let mut set = TaskSet::new();
    for (id, duration, predecessors) in rows {
        let inserted = set.insert(Task::new(id, duration, predecessors.iter().copied()));
        debug_assert!(inserted.is_ok(), "demo task {} rejected: {:?}", id, inserted);
    }
    set
}
