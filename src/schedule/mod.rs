pub mod task;
pub mod critical_path;

pub use task::{demo_project, parse_predecessors, Task, TaskId, TaskSet, PROJECT_START};
pub use critical_path::{compute_schedule, ScheduleResult, ScheduleRow};
