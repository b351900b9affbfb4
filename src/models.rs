use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A project: a named, colored container for a forest of tasks.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier (epoch-millis string at creation).
    pub id: String,
    /// Display name of the project.
    pub name: String,
    /// Marks the project as a top-priority "North Star" project.
    /// North Star projects are listed in their own group, ahead of the rest.
    #[serde(default)]
    pub is_north_star: bool,
    /// Display color as a hex string, e.g. "#6B7280".
    #[serde(default = "default_color")]
    pub color: String,
    /// Root-level tasks, in display order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A task, nested arbitrarily deep via `subtasks`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, derived from the parent id plus a creation timestamp.
    pub id: String,
    /// The task description.
    pub text: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// Name of the person the task is assigned to, empty if unassigned.
    #[serde(default)]
    pub assignee: String,
    /// Whether the task is on the cross-project "Today" focus list.
    #[serde(default)]
    pub is_today: bool,
    /// Position within the Today list. Set only while `is_today` is true;
    /// densely renumbered 0..N-1 on every Today reorder.
    #[serde(default)]
    pub today_order: Option<u32>,
    /// Child tasks, in display order.
    #[serde(default)]
    pub subtasks: Vec<Task>,
}

impl Task {
    /// Creates an empty leaf task with the given id.
    pub fn new(id: String) -> Task {
        Task {
            id,
            text: String::new(),
            completed: false,
            assignee: String::new(),
            is_today: false,
            today_order: None,
            subtasks: Vec::new(),
        }
    }
}

fn default_color() -> String {
    "#6B7280".to_string()
}

/// A task paired with its owning project, produced by flattening the forest.
/// Used for the Today and All Tasks views, where tasks from different
/// projects and nesting depths appear in one list.
#[derive(Debug, Clone)]
pub struct FlatTask {
    pub task: Task,
    pub project_id: String,
    pub project_name: String,
    pub project_color: String,
}

/// Field changes to merge into a task. `None` leaves the field unchanged.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub assignee: Option<String>,
    pub completed: Option<bool>,
}

/// Where to move an item within an ordered list.
///
/// `Up`/`Down` clamp at the list boundaries; `Top`/`Bottom` jump to the ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Up,
    Down,
    Top,
    Bottom,
}

impl Direction {
    /// Computes the destination index for an item at `index` in a list of
    /// `len` items. Never wraps around.
    pub fn apply(self, index: usize, len: usize) -> usize {
        match self {
            Direction::Up => index.saturating_sub(1),
            Direction::Down => (index + 1).min(len.saturating_sub(1)),
            Direction::Top => 0,
            Direction::Bottom => len.saturating_sub(1),
        }
    }
}
