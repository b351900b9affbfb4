use std::collections::HashMap;

use chrono::Local;

use crate::models::{Direction, FlatTask, Project, Task, TaskPatch};

/// Nanosecond creation timestamp used to derive ids.
fn timestamp() -> i64 {
    let now = Local::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_millis())
}

/// Generates an id for a new project.
pub fn new_project_id() -> String {
    timestamp().to_string()
}

/// Generates an id for a new task belonging to the given project.
///
/// Ids are `<project-id>-<timestamp>` and are never re-validated against the
/// existing forest.
pub fn new_task_id(project_id: &str) -> String {
    format!("{}-{}", project_id, timestamp())
}

/// Creates an empty project with a fresh id and the default color.
pub fn new_project(name: String) -> Project {
    Project {
        id: new_project_id(),
        name,
        is_north_star: false,
        color: "#6B7280".to_string(),
        tasks: Vec::new(),
    }
}

/// Finds a project by id.
pub fn find_project_mut<'a>(projects: &'a mut [Project], id: &str) -> Option<&'a mut Project> {
    projects.iter_mut().find(|p| p.id == id)
}

/// Finds a task anywhere in a forest by recursive descent.
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    for t in tasks {
        if t.id == id {
            return Some(t);
        }
        if let Some(found) = find_task(&t.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_task`].
pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    for t in tasks.iter_mut() {
        if t.id == id {
            return Some(t);
        }
        if let Some(found) = find_task_mut(&mut t.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Finds the sibling list containing the task with the given id.
fn find_siblings_mut<'a>(tasks: &'a mut Vec<Task>, id: &str) -> Option<&'a mut Vec<Task>> {
    if tasks.iter().any(|t| t.id == id) {
        return Some(tasks);
    }
    for t in tasks.iter_mut() {
        if let Some(found) = find_siblings_mut(&mut t.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// Appends a new empty leaf task to a project, either at the root or as a
/// child of `parent_id`. Returns the new task's id, or `None` if the project
/// or parent does not exist.
pub fn add_task(
    projects: &mut [Project],
    project_id: &str,
    parent_id: Option<&str>,
) -> Option<String> {
    let project = find_project_mut(projects, project_id)?;
    let task = Task::new(new_task_id(project_id));
    let id = task.id.clone();
    match parent_id {
        Some(pid) => {
            let parent = find_task_mut(&mut project.tasks, pid)?;
            parent.subtasks.push(task);
        }
        None => project.tasks.push(task),
    }
    Some(id)
}

/// Merges field changes into a task found by id. Returns whether the task
/// was found; a missing id leaves the forest unchanged.
pub fn update_task(
    projects: &mut [Project],
    project_id: &str,
    task_id: &str,
    patch: &TaskPatch,
) -> bool {
    if let Some(project) = find_project_mut(projects, project_id) {
        if let Some(task) = find_task_mut(&mut project.tasks, task_id) {
            if let Some(text) = &patch.text {
                task.text = text.clone();
            }
            if let Some(assignee) = &patch.assignee {
                task.assignee = assignee.clone();
            }
            if let Some(completed) = patch.completed {
                task.completed = completed;
            }
            return true;
        }
    }
    false
}

fn remove_in(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    let mut removed = tasks.len() != before;
    for t in tasks.iter_mut() {
        removed |= remove_in(&mut t.subtasks, id);
    }
    removed
}

/// Removes a task by id from wherever it occurs in the project's forest,
/// discarding its subtasks with it.
pub fn delete_task(projects: &mut [Project], project_id: &str, task_id: &str) -> bool {
    match find_project_mut(projects, project_id) {
        Some(project) => remove_in(&mut project.tasks, task_id),
        None => false,
    }
}

/// Flips the completed flag on a task.
pub fn toggle_complete(projects: &mut [Project], project_id: &str, task_id: &str) -> bool {
    if let Some(project) = find_project_mut(projects, project_id) {
        if let Some(task) = find_task_mut(&mut project.tasks, task_id) {
            task.completed = !task.completed;
            return true;
        }
    }
    false
}

/// Moves a task within its sibling list. Returns false (leaving the forest
/// untouched) when the task is missing or the move is a no-op, e.g. moving
/// the first sibling up.
pub fn move_task(
    projects: &mut [Project],
    project_id: &str,
    task_id: &str,
    direction: Direction,
) -> bool {
    let project = match find_project_mut(projects, project_id) {
        Some(p) => p,
        None => return false,
    };
    let siblings = match find_siblings_mut(&mut project.tasks, task_id) {
        Some(s) => s,
        None => return false,
    };
    let index = match siblings.iter().position(|t| t.id == task_id) {
        Some(i) => i,
        None => return false,
    };
    let new_index = direction.apply(index, siblings.len());
    if new_index == index {
        return false;
    }
    let task = siblings.remove(index);
    siblings.insert(new_index, task);
    true
}

fn max_today_order(projects: &[Project]) -> Option<u32> {
    flatten(projects)
        .iter()
        .filter(|f| f.task.is_today)
        .filter_map(|f| f.task.today_order)
        .max()
}

/// Toggles Today membership for a task.
///
/// Joining Today appends the task to the end of the list (max order + 1);
/// leaving it clears both the flag and the ordering key.
pub fn toggle_today(projects: &mut [Project], project_id: &str, task_id: &str) -> bool {
    let next_order = max_today_order(projects).map_or(0, |m| m + 1);
    if let Some(project) = find_project_mut(projects, project_id) {
        if let Some(task) = find_task_mut(&mut project.tasks, task_id) {
            if task.is_today {
                task.is_today = false;
                task.today_order = None;
            } else {
                task.is_today = true;
                task.today_order = Some(next_order);
            }
            return true;
        }
    }
    false
}

fn renumber_in(tasks: &mut [Task], orders: &HashMap<String, u32>) {
    for t in tasks.iter_mut() {
        if let Some(&order) = orders.get(&t.id) {
            t.today_order = Some(order);
        }
        renumber_in(&mut t.subtasks, orders);
    }
}

/// Moves a task within the Today list.
///
/// Today tasks may live in different projects and at different depths, so
/// this reorders the flattened Today sequence and then reassigns a dense
/// 0..N-1 ordering key to every Today task rather than splicing one sibling
/// list.
pub fn move_today_task(projects: &mut [Project], task_id: &str, direction: Direction) -> bool {
    let mut today: Vec<(String, u32)> = flatten(projects)
        .into_iter()
        .filter(|f| f.task.is_today)
        .map(|f| (f.task.id.clone(), f.task.today_order.unwrap_or(0)))
        .collect();
    today.sort_by_key(|(_, order)| *order);

    let index = match today.iter().position(|(id, _)| id == task_id) {
        Some(i) => i,
        None => return false,
    };
    let new_index = direction.apply(index, today.len());
    if new_index == index {
        return false;
    }
    let moved = today.remove(index);
    today.insert(new_index, moved);

    let orders: HashMap<String, u32> = today
        .into_iter()
        .enumerate()
        .map(|(i, (id, _))| (id, i as u32))
        .collect();
    for project in projects.iter_mut() {
        renumber_in(&mut project.tasks, &orders);
    }
    true
}

/// Moves a project within its group (North Star projects and regular
/// projects are ordered independently, with North Star listed first).
pub fn move_project(projects: &mut Vec<Project>, project_id: &str, direction: Direction) -> bool {
    let is_north_star = match projects.iter().find(|p| p.id == project_id) {
        Some(p) => p.is_north_star,
        None => return false,
    };
    let index = match projects
        .iter()
        .filter(|p| p.is_north_star == is_north_star)
        .position(|p| p.id == project_id)
    {
        Some(i) => i,
        None => return false,
    };
    let group_len = projects
        .iter()
        .filter(|p| p.is_north_star == is_north_star)
        .count();
    let new_index = direction.apply(index, group_len);
    if new_index == index {
        return false;
    }

    let (mut group, other): (Vec<Project>, Vec<Project>) = projects
        .drain(..)
        .partition(|p| p.is_north_star == is_north_star);
    let moved = group.remove(index);
    group.insert(new_index, moved);
    if is_north_star {
        group.extend(other);
        *projects = group;
    } else {
        let mut all = other;
        all.extend(group);
        *projects = all;
    }
    true
}

/// Non-mutating display projection: incomplete tasks first, then completed,
/// preserving relative order within each half, applied recursively to
/// subtasks. Idempotent.
pub fn sort_for_display(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|t| t.completed);
    for t in sorted.iter_mut() {
        t.subtasks = sort_for_display(&t.subtasks);
    }
    sorted
}

fn flatten_into(tasks: &[Task], project: &Project, out: &mut Vec<FlatTask>) {
    for t in tasks {
        out.push(FlatTask {
            task: t.clone(),
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            project_color: project.color.clone(),
        });
        flatten_into(&t.subtasks, project, out);
    }
}

/// Depth-first pre-order flattening of every project's forest, each task
/// annotated with its owning project.
pub fn flatten(projects: &[Project]) -> Vec<FlatTask> {
    let mut out = Vec::new();
    for p in projects {
        flatten_into(&p.tasks, p, &mut out);
    }
    out
}

/// The Today list: flattened tasks with `is_today`, completed last, then by
/// ordering key ascending.
pub fn today_list(projects: &[Project], hide_completed: bool) -> Vec<FlatTask> {
    let mut list: Vec<FlatTask> = flatten(projects)
        .into_iter()
        .filter(|f| f.task.is_today && (!hide_completed || !f.task.completed))
        .collect();
    list.sort_by_key(|f| (f.task.completed, f.task.today_order.unwrap_or(0)));
    list
}

/// All tasks across every project, completed last.
pub fn all_tasks(projects: &[Project], hide_completed: bool) -> Vec<FlatTask> {
    let mut list: Vec<FlatTask> = flatten(projects)
        .into_iter()
        .filter(|f| !hide_completed || !f.task.completed)
        .collect();
    list.sort_by_key(|f| f.task.completed);
    list
}

/// Total number of tasks in a forest, all levels included.
pub fn count_tasks(tasks: &[Task]) -> usize {
    tasks.iter().map(|t| 1 + count_tasks(&t.subtasks)).sum()
}

/// Number of completed tasks in a forest, all levels included.
pub fn count_completed(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|t| (t.completed as usize) + count_completed(&t.subtasks))
        .sum()
}
