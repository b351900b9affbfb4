use std::io::{self, Write};
use std::path::PathBuf;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{Direction, Task, TaskPatch};
use crate::storage::{
    delete_database, export_file_name, export_projects, import_projects, load_projects,
    save_projects,
};
use crate::tree;

/// Creates a new project.
pub fn cmd_project_add(name: String, color: Option<String>, silent: bool) {
    let mut projects = load_projects();
    let mut project = tree::new_project(name);
    if let Some(c) = color {
        project.color = c;
    }
    let id = project.id.clone();
    projects.push(project);
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Project added (id = {})", id); }
    }
}

/// Lists all projects with their completion counts, North Star group first.
pub fn cmd_project_list() {
    let projects = load_projects();
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("North Star").add_attribute(Attribute::Bold),
            Cell::new("Color").add_attribute(Attribute::Bold),
            Cell::new("Tasks").add_attribute(Attribute::Bold),
        ]);

    let ordered = projects
        .iter()
        .filter(|p| p.is_north_star)
        .chain(projects.iter().filter(|p| !p.is_north_star));
    for p in ordered {
        let completed = tree::count_completed(&p.tasks);
        let total = tree::count_tasks(&p.tasks);
        table.add_row(vec![
            Cell::new(&p.id),
            Cell::new(&p.name),
            Cell::new(if p.is_north_star { "★" } else { "" }).fg(Color::Yellow),
            Cell::new(&p.color),
            Cell::new(format!("{}/{}", completed, total)),
        ]);
    }
    println!("{table}");
}

/// Renames and/or recolors a project.
pub fn cmd_project_edit(id: String, name: Option<String>, color: Option<String>, silent: bool) {
    let mut projects = load_projects();
    if let Some(p) = tree::find_project_mut(&mut projects, &id) {
        if let Some(n) = name {
            p.name = n;
        }
        if let Some(c) = color {
            p.color = c;
        }
        if let Err(e) = save_projects(&projects) {
            if !silent { eprintln!("Failed to save projects: {}", e); }
        } else {
            if !silent { println!("Project {} updated.", id); }
        }
    } else {
        if !silent { eprintln!("Project {} not found.", id); }
    }
}

/// Deletes a project outright, cascading all of its tasks.
pub fn cmd_project_remove(id: String, silent: bool) {
    let mut projects = load_projects();
    let len_before = projects.len();
    projects.retain(|p| p.id != id);
    if projects.len() == len_before {
        if !silent { eprintln!("Project {} not found.", id); }
    } else {
        if let Err(e) = save_projects(&projects) {
            if !silent { eprintln!("Failed to save projects: {}", e); }
        } else {
            if !silent { println!("Project {} removed.", id); }
        }
    }
}

/// Toggles a project's North Star flag.
pub fn cmd_project_star(id: String, silent: bool) {
    let mut projects = load_projects();
    if let Some(p) = tree::find_project_mut(&mut projects, &id) {
        p.is_north_star = !p.is_north_star;
        let starred = p.is_north_star;
        if let Err(e) = save_projects(&projects) {
            if !silent { eprintln!("Failed to save projects: {}", e); }
        } else {
            if !silent {
                println!(
                    "Project {} {} North Star.",
                    id,
                    if starred { "marked as" } else { "removed from" }
                );
            }
        }
    } else {
        if !silent { eprintln!("Project {} not found.", id); }
    }
}

/// Moves a project within its North Star or regular group.
pub fn cmd_project_move(id: String, direction: Direction, silent: bool) {
    let mut projects = load_projects();
    if !tree::move_project(&mut projects, &id, direction) {
        // Missing id or already at the boundary; nothing to persist.
        return;
    }
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Project {} moved.", id); }
    }
}

/// Adds a task to a project, at the root or under `parent` if given.
pub fn cmd_add(
    project_id: String,
    text: String,
    parent: Option<String>,
    assignee: Option<String>,
    silent: bool,
) {
    let mut projects = load_projects();
    let new_id = match tree::add_task(&mut projects, &project_id, parent.as_deref()) {
        Some(id) => id,
        None => {
            if !silent { eprintln!("Project or parent task not found."); }
            return;
        }
    };
    let patch = TaskPatch {
        text: Some(text),
        assignee,
        completed: None,
    };
    tree::update_task(&mut projects, &project_id, &new_id, &patch);
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Task added (id = {})", new_id); }
    }
}

/// Edits a task's text and/or assignee.
pub fn cmd_edit(
    project_id: String,
    task_id: String,
    text: Option<String>,
    assignee: Option<String>,
    silent: bool,
) {
    let mut projects = load_projects();
    let patch = TaskPatch {
        text,
        assignee,
        completed: None,
    };
    if !tree::update_task(&mut projects, &project_id, &task_id, &patch) {
        if !silent { eprintln!("Task {} not found.", task_id); }
        return;
    }
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Task {} updated.", task_id); }
    }
}

/// Removes a task and all of its subtasks.
pub fn cmd_remove(project_id: String, task_id: String, silent: bool) {
    let mut projects = load_projects();
    if !tree::delete_task(&mut projects, &project_id, &task_id) {
        if !silent { eprintln!("Task {} not found.", task_id); }
        return;
    }
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Task {} removed.", task_id); }
    }
}

/// Toggles a task's completed flag.
pub fn cmd_complete(project_id: String, task_id: String, silent: bool) {
    let mut projects = load_projects();
    if !tree::toggle_complete(&mut projects, &project_id, &task_id) {
        if !silent { eprintln!("Task {} not found.", task_id); }
        return;
    }
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Task {} toggled.", task_id); }
    }
}

/// Moves a task within its sibling list.
pub fn cmd_move(project_id: String, task_id: String, direction: Direction, silent: bool) {
    let mut projects = load_projects();
    if !tree::move_task(&mut projects, &project_id, &task_id, direction) {
        // Missing id or already at the boundary; nothing to persist.
        return;
    }
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Task {} moved.", task_id); }
    }
}

/// Toggles a task's Today membership.
pub fn cmd_today(project_id: String, task_id: String, silent: bool) {
    let mut projects = load_projects();
    if !tree::toggle_today(&mut projects, &project_id, &task_id) {
        if !silent { eprintln!("Task {} not found.", task_id); }
        return;
    }
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Task {} toggled on Today.", task_id); }
    }
}

/// Moves a task within the Today list, renumbering every Today task.
pub fn cmd_today_move(task_id: String, direction: Direction, silent: bool) {
    let mut projects = load_projects();
    if !tree::move_today_task(&mut projects, &task_id, direction) {
        return;
    }
    if let Err(e) = save_projects(&projects) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent { println!("Task {} moved.", task_id); }
    }
}

fn task_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Project").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Today").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);
    table
}

fn task_row(table: &mut Table, flat: &crate::models::FlatTask) {
    let t = &flat.task;
    let status = if t.completed { "Done" } else { "Pending" };
    let status_color = if t.completed { Color::Green } else { Color::Yellow };
    table.add_row(vec![
        Cell::new(&t.id),
        Cell::new(if t.text.is_empty() { "Empty task" } else { t.text.as_str() }),
        Cell::new(&flat.project_name),
        Cell::new(&t.assignee),
        Cell::new(if t.is_today { "★" } else { "" }).fg(Color::Yellow),
        Cell::new(status).fg(status_color),
    ]);
}

/// Lists every task across all projects, completed last.
///
/// By default, hides completed tasks unless `all` is true.
pub fn cmd_list(all: bool) {
    let projects = load_projects();
    let tasks = tree::all_tasks(&projects, !all);
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    let mut table = task_table();
    for flat in &tasks {
        task_row(&mut table, flat);
    }
    println!("{table}");
}

/// Lists the Today focus list in its explicit user order.
pub fn cmd_today_list(all: bool) {
    let projects = load_projects();
    let tasks = tree::today_list(&projects, !all);
    if tasks.is_empty() {
        println!("No tasks scheduled for today.");
        return;
    }
    let mut table = task_table();
    for flat in &tasks {
        task_row(&mut table, flat);
    }
    println!("{table}");
}

fn print_task_tree(tasks: &[Task], depth: usize, all: bool) {
    for t in tasks {
        if !all && t.completed {
            continue;
        }
        let marker = if t.completed { "[x]" } else { "[ ]" };
        let today = if t.is_today { " ★" } else { "" };
        let assignee = if t.assignee.is_empty() {
            String::new()
        } else {
            format!(" @{}", t.assignee)
        };
        println!(
            "{}{} {}{}{}  ({})",
            "  ".repeat(depth),
            marker,
            if t.text.is_empty() { "Empty task" } else { t.text.as_str() },
            assignee,
            today,
            t.id
        );
        print_task_tree(&t.subtasks, depth + 1, all);
    }
}

/// Prints a project's task tree, incomplete tasks first at every level.
pub fn cmd_tasks(project_id: String, all: bool) {
    let projects = load_projects();
    let project = match projects.iter().find(|p| p.id == project_id) {
        Some(p) => p,
        None => {
            eprintln!("Project {} not found.", project_id);
            return;
        }
    };
    let completed = tree::count_completed(&project.tasks);
    let total = tree::count_tasks(&project.tasks);
    println!("{} ({}/{} tasks)", project.name, completed, total);
    print_task_tree(&tree::sort_for_display(&project.tasks), 0, all);
}

/// Exports the full project array to a dated JSON file.
pub fn cmd_export(path: Option<PathBuf>, silent: bool) {
    let projects = load_projects();
    let path = path.unwrap_or_else(|| PathBuf::from(export_file_name()));
    if let Err(e) = export_projects(&projects, &path) {
        if !silent { eprintln!("Failed to export: {}", e); }
    } else {
        if !silent { println!("Exported to {}", path.display()); }
    }
}

/// Imports a previously exported file, replacing the entire database.
///
/// On parse failure the existing database is left untouched.
pub fn cmd_import(path: PathBuf, silent: bool) {
    let imported = match import_projects(&path) {
        Ok(p) => p,
        Err(e) => {
            if !silent {
                eprintln!("Error importing data. Please check the file format: {}", e);
            }
            return;
        }
    };
    if let Err(e) = save_projects(&imported) {
        if !silent { eprintln!("Failed to save projects: {}", e); }
    } else {
        if !silent {
            println!("Data imported successfully ({} projects).", imported.len());
        }
    }
}

/// Resets the database by deleting all projects and tasks.
pub fn cmd_reset(force: bool) {
    if !force {
        print!("Are you sure you want to delete all projects and tasks? This cannot be undone. [y/N] ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = delete_database() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
