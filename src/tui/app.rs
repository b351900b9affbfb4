use std::collections::HashSet;

use ratatui::widgets::TableState;

use crate::models::{Direction, FlatTask, Project, Task, TaskPatch};
use crate::storage::{load_projects, save_projects};
use crate::tree;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

#[derive(Clone, Copy, PartialEq)]
pub enum ViewMode {
    Today,
    Projects,
    AllTasks,
}

pub enum InputField {
    None,
    Text,
    Assignee,
    ProjectName,
    NewProjectName,
}

/// One selectable row in the current view.
pub enum DisplayItem {
    /// Project card header in the Projects view.
    ProjectHeader {
        id: String,
        name: String,
        is_north_star: bool,
        completed: usize,
        total: usize,
        expanded: bool,
    },
    /// A task row, indented by its nesting depth.
    Task { flat: FlatTask, depth: usize },
}

pub struct App {
    pub projects: Vec<Project>,
    pub display_items: Vec<DisplayItem>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    /// (project id, task id) the current edit applies to.
    pub target: Option<(String, String)>,
    /// Project id the current project-level edit applies to.
    pub target_project: Option<String>,
    pub show_completed: bool,
    // Session-only view state, never persisted.
    pub expanded_projects: HashSet<String>,
    pub expanded_tasks: HashSet<String>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new() -> App {
        let mut app = App {
            projects: load_projects(),
            display_items: Vec::new(),
            state: TableState::default(),
            view_mode: ViewMode::Today,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target: None,
            target_project: None,
            show_completed: false,
            expanded_projects: HashSet::new(),
            expanded_tasks: HashSet::new(),
        };
        app.reload();
        app
    }

    /// Rebuilds the display list for the current view and clamps the selection.
    pub fn reload(&mut self) {
        self.display_items.clear();
        match self.view_mode {
            ViewMode::Today => {
                for flat in tree::today_list(&self.projects, !self.show_completed) {
                    self.display_items.push(DisplayItem::Task { flat, depth: 0 });
                }
            }
            ViewMode::AllTasks => {
                for flat in tree::all_tasks(&self.projects, !self.show_completed) {
                    self.display_items.push(DisplayItem::Task { flat, depth: 0 });
                }
            }
            ViewMode::Projects => {
                // North Star group first, then regular, each in stored order.
                let ordered: Vec<&Project> = self
                    .projects
                    .iter()
                    .filter(|p| p.is_north_star)
                    .chain(self.projects.iter().filter(|p| !p.is_north_star))
                    .collect();
                let mut items = Vec::new();
                for project in ordered {
                    let expanded = self.expanded_projects.contains(&project.id);
                    items.push(DisplayItem::ProjectHeader {
                        id: project.id.clone(),
                        name: project.name.clone(),
                        is_north_star: project.is_north_star,
                        completed: tree::count_completed(&project.tasks),
                        total: tree::count_tasks(&project.tasks),
                        expanded,
                    });
                    if expanded {
                        let sorted = tree::sort_for_display(&project.tasks);
                        self.push_task_rows(&mut items, &sorted, project, 0);
                    }
                }
                self.display_items = items;
            }
        }

        if self.display_items.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.display_items.len() {
                self.state.select(Some(self.display_items.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    fn push_task_rows(
        &self,
        items: &mut Vec<DisplayItem>,
        tasks: &[Task],
        project: &Project,
        depth: usize,
    ) {
        for task in tasks {
            if !self.show_completed && task.completed {
                continue;
            }
            items.push(DisplayItem::Task {
                flat: FlatTask {
                    task: task.clone(),
                    project_id: project.id.clone(),
                    project_name: project.name.clone(),
                    project_color: project.color.clone(),
                },
                depth,
            });
            if !task.subtasks.is_empty() && self.expanded_tasks.contains(&task.id) {
                self.push_task_rows(items, &task.subtasks, project, depth + 1);
            }
        }
    }

    /// Selects the next row, wrapping at the end.
    pub fn next(&mut self) {
        if self.display_items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.display_items.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row, wrapping at the start.
    pub fn previous(&mut self) {
        if self.display_items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.display_items.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_item(&self) -> Option<&DisplayItem> {
        self.state.selected().and_then(|i| self.display_items.get(i))
    }

    /// The (project id, task id) pair of the selected task row, if any.
    pub fn selected_task(&self) -> Option<(String, String)> {
        match self.selected_item() {
            Some(DisplayItem::Task { flat, .. }) => {
                Some((flat.project_id.clone(), flat.task.id.clone()))
            }
            _ => None,
        }
    }

    /// The id of the selected project header row, if any.
    pub fn selected_project(&self) -> Option<String> {
        match self.selected_item() {
            Some(DisplayItem::ProjectHeader { id, .. }) => Some(id.clone()),
            _ => None,
        }
    }

    fn commit(&mut self) {
        let _ = save_projects(&self.projects);
        self.reload();
    }

    /// Cycles Today -> Projects -> All Tasks.
    pub fn cycle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Today => ViewMode::Projects,
            ViewMode::Projects => ViewMode::AllTasks,
            ViewMode::AllTasks => ViewMode::Today,
        };
        self.state.select(None);
        self.reload();
    }

    /// Toggles the visibility of completed tasks.
    pub fn toggle_completed_visibility(&mut self) {
        self.show_completed = !self.show_completed;
        self.reload();
    }

    /// Expands or collapses the selected project or task.
    pub fn toggle_expansion(&mut self) {
        match self.selected_item() {
            Some(DisplayItem::ProjectHeader { id, .. }) => {
                let id = id.clone();
                if !self.expanded_projects.remove(&id) {
                    self.expanded_projects.insert(id);
                }
            }
            Some(DisplayItem::Task { flat, .. }) => {
                if flat.task.subtasks.is_empty() {
                    return;
                }
                let id = flat.task.id.clone();
                if !self.expanded_tasks.remove(&id) {
                    self.expanded_tasks.insert(id);
                }
            }
            None => return,
        }
        self.reload();
    }

    /// Toggles the completed flag on the selected task.
    pub fn complete_selected(&mut self) {
        if let Some((project_id, task_id)) = self.selected_task() {
            if tree::toggle_complete(&mut self.projects, &project_id, &task_id) {
                self.commit();
            }
        }
    }

    /// Toggles Today membership on the selected task.
    pub fn today_selected(&mut self) {
        if let Some((project_id, task_id)) = self.selected_task() {
            if tree::toggle_today(&mut self.projects, &project_id, &task_id) {
                self.commit();
            }
        }
    }

    /// Deletes the selected task and its subtasks.
    pub fn delete_selected(&mut self) {
        if let Some((project_id, task_id)) = self.selected_task() {
            if tree::delete_task(&mut self.projects, &project_id, &task_id) {
                self.commit();
            }
        }
    }

    /// Deletes the selected project outright (Projects view only).
    pub fn delete_selected_project(&mut self) {
        if let Some(id) = self.selected_project() {
            self.projects.retain(|p| p.id != id);
            self.expanded_projects.remove(&id);
            self.commit();
        }
    }

    /// Toggles North Star on the selected project.
    pub fn star_selected_project(&mut self) {
        if let Some(id) = self.selected_project() {
            if let Some(p) = tree::find_project_mut(&mut self.projects, &id) {
                p.is_north_star = !p.is_north_star;
                self.commit();
            }
        }
    }

    /// Moves the selection target: Today order in the Today view, sibling
    /// order for tasks and group order for projects in the Projects view.
    pub fn move_selected(&mut self, direction: Direction) {
        let moved = match self.view_mode {
            ViewMode::Today => match self.selected_task() {
                Some((_, task_id)) => {
                    tree::move_today_task(&mut self.projects, &task_id, direction)
                }
                None => false,
            },
            ViewMode::Projects => {
                if let Some((project_id, task_id)) = self.selected_task() {
                    tree::move_task(&mut self.projects, &project_id, &task_id, direction)
                } else if let Some(id) = self.selected_project() {
                    tree::move_project(&mut self.projects, &id, direction)
                } else {
                    false
                }
            }
            // The All Tasks list has no explicit order of its own.
            ViewMode::AllTasks => false,
        };
        if moved {
            self.commit();
        }
    }

    /// Adds a task and opens its text for editing (Projects view only).
    ///
    /// With a project header selected the task lands at the project root;
    /// with a task selected it becomes that task's subtask and the parent is
    /// expanded so the new row is visible.
    pub fn add_task_at_selection(&mut self) {
        if self.view_mode != ViewMode::Projects {
            return;
        }
        let new = if let Some((project_id, parent_id)) = self.selected_task() {
            self.expanded_tasks.insert(parent_id.clone());
            tree::add_task(&mut self.projects, &project_id, Some(&parent_id))
                .map(|id| (project_id, id))
        } else if let Some(project_id) = self.selected_project() {
            self.expanded_projects.insert(project_id.clone());
            tree::add_task(&mut self.projects, &project_id, None).map(|id| (project_id, id))
        } else {
            None
        };
        if let Some((project_id, task_id)) = new {
            self.commit();
            self.target = Some((project_id, task_id));
            self.input_mode = InputMode::Editing;
            self.input_field = InputField::Text;
            self.input_buffer.clear();
        }
    }

    /// Initiates editing of the selected task's text or assignee.
    pub fn start_edit(&mut self, field: InputField) {
        if let Some((project_id, task_id)) = self.selected_task() {
            if let Some(project) = self.projects.iter().find(|p| p.id == project_id) {
                if let Some(task) = tree::find_task(&project.tasks, &task_id) {
                    self.input_buffer = match field {
                        InputField::Text => task.text.clone(),
                        InputField::Assignee => task.assignee.clone(),
                        _ => return,
                    };
                    self.target = Some((project_id, task_id));
                    self.input_mode = InputMode::Editing;
                    self.input_field = field;
                }
            }
        }
    }

    /// Initiates renaming of the selected project.
    pub fn start_rename_project(&mut self) {
        if let Some(id) = self.selected_project() {
            if let Some(p) = self.projects.iter().find(|p| p.id == id) {
                self.input_buffer = p.name.clone();
                self.target_project = Some(id);
                self.input_mode = InputMode::Editing;
                self.input_field = InputField::ProjectName;
            }
        }
    }

    /// Initiates creation of a new project (name prompt).
    pub fn start_new_project(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input_field = InputField::NewProjectName;
        self.input_buffer.clear();
    }

    /// Applies the input buffer according to the active field.
    pub fn handle_input(&mut self) {
        match self.input_field {
            InputField::Text | InputField::Assignee => {
                if let Some((project_id, task_id)) = self.target.clone() {
                    let patch = match self.input_field {
                        InputField::Text => TaskPatch {
                            text: Some(self.input_buffer.clone()),
                            ..TaskPatch::default()
                        },
                        _ => TaskPatch {
                            assignee: Some(self.input_buffer.clone()),
                            ..TaskPatch::default()
                        },
                    };
                    if tree::update_task(&mut self.projects, &project_id, &task_id, &patch) {
                        self.commit();
                    }
                }
            }
            InputField::ProjectName => {
                if let Some(id) = self.target_project.clone() {
                    if let Some(p) = tree::find_project_mut(&mut self.projects, &id) {
                        p.name = self.input_buffer.clone();
                        self.commit();
                    }
                }
            }
            InputField::NewProjectName => {
                if !self.input_buffer.is_empty() {
                    let project = tree::new_project(self.input_buffer.clone());
                    self.expanded_projects.insert(project.id.clone());
                    self.projects.push(project);
                    self.commit();
                }
            }
            InputField::None => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
        self.target = None;
        self.target_project = None;
    }
}
