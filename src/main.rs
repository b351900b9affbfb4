//! # Frontmind
//!
//! A terminal task manager for keeping your most important work in focus. Frontmind combines a fast CLI for quick entry with a rich TUI (Terminal User Interface) for interactive management.
//!
//! ## Features
//!
//! *   **Projects with nested tasks**: Tasks nest arbitrarily deep as subtasks.
//! *   **North Star projects**: Flag top-priority projects into their own group.
//! *   **Today list**: A cross-project, explicitly ordered focus list for the current day.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive dashboard with Today / Projects / All Tasks views.
//! *   **Data Persistence**: Projects are stored in standard XDG data directories (JSON format).
//! *   **Backup**: Export and import the whole database as a dated JSON file.
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Simply run the command without arguments to launch the interactive UI:
//!
//! ```bash
//! frontmind
//! # or explicitly
//! frontmind ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Global**
//! *   `q`: Quit
//! *   `v`: Cycle view (Today / Projects / All Tasks)
//! *   `c`: Toggle Show/Hide Completed Tasks
//!
//! **Task rows**
//! *   `Space`: Toggle Done
//! *   `t`: Toggle Today membership
//! *   `n`: Edit text
//! *   `s`: Edit assignee
//! *   `a`: Add task (root of the project / subtask of the selection)
//! *   `d`: Delete selected task
//! *   `J`/`K`: Move down/up one among siblings (Today order in the Today view)
//! *   `g`/`G`: Jump to top/bottom
//!
//! **Projects view**
//! *   `Enter`: Expand/collapse the selected project or task
//! *   `N`: New project
//! *   `r`: Rename selected project
//! *   `*`: Toggle North Star on the selected project
//! *   `D`: Delete selected project
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Projects
//! frontmind project add "Launch New Product" --color "#8B5CF6"
//! frontmind project list
//! frontmind project star <PROJECT_ID>
//! frontmind project move <PROJECT_ID> top
//!
//! # Tasks
//! frontmind add <PROJECT_ID> "Finalize feature specifications" --assignee Sarah
//! frontmind add <PROJECT_ID> "Create social media graphics" --under <TASK_ID>
//! frontmind complete <PROJECT_ID> <TASK_ID>
//! frontmind move <PROJECT_ID> <TASK_ID> up
//! frontmind tasks <PROJECT_ID>
//!
//! # Today focus list
//! frontmind today toggle <PROJECT_ID> <TASK_ID>
//! frontmind today move <TASK_ID> top
//! frontmind today list
//!
//! # Backup
//! frontmind export
//! frontmind import front-of-mind-backup-2026-08-28.json
//! ```
//!
//! ## Data Storage
//!
//! Projects are saved in your local data directory:
//! *   Linux: `~/.local/share/frontmind/projects.json`
//! *   macOS: `~/Library/Application Support/frontmind/projects.json`
//! *   Windows: `%APPDATA%\frontmind\projects.json`
//!
//! You can override this by setting the `FRONTMIND_DB` environment variable.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use frontmind::commands::*;
use frontmind::models::Direction;
use frontmind::tui::run_tui;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "frontmind")]
#[command(about = "Terminal task manager with projects, subtasks and a Today focus list", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Add a new task to a project
    Add {
        /// Project id
        project: String,
        /// Task text (quoted if it has spaces)
        text: String,
        /// Add as a subtask of this task id
        #[arg(short, long)]
        under: Option<String>,
        /// Assignee name
        #[arg(short, long)]
        assignee: Option<String>,
    },
    /// Edit a task
    Edit {
        /// Project id
        project: String,
        /// Task id
        id: String,
        /// New task text
        #[arg(short, long)]
        text: Option<String>,
        /// New assignee
        #[arg(short, long)]
        assignee: Option<String>,
    },
    /// Remove a task and all of its subtasks
    Remove {
        /// Project id
        project: String,
        /// Task id
        id: String,
    },
    /// Toggle a task's completed state
    Complete {
        /// Project id
        project: String,
        /// Task id
        id: String,
    },
    /// Move a task within its sibling list
    Move {
        /// Project id
        project: String,
        /// Task id
        id: String,
        /// Where to move it
        direction: Direction,
    },
    /// Manage the Today focus list
    Today {
        #[command(subcommand)]
        command: TodayCommands,
    },
    /// List all tasks across projects, completed last
    List {
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Print a project's task tree
    Tasks {
        /// Project id
        project: String,
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Export all data to a dated JSON backup file
    Export {
        /// Destination path (defaults to front-of-mind-backup-<date>.json)
        path: Option<PathBuf>,
    },
    /// Import a backup file, replacing all data
    Import {
        /// Path to the backup file
        path: PathBuf,
    },
    /// Reset the database (delete all projects and tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Add a new project
    Add {
        /// Project name
        name: String,
        /// Display color as a hex string
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List projects
    List,
    /// Rename or recolor a project
    Edit {
        /// Project id
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a project and all of its tasks
    Remove {
        /// Project id
        id: String,
    },
    /// Toggle a project's North Star flag
    Star {
        /// Project id
        id: String,
    },
    /// Move a project within its North Star or regular group
    Move {
        /// Project id
        id: String,
        /// Where to move it
        direction: Direction,
    },
}

#[derive(Subcommand)]
enum TodayCommands {
    /// Toggle a task's Today membership
    Toggle {
        /// Project id
        project: String,
        /// Task id
        id: String,
    },
    /// Move a task within the Today list
    Move {
        /// Task id
        id: String,
        /// Where to move it
        direction: Direction,
    },
    /// Show the Today list in its explicit order
    List {
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Project { command }) => match command {
            ProjectCommands::Add { name, color } => cmd_project_add(name, color, false),
            ProjectCommands::List => cmd_project_list(),
            ProjectCommands::Edit { id, name, color } => cmd_project_edit(id, name, color, false),
            ProjectCommands::Remove { id } => cmd_project_remove(id, false),
            ProjectCommands::Star { id } => cmd_project_star(id, false),
            ProjectCommands::Move { id, direction } => cmd_project_move(id, direction, false),
        },
        Some(Commands::Add { project, text, under, assignee }) => {
            cmd_add(project, text, under, assignee, false)
        }
        Some(Commands::Edit { project, id, text, assignee }) => {
            cmd_edit(project, id, text, assignee, false)
        }
        Some(Commands::Remove { project, id }) => cmd_remove(project, id, false),
        Some(Commands::Complete { project, id }) => cmd_complete(project, id, false),
        Some(Commands::Move { project, id, direction }) => cmd_move(project, id, direction, false),
        Some(Commands::Today { command }) => match command {
            TodayCommands::Toggle { project, id } => cmd_today(project, id, false),
            TodayCommands::Move { id, direction } => cmd_today_move(id, direction, false),
            TodayCommands::List { all } => cmd_today_list(all),
        },
        Some(Commands::List { all }) => cmd_list(all),
        Some(Commands::Tasks { project, all }) => cmd_tasks(project, all),
        Some(Commands::Export { path }) => cmd_export(path, false),
        Some(Commands::Import { path }) => cmd_import(path, false),
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "frontmind", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
