//! Client-side task state.
//!
//! `TaskState` holds the local copy of the task collection and reconciles it
//! with API results. The collection only changes in response to a successful
//! call, so every id it holds has been confirmed by the backend.

use shared::{Priority, Task, TaskDraft};

use crate::api::ApiError;
use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }

    pub fn count_for(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.total,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
        }
    }
}

/// Which kind of call failed; selects the message shown in the error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Toggle,
    Delete,
}

impl Operation {
    /// `api_base_url` is the address the failing client talks to.
    pub fn failure_message(&self, api_base_url: &str) -> String {
        match self {
            Operation::Load => format!(
                "Failed to load tasks. Make sure the backend is running on {}",
                api_base_url
            ),
            Operation::Create => "Failed to create task".to_string(),
            Operation::Update => "Failed to update task".to_string(),
            Operation::Toggle => "Failed to toggle task".to_string(),
            Operation::Delete => "Failed to delete task".to_string(),
        }
    }
}

/// Raw form input. Description is kept as typed and only becomes `None` when empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl TaskForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
        }
    }

    pub fn to_draft(&self) -> TaskDraft {
        let description = self.description.trim();
        TaskDraft {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            priority: self.priority,
        }
    }
}

/// What submitting the form on screen should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(TaskDraft),
    Update(u64, TaskDraft),
}

/// The task currently being edited, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub id: u64,
    pub form: TaskForm,
}

#[derive(Debug, Clone)]
pub struct TaskState {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    editing: Option<EditTarget>,
    new_task: TaskForm,
    filter: Filter,
    api_base_url: String,
}

impl Default for TaskState {
    fn default() -> Self {
        Self::new(config::api_base_url())
    }
}

impl TaskState {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
            error: None,
            editing: None,
            new_task: TaskForm::default(),
            filter: Filter::All,
            api_base_url: api_base_url.into(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn editing(&self) -> Option<&EditTarget> {
        self.editing.as_ref()
    }

    pub fn new_task(&self) -> &TaskForm {
        &self.new_task
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, result: Result<Vec<Task>, ApiError>) {
        self.loading = false;
        match result {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
            }
            Err(e) => self.fail(Operation::Load, &e),
        }
    }

    /// Draft for the create form, or `None` while its title is blank.
    pub fn create_request(&self) -> Option<TaskDraft> {
        let draft = self.new_task.to_draft();
        draft.validate().ok().map(|_| draft)
    }

    pub fn apply_created(&mut self, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                tracing::debug!(id = task.id, "task created");
                self.tasks.push(task);
                self.new_task = TaskForm::default();
            }
            Err(e) => self.fail(Operation::Create, &e),
        }
    }

    /// Enters edit mode for `id`, discarding any other in-progress edit.
    pub fn start_edit(&mut self, id: u64) {
        self.editing = self.find(id).map(|task| EditTarget {
            id,
            form: TaskForm::from_task(task),
        });
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Draft for the edit target, or `None` when not editing or its title is blank.
    pub fn update_request(&self) -> Option<(u64, TaskDraft)> {
        let target = self.editing.as_ref()?;
        let draft = target.form.to_draft();
        draft.validate().ok().map(|_| (target.id, draft))
    }

    /// Update while an edit target is set, create otherwise.
    pub fn submission(&self) -> Option<Submission> {
        if self.editing.is_some() {
            self.update_request()
                .map(|(id, draft)| Submission::Update(id, draft))
        } else {
            self.create_request().map(Submission::Create)
        }
    }

    pub fn apply_updated(&mut self, id: u64, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                self.replace(task);
                if self.editing.as_ref().is_some_and(|target| target.id == id) {
                    self.editing = None;
                }
            }
            Err(e) => self.fail(Operation::Update, &e),
        }
    }

    pub fn apply_toggled(&mut self, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => self.replace(task),
            Err(e) => self.fail(Operation::Toggle, &e),
        }
    }

    pub fn apply_deleted(&mut self, id: u64, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                if self.editing.as_ref().is_some_and(|target| target.id == id) {
                    self.editing = None;
                }
            }
            Err(e) => self.fail(Operation::Delete, &e),
        }
    }

    /// The form currently on screen: the edit form while editing, the create form otherwise.
    pub fn active_form_mut(&mut self) -> &mut TaskForm {
        match &mut self.editing {
            Some(target) => &mut target.form,
            None => &mut self.new_task,
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    // Responses for tasks removed in the meantime are dropped.
    fn replace(&mut self, updated: Task) {
        match self.tasks.iter_mut().find(|t| t.id == updated.id) {
            Some(task) => *task = updated,
            None => tracing::debug!(id = updated.id, "ignoring response for unknown task"),
        }
    }

    fn fail(&mut self, operation: Operation, error: &ApiError) {
        tracing::error!(?operation, %error, "task request failed");
        self.error = Some(operation.failure_message(&self.api_base_url));
    }
}
