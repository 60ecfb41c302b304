use sauron::prelude::*;
use shared::{Priority, Task};
use web_sys::window;

use crate::api::{ApiError, TaskClient};
use crate::state::{Filter, Submission, TaskState};

#[derive(Debug, Clone)]
pub enum Msg {
    LoadTasks,
    TasksLoaded(Result<Vec<Task>, ApiError>),

    // Form
    SetTitle(String),
    SetDescription(String),
    SetPriority(Priority),
    SubmitForm,
    CancelEdit,
    TaskCreated(Result<Task, ApiError>),
    TaskUpdated(u64, Result<Task, ApiError>),

    // Rows
    EditTask(u64),
    ToggleTask(u64),
    TaskToggled(Result<Task, ApiError>),
    DeleteTask(u64),
    TaskDeleted(u64, Result<(), ApiError>),

    SetFilter(Filter),
    DismissError,
}

#[derive(Debug, Clone)]
pub struct App {
    pub(crate) state: TaskState,
    client: TaskClient,
}

impl App {
    pub fn new(client: TaskClient) -> Self {
        Self {
            state: TaskState::new(client.base_url()),
            client,
        }
    }
}

impl Application for App {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTasks })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTasks => {
                self.state.begin_load();
                let client = self.client.clone();
                Cmd::new(async move { Msg::TasksLoaded(client.list().await) })
            }
            Msg::TasksLoaded(result) => {
                self.state.finish_load(result);
                Cmd::none()
            }
            Msg::SetTitle(title) => {
                self.state.active_form_mut().title = title;
                Cmd::none()
            }
            Msg::SetDescription(description) => {
                self.state.active_form_mut().description = description;
                Cmd::none()
            }
            Msg::SetPriority(priority) => {
                self.state.active_form_mut().priority = priority;
                Cmd::none()
            }
            Msg::SubmitForm => {
                let client = self.client.clone();
                match self.state.submission() {
                    Some(Submission::Create(draft)) => {
                        Cmd::new(async move { Msg::TaskCreated(client.create(&draft).await) })
                    }
                    Some(Submission::Update(id, draft)) => {
                        Cmd::new(async move { Msg::TaskUpdated(id, client.update(id, &draft).await) })
                    }
                    None => Cmd::none(),
                }
            }
            Msg::CancelEdit => {
                self.state.cancel_edit();
                Cmd::none()
            }
            Msg::TaskCreated(result) => {
                self.state.apply_created(result);
                Cmd::none()
            }
            Msg::TaskUpdated(id, result) => {
                self.state.apply_updated(id, result);
                Cmd::none()
            }
            Msg::EditTask(id) => {
                self.state.start_edit(id);
                Cmd::none()
            }
            Msg::ToggleTask(id) => {
                let client = self.client.clone();
                Cmd::new(async move { Msg::TaskToggled(client.toggle_completion(id).await) })
            }
            Msg::TaskToggled(result) => {
                self.state.apply_toggled(result);
                Cmd::none()
            }
            Msg::DeleteTask(id) => {
                if !confirm("Are you sure you want to delete this task?") {
                    return Cmd::none();
                }
                let client = self.client.clone();
                Cmd::new(async move { Msg::TaskDeleted(id, client.delete(id).await) })
            }
            Msg::TaskDeleted(id, result) => {
                self.state.apply_deleted(id, result);
                Cmd::none()
            }
            Msg::SetFilter(filter) => {
                self.state.set_filter(filter);
                Cmd::none()
            }
            Msg::DismissError => {
                self.state.dismiss_error();
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        self.view_page()
    }
}

// Blocking browser prompt; a missing window counts as "no".
fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
