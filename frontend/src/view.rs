use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{Priority, Task};

use crate::app::{App, Msg};
use crate::state::{Filter, TaskForm};

const FIELD_CLASS: &str = "w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent";

impl App {
    pub(crate) fn view_page(&self) -> Node<Msg> {
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text py-8 px-4")],
            [div(
                [class("max-w-4xl mx-auto")],
                [
                    self.view_header(),
                    self.view_error(),
                    self.view_stats(),
                    self.view_form(),
                    self.view_filters(),
                    self.view_task_list(),
                ],
            )],
        )
    }

    fn view_header(&self) -> Node<Msg> {
        header([class("text-center mb-8")], [
            h1([class("text-4xl font-bold text-ctp-text mb-2")], [text("Task Manager")]),
            p([class("text-ctp-subtext0")], [text("Manage your tasks efficiently")]),
        ])
    }

    fn view_error(&self) -> Node<Msg> {
        match self.state.error() {
            Some(message) => div(
                [class("bg-ctp-red/20 border border-ctp-red text-ctp-red px-4 py-3 rounded mb-4 flex justify-between")],
                [
                    span([], [text(message)]),
                    button([on_click(|_| Msg::DismissError), class("font-bold")], [text("×")]),
                ],
            ),
            None => span([], []),
        }
    }

    fn view_stats(&self) -> Node<Msg> {
        let stats = self.state.stats();
        div([class("grid grid-cols-3 gap-4 mb-6")], [
            stat_card("Total Tasks", stats.total, "text-ctp-text"),
            stat_card("Active", stats.active, "text-ctp-blue"),
            stat_card("Completed", stats.completed, "text-ctp-green"),
        ])
    }

    fn view_form(&self) -> Node<Msg> {
        let (heading, form) = match self.state.editing() {
            Some(target) => ("Edit Task", &target.form),
            None => ("Add New Task", self.state.new_task()),
        };
        let is_edit = self.state.editing().is_some();

        div(
            [class("mb-6 p-6 bg-ctp-surface1 rounded-lg border border-ctp-surface2")],
            [
                h2([class("text-xl font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [text(heading)]),
                div([class("space-y-4")], [
                    input([
                        r#type("text"),
                        placeholder("Task title"),
                        value(&form.title),
                        on_input(|event| Msg::SetTitle(event.value())),
                        class(FIELD_CLASS),
                    ], []),
                    textarea([
                        placeholder("Task description (optional)"),
                        value(&form.description),
                        on_input(|event| Msg::SetDescription(event.value())),
                        class(&format!("{} h-20 resize-y", FIELD_CLASS)),
                    ], []),
                    view_priority_select(form),
                    div([class("flex gap-2")], [
                        button([
                            on_click(|_| Msg::SubmitForm),
                            class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                        ], [text(if is_edit { "Update Task" } else { "Add Task" })]),
                        if is_edit {
                            button([
                                on_click(|_| Msg::CancelEdit),
                                class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                            ], [text("Cancel")])
                        } else {
                            span([], [])
                        },
                    ]),
                ]),
            ],
        )
    }

    fn view_filters(&self) -> Node<Msg> {
        let stats = self.state.stats();
        div(
            [class("flex gap-2 mb-4")],
            Filter::ALL
                .iter()
                .map(|&filter| {
                    let is_active = self.state.filter() == filter;
                    button([
                        on_click(move |_| Msg::SetFilter(filter)),
                        class(&format!(
                            "px-4 py-2 rounded-md transition-colors duration-200 {}",
                            if is_active {
                                "bg-ctp-blue text-ctp-base"
                            } else {
                                "bg-ctp-surface0 text-ctp-subtext1 hover:bg-ctp-surface1"
                            }
                        )),
                    ], [text(&format!("{} ({})", filter.label(), stats.count_for(filter)))])
                })
                .collect::<Vec<_>>(),
        )
    }

    fn view_task_list(&self) -> Node<Msg> {
        if self.state.is_loading() {
            return div([class("text-center py-8 text-ctp-subtext0 italic")], [text("Loading tasks...")]);
        }

        let tasks = self.state.visible_tasks();
        if tasks.is_empty() {
            return div([class("text-center py-8 bg-ctp-surface0 rounded-lg shadow")], [
                p([class("text-ctp-subtext0")], [text("No tasks found. Create one to get started!")]),
            ]);
        }

        div(
            [class("space-y-3")],
            tasks.into_iter().map(view_task).collect::<Vec<_>>(),
        )
    }
}

fn stat_card(card_title: &str, value: usize, value_class: &str) -> Node<Msg> {
    div([class("bg-ctp-surface0 p-4 rounded-lg shadow text-center")], [
        div([class(&format!("text-2xl font-bold {}", value_class))], [text(value)]),
        div([class("text-sm text-ctp-subtext0")], [text(card_title)]),
    ])
}

fn view_priority_select(form: &TaskForm) -> Node<Msg> {
    select(
        [
            on_change(|event| Msg::SetPriority(event.value().parse().unwrap_or_default())),
            class(FIELD_CLASS),
        ],
        Priority::ALL
            .iter()
            .map(|priority| {
                option(
                    [value(priority.as_str()), selected(*priority == form.priority)],
                    [text(priority.label())],
                )
            })
            .collect::<Vec<_>>(),
    )
}

fn view_task(task: &Task) -> Node<Msg> {
    let task_id = task.id;
    div(
        [key(task.id.to_string()), class("bg-ctp-surface0 p-4 rounded-lg shadow-md border-l-4 border-ctp-blue hover:shadow-lg transition-shadow")],
        [div([class("flex items-start justify-between gap-4")], [
            div([class("flex items-start gap-3 flex-1")], [
                input([
                    r#type("checkbox"),
                    checked(task.completed),
                    // The box only changes once the confirmed task comes back.
                    on_click(move |event| {
                        event.prevent_default();
                        Msg::ToggleTask(task_id)
                    }),
                    class("mt-1 w-5 h-5 cursor-pointer"),
                ], []),
                div([class("flex-1")], [
                    h3([class(&format!(
                        "text-lg font-semibold {}",
                        if task.completed { "line-through text-ctp-overlay1" } else { "text-ctp-text" }
                    ))], [text(&task.title)]),
                    match &task.description {
                        Some(description) => p([class(&format!(
                            "mt-1 text-sm {}",
                            if task.completed { "text-ctp-overlay0" } else { "text-ctp-subtext1" }
                        ))], [text(description)]),
                        None => span([], []),
                    },
                    div([class("flex items-center gap-3 mt-2")], [
                        span([class(&format!(
                            "px-2 py-1 rounded-full text-xs font-medium {}",
                            priority_badge_class(task.priority)
                        ))], [text(task.priority.label())]),
                        span([class("text-xs text-ctp-subtext0")], [text(format_created_at(&task.created_at))]),
                    ]),
                ]),
            ]),
            div([class("flex gap-2")], [
                button([
                    on_click(move |_| Msg::EditTask(task_id)),
                    class("px-3 py-1 text-sm bg-ctp-blue text-ctp-base rounded hover:bg-ctp-sapphire transition-colors"),
                ], [text("Edit")]),
                button([
                    on_click(move |_| Msg::DeleteTask(task_id)),
                    class("px-3 py-1 text-sm bg-ctp-red text-ctp-base rounded hover:bg-ctp-maroon transition-colors"),
                ], [text("Delete")]),
            ]),
        ])],
    )
}

pub fn priority_badge_class(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "bg-ctp-green/20 text-ctp-green",
        Priority::Medium => "bg-ctp-yellow/20 text-ctp-yellow",
        Priority::High => "bg-ctp-red/20 text-ctp-red",
    }
}

/// Formats a creation timestamp as `Mar 5, 2024, 02:07 PM` in the browser's time zone.
pub fn format_created_at(raw: &str) -> String {
    format_created_at_in(raw, &Local)
}

/// RFC 3339 timestamps are converted to `zone`; offset-less ISO-8601 is shown as written.
/// Anything else is returned unchanged.
pub fn format_created_at_in<Tz>(raw: &str, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    const DISPLAY: &str = "%b %-d, %Y, %I:%M %p";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(zone).format(DISPLAY).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format(DISPLAY).to_string(),
        Err(_) => raw.to_string(),
    }
}
