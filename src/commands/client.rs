//! Interactive terminal client.
//!
//! Drives the same optimistic data layer a browser view would: every
//! mutation goes through [`TodoApp`], which snapshots the cache, applies
//! the change locally and rolls back when the server rejects it. Queued
//! notices are drained after each action.

use crate::client::{HttpTodoApi, NoticeKind, TodoApi, TodoApp};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::todo::{Todo, TodoStats};
use crate::{msg_error, msg_print, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use prettytable::{row, Table};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ClientArgs {
    /// Base URL of a running tudu server (defaults to the configured
    /// public URL)
    #[arg(short, long)]
    url: Option<String>,
}

const ACTIONS: &[&str] = &["Add", "Toggle", "Edit", "Delete", "View", "Refresh", "Quit"];

pub async fn cmd(args: ClientArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::read()?;
    let url = args.url.unwrap_or(config.server_or_default().public_url);
    let api = Arc::new(HttpTodoApi::new(&url));
    let detail_api = Arc::clone(&api);

    // Seed the view from the server, degrading to an empty list like the
    // server-rendered page does.
    let initial = api.list().await.unwrap_or_default();
    let mut app = TodoApp::new(api, initial);
    msg_print!(Message::ClientConnected(url));

    loop {
        app.spawn_revalidate();
        print_todos(&app.todos(), &app.stats());

        let action = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptAction.to_string())
            .items(ACTIONS)
            .default(0)
            .interact()?;

        match ACTIONS[action] {
            "Add" => {
                let text: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptNewTodoText.to_string())
                    .allow_empty(true)
                    .interact_text()?;
                app.set_input(&text);
                app.add().await;
            }
            "Toggle" => {
                if let Some(id) = select_todo(&app)? {
                    app.toggle(id).await;
                }
            }
            "Edit" => {
                if let Some(id) = select_todo(&app)? {
                    app.start_edit(id);
                    let text: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptEditTodoText.to_string())
                        .default(app.editing_text.clone())
                        .interact_text()?;
                    app.editing_text = text;
                    app.save_edit().await;
                }
            }
            "Delete" => {
                if let Some(id) = select_todo(&app)? {
                    app.delete(id).await;
                }
            }
            "View" => {
                if let Some(id) = select_todo(&app)? {
                    match detail_api.get(id).await {
                        Ok(todo) => print_detail(&todo),
                        Err(_) => msg_print!(Message::TodoNotFoundWithId(id)),
                    }
                }
            }
            "Refresh" => app.refresh().await,
            _ => {
                msg_print!(Message::ClientGoodbye);
                break;
            }
        }

        drain_notices(&mut app);
    }

    Ok(())
}

fn select_todo(app: &TodoApp) -> Result<Option<i64>> {
    let todos = app.todos();
    if todos.is_empty() {
        msg_print!(Message::NoTodosYet);
        return Ok(None);
    }
    let items: Vec<String> = todos
        .iter()
        .map(|t| format!("#{} {}", t.id, t.text))
        .collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptSelectTodo.to_string())
        .items(&items)
        .default(0)
        .interact()?;
    Ok(Some(todos[index].id))
}

fn print_todos(todos: &[Todo], stats: &TodoStats) {
    msg_print!(Message::TodosHeader);
    if todos.is_empty() {
        msg_print!(Message::NoTodosYet);
        return;
    }
    let mut table = Table::new();
    table.add_row(row!["ID", "DONE", "TEXT"]);
    for todo in todos {
        let mark = if todo.completed { "✔" } else { "" };
        table.add_row(row![todo.id, mark, todo.text]);
    }
    table.printstd();
    println!(
        "{} total / {} completed / {} remaining",
        stats.total, stats.completed, stats.remaining
    );
}

fn print_detail(todo: &Todo) {
    let status = if todo.completed { "Completed" } else { "Pending" };
    let mut table = Table::new();
    table.add_row(row!["ID", todo.id]);
    table.add_row(row!["Text", todo.text]);
    table.add_row(row!["Status", status]);
    table.printstd();
}

fn drain_notices(app: &mut TodoApp) {
    for notice in app.take_notices() {
        match notice.kind {
            NoticeKind::Success => msg_success!(notice.message),
            NoticeKind::Error => msg_error!(notice.message),
        }
    }
}
