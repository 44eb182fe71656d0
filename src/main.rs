mod auth;
mod catalog;
mod error;
mod history;
mod http;
mod notify;
mod runner;
mod selection;
mod settings;
mod storage;
mod ui;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use auth::{AuthForm, AuthType};
use catalog::{CATALOG, PAYLOAD_BINDINGS};
use error::SelectionError;
use history::{RunHistory, RunOutcome, RunRecord};
use http::client::SuiteClient;
use iced::widget::{column, container, row, scrollable};
use iced::{Element, Length, Task};
use notify::{Notifications, Notify, Severity};
use runner::{RunCoordinator, RunEvent};
use selection::SelectionTree;
use settings::Settings;
use ui::style;

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = catalog::validate_bindings(CATALOG, PAYLOAD_BINDINGS) {
        log::error!("test catalog and payload keys are out of sync: {err}");
        std::process::exit(1);
    }
    log::info!(
        "loaded {} test groups, {} checks",
        CATALOG.len(),
        PAYLOAD_BINDINGS.len()
    );

    iced::application("SCIM2 Compliance Test Suite", update, view)
        .theme(|_| style::app_theme())
        .window_size((1220.0, 840.0))
        .run_with(|| (App::default(), Task::none()))
}

struct App {
    data_dir: PathBuf,
    settings: Settings,
    sidebar_open: bool,
    tree: SelectionTree,
    select_all: bool,
    coordinator: RunCoordinator,
    auth_dialog_open: bool,
    auth_missing: bool,
    notifications: Notifications,
    history: Option<RunHistory>,
    history_entries: Vec<RunRecord>,
    /// Endpoint the in-flight run was dispatched against.
    run_endpoint: String,
}

impl Default for App {
    fn default() -> Self {
        let data_dir = storage::data_dir();
        let mut notifications = Notifications::new();

        let settings = match storage::load_settings(&data_dir) {
            Ok(settings) => settings,
            Err(err) => {
                notifications.notify(err.to_string(), Severity::Error);
                Settings::default()
            }
        }
        .with_env_overrides();
        log::info!("settings loaded from {}", data_dir.display());

        let history = match storage::history_db_path(&data_dir).and_then(|path| RunHistory::open(&path)) {
            Ok(history) => Some(history),
            Err(err) => {
                notifications.notify(format!("Run history unavailable: {err}"), Severity::Error);
                None
            }
        };
        let history_entries = match history.as_ref().map(RunHistory::entries).transpose() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                notifications.notify(err.to_string(), Severity::Error);
                Vec::new()
            }
        };

        let form = AuthForm::with_defaults(settings.default_endpoint.clone(), settings.default_auth_type);

        Self {
            data_dir,
            settings,
            sidebar_open: false,
            tree: SelectionTree::from_catalog(CATALOG),
            select_all: false,
            coordinator: RunCoordinator::new(form),
            auth_dialog_open: false,
            auth_missing: true,
            notifications,
            history,
            history_entries,
            run_endpoint: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    SidebarTogglePressed,
    GroupToggled(u32),
    SubTestToggled(u32, usize),
    GroupExpandToggled(u32),
    SelectAllToggled,
    AuthDialogOpened,
    AuthDialogClosed,
    AuthTypeSelected(AuthType),
    EndpointChanged(String),
    UserNameChanged(String),
    PasswordChanged(String),
    TokenChanged(String),
    AuthSubmitted,
    RunPressed,
    Run(RunEvent),
    NotificationDismissed(u64),
    HistoryCleared,
}

fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::SidebarTogglePressed => {
            app.sidebar_open = !app.sidebar_open;
            Task::none()
        }
        Message::GroupToggled(id) => {
            app.tree = expect_in_sync(app.tree.toggle_group(id));
            Task::none()
        }
        Message::SubTestToggled(id, index) => {
            app.tree = expect_in_sync(app.tree.toggle_sub_test(id, index));
            Task::none()
        }
        Message::GroupExpandToggled(id) => {
            app.tree = expect_in_sync(app.tree.toggle_expand(id));
            Task::none()
        }
        Message::SelectAllToggled => {
            app.tree = app.tree.select_all();
            app.select_all = !app.select_all;
            Task::none()
        }
        Message::AuthDialogOpened => {
            app.auth_dialog_open = true;
            Task::none()
        }
        Message::AuthDialogClosed => {
            app.auth_dialog_open = false;
            Task::none()
        }
        Message::AuthTypeSelected(auth_type) => {
            app.coordinator.form.auth_type = auth_type;
            Task::none()
        }
        Message::EndpointChanged(value) => {
            app.coordinator.form.endpoint = value;
            Task::none()
        }
        Message::UserNameChanged(value) => {
            app.coordinator.form.user_name = value;
            Task::none()
        }
        Message::PasswordChanged(value) => {
            app.coordinator.form.password = value;
            Task::none()
        }
        Message::TokenChanged(value) => {
            app.coordinator.form.token = value;
            Task::none()
        }
        Message::AuthSubmitted => {
            app.auth_missing = true;
            if app.coordinator.submit_auth(&mut app.notifications).is_ok() {
                app.auth_missing = false;
                app.auth_dialog_open = false;
                remember_auth_defaults(app);
            }
            Task::none()
        }
        Message::RunPressed => start_run(app),
        Message::Run(event) => {
            if event.is_terminal() {
                record_run(app, &event);
            }
            app.coordinator.apply(&event, &mut app.notifications);
            Task::none()
        }
        Message::NotificationDismissed(id) => {
            app.notifications.dismiss(id);
            Task::none()
        }
        Message::HistoryCleared => {
            if let Some(history) = &app.history {
                match history.clear() {
                    Ok(()) => app.history_entries.clear(),
                    Err(err) => app.notifications.notify(err.to_string(), Severity::Error),
                }
            }
            Task::none()
        }
    }
}

/// Ids and indices only ever come from the rendered tree, so a miss means the
/// view and the state disagree.
fn expect_in_sync(result: Result<SelectionTree, SelectionError>) -> SelectionTree {
    match result {
        Ok(tree) => tree,
        Err(err) => panic!("selection tree out of sync with view: {err}"),
    }
}

fn start_run(app: &mut App) -> Task<Message> {
    if !app.coordinator.can_run() {
        return Task::none();
    }

    let Ok(ticket) = app.coordinator.start(&app.tree, &mut app.notifications) else {
        return Task::none();
    };
    app.run_endpoint = app.coordinator.form.endpoint.clone();

    match SuiteClient::new(&app.settings.suite_url, app.settings.request_timeout()) {
        Ok(client) => Task::run(runner::run(client, ticket), Message::Run),
        Err(err) => {
            log::error!("{err}");
            let event = RunEvent::Failed {
                reason: err.user_message().to_string(),
            };
            record_run(app, &event);
            app.coordinator.apply(&event, &mut app.notifications);
            Task::none()
        }
    }
}

fn record_run(app: &mut App, event: &RunEvent) {
    let Some(history) = &app.history else {
        return;
    };

    let (outcome, summary) = match event {
        RunEvent::Completed(report) if report.error_message().is_none() => {
            (RunOutcome::Completed, report.summary_line())
        }
        RunEvent::Completed(report) => (RunOutcome::Failed, report.error_message().map(str::to_string)),
        _ => (RunOutcome::Failed, None),
    };
    let record = RunRecord {
        timestamp: current_unix_timestamp(),
        endpoint: app.run_endpoint.clone(),
        selected_count: app.coordinator.state().progress_count,
        outcome,
        summary,
    };

    match history.push(&record).and_then(|()| history.entries()) {
        Ok(entries) => app.history_entries = entries,
        Err(err) => app.notifications.notify(err.to_string(), Severity::Error),
    }
}

fn remember_auth_defaults(app: &mut App) {
    let form = &app.coordinator.form;
    if app.settings.default_endpoint == form.endpoint && app.settings.default_auth_type == form.auth_type {
        return;
    }

    app.settings.default_endpoint = form.endpoint.clone();
    app.settings.default_auth_type = form.auth_type;
    if let Err(err) = storage::save_settings(&app.data_dir, &app.settings) {
        log::warn!("failed to save settings: {err}");
        app.notifications.notify(err.to_string(), Severity::Error);
    }
}

fn view(app: &App) -> Element<'_, Message> {
    let header = ui::header::view(app.sidebar_open, &app.settings.suite_url);
    let state = app.coordinator.state();

    let drawer = container(
        column![
            ui::run_bar::view(app.auth_missing, state.in_flight),
            ui::test_tree::view(&app.tree, app.select_all),
        ]
        .spacing(12)
        .height(Length::Fill),
    )
    .padding(12)
    .width(350)
    .height(Length::Fill)
    .style(|_| style::surface_style(style::SURFACE_0, 0.0));

    let content: Element<'_, Message> = if app.auth_dialog_open {
        container(ui::auth_dialog::view(&app.coordinator.form, &app.coordinator.field_errors))
            .padding(24)
            .center_x(Length::Fill)
            .height(Length::Fill)
            .into()
    } else {
        ui::results_panel::view(state)
    };

    let main_content = column![
        container(content).height(Length::Fill),
        container(scrollable(ui::toasts::view(&app.notifications))).padding([0, 16]).max_height(220.0),
    ]
    .spacing(8)
    .height(Length::Fill)
    .width(Length::Fill);

    let mut body = row![drawer].height(Length::Fill);
    if app.sidebar_open {
        body = body.push(
            container(ui::sidebar::view(&app.history_entries))
                .width(280)
                .height(Length::Fill),
        );
    }
    body = body.push(container(main_content).width(Length::Fill).height(Length::Fill));

    let layout = column![header, body]
        .spacing(1)
        .height(Length::Fill)
        .width(Length::Fill);

    container(layout)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_| style::flat_surface_style(style::BG))
        .into()
}

fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
