mod state;
mod tasks;

use std::{
    future::Future,
    time::{Duration, Instant},
};

use api_types::user::{Role, SubscriptionType, UserUpdate};
use chrono_tz::Tz;
use client::{Client, ClientError, Session, TokenStore, transactions::wire_id};
use crossterm::event::{self, Event, KeyEvent};
use engine::{DayKey, TOP_CONTRIBUTORS, TransactionStatus, rank};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use state::{
    AppState, LoginField, PendingAction, Screen, Section, StatusPrompt, TREND_DAYS, ToastLevel,
    ToastState,
};
use tasks::Update;

const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

pub struct App {
    client: Client,
    tz: Tz,
    pub state: AppState,
    tx: UnboundedSender<Update>,
    rx: UnboundedReceiver<Update>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let tz = config.tz()?;
        let store = TokenStore::new(&config.token_path);
        let session = Session::restore(store.clone()).unwrap_or_else(|err| {
            tracing::warn!(path = %store.path().display(), "ignoring unreadable session file: {err}");
            Session::new()
        });
        let client = Client::new(&config.base_url, session)?;
        let state = AppState::new(
            config.base_url.clone(),
            config.email.clone(),
            DayKey::today(tz),
            config.page_size,
        );
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            client,
            tz,
            state,
            tx,
            rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.prime();
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            while let Ok(update) = self.rx.try_recv() {
                self.apply(update);
            }
            self.state.expire_toast(Instant::now());
        }

        Ok(())
    }

    /// Resolves the persisted token, if any, into the current user.
    fn prime(&mut self) {
        if !self.client.session().is_authenticated() {
            return;
        }
        self.state.login.busy = true;
        self.state.login.message = Some("Restoring session...".to_string());
        let client = self.client.clone();
        tasks::spawn(&self.tx, async move { client.prime().await }, Update::Primed);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(action),
            Screen::Main => self.handle_main_key(action),
        }
    }

    fn handle_login_key(&mut self, action: AppAction) {
        if self.state.login.busy {
            return;
        }
        let login = &mut self.state.login;
        match action {
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                login.toggle_focus();
            }
            AppAction::Backspace => {
                login.active_field_mut().pop();
            }
            AppAction::Input(ch) => login.active_field_mut().push(ch),
            AppAction::Cancel => login.message = None,
            AppAction::Submit => self.attempt_login(),
            _ => {}
        }
    }

    fn attempt_login(&mut self) {
        let Some((email, password)) = self.state.login.credentials() else {
            self.state.login.message = Some("Email and password are required.".to_string());
            return;
        };
        self.state.login.busy = true;
        self.state.login.message = None;
        let client = self.client.clone();
        tasks::spawn(
            &self.tx,
            async move { client.login(&email, &password).await },
            Update::Login,
        );
    }

    fn handle_main_key(&mut self, action: AppAction) {
        if let Some(pending) = self.state.confirm.take() {
            if action == AppAction::Input('y') || action == AppAction::Input('Y') {
                self.confirm(pending);
            }
            return;
        }

        if self.state.transactions.prompt.is_some() {
            self.handle_prompt_key(action);
            return;
        }

        match action {
            AppAction::NextField => self.select_section(self.state.section.next()),
            AppAction::PrevField => self.select_section(self.state.section.prev()),
            AppAction::Cancel => self.state.toast = None,
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Input('L') => self.logout(),
            AppAction::Input('r') => self.load_section(self.state.section),
            AppAction::Input(ch) if ch.is_ascii_digit() => {
                if let Some(section) = Section::from_digit(ch) {
                    self.select_section(section);
                }
            }
            _ => match self.state.section {
                Section::Dashboard => self.handle_dashboard_key(action),
                Section::Users => self.handle_users_key(action),
                Section::Transactions => self.handle_transactions_key(action),
                Section::Challenges => self.handle_challenges_key(action),
                Section::Profile => {}
            },
        }
    }

    fn select_section(&mut self, section: Section) {
        self.state.section = section;
        let loaded = match section {
            Section::Dashboard => {
                self.state.dashboard.activities.data.is_some()
                    || self.state.dashboard.activities.loading
            }
            Section::Users => self.state.users.page.data.is_some() || self.state.users.page.loading,
            Section::Transactions => {
                self.state.transactions.list.data.is_some()
                    || self.state.transactions.list.loading
            }
            Section::Challenges => {
                self.state.challenges.list.data.is_some() || self.state.challenges.list.loading
            }
            Section::Profile => self.state.profile.data.is_some(),
        };
        if !loaded {
            self.load_section(section);
        }
    }

    fn handle_dashboard_key(&mut self, action: AppAction) {
        let dashboard = &mut self.state.dashboard;
        match action {
            AppAction::Left | AppAction::Input('h') => dashboard.day = dashboard.day.pred(),
            AppAction::Right | AppAction::Input('l') => dashboard.day = dashboard.day.succ(),
            AppAction::Input('t') => dashboard.day = DayKey::today(self.tz),
            _ => {}
        }
    }

    fn handle_users_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up | AppAction::Input('k') => self.state.users.select_prev(),
            AppAction::Down | AppAction::Input('j') => self.state.users.select_next(),
            AppAction::Input('n') | AppAction::Right => {
                if self.state.users.next_page() {
                    self.load_users();
                }
            }
            AppAction::Input('p') | AppAction::Left => {
                if self.state.users.prev_page() {
                    self.load_users();
                }
            }
            AppAction::Input('o') => self.cycle_role(),
            AppAction::Input('s') => self.cycle_subscription(),
            AppAction::Input('d') => {
                if let Some(user) = self.state.users.selected_user() {
                    self.state.confirm = Some(PendingAction::DeleteUser {
                        id: user.id.clone(),
                        name: user.user_name.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_transactions_key(&mut self, action: AppAction) {
        let target = match action {
            AppAction::Up | AppAction::Input('k') => {
                self.state.transactions.select_prev();
                return;
            }
            AppAction::Down | AppAction::Input('j') => {
                self.state.transactions.select_next();
                return;
            }
            AppAction::Input('n') | AppAction::Right => {
                if self.state.transactions.next_page() {
                    self.load_transactions();
                }
                return;
            }
            AppAction::Input('p') | AppAction::Left => {
                if self.state.transactions.prev_page() {
                    self.load_transactions();
                }
                return;
            }
            AppAction::Input('c') => TransactionStatus::Completed,
            AppAction::Input('f') => TransactionStatus::Failed,
            AppAction::Input('x') => TransactionStatus::Cancelled,
            _ => return,
        };

        if let Err(message) = self.state.transactions.open_prompt(target) {
            self.state.show_toast(message, ToastLevel::Error);
        }
    }

    fn handle_prompt_key(&mut self, action: AppAction) {
        let Some(prompt) = self.state.transactions.prompt.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => self.state.transactions.prompt = None,
            AppAction::Backspace => {
                prompt.reason.pop();
            }
            AppAction::Input(ch) => prompt.reason.push(ch),
            AppAction::Submit => {
                if let Some(prompt) = self.state.transactions.prompt.take() {
                    self.set_transaction_status(prompt);
                }
            }
            _ => {}
        }
    }

    fn handle_challenges_key(&mut self, action: AppAction) {
        match action {
            AppAction::Up | AppAction::Input('k') => self.state.challenges.select_prev(),
            AppAction::Down | AppAction::Input('j') => self.state.challenges.select_next(),
            AppAction::Submit | AppAction::Input(' ') => self.toggle_challenge(),
            AppAction::Input('d') => {
                if let Some(challenge) = self.state.challenges.selected_challenge() {
                    self.state.confirm = Some(PendingAction::DeleteChallenge {
                        id: challenge.id.clone(),
                        name: challenge.name.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    fn logout(&mut self) {
        if let Err(err) = self.client.logout() {
            tracing::warn!("failed to clear stored token: {err}");
        }
        self.state.leave(None);
        self.state.show_toast("Logged out.", ToastLevel::Info);
    }

    /// 401 from any request: the token is gone, back to the login screen.
    fn expire_session(&mut self) {
        tracing::warn!("session rejected by the server");
        if let Err(err) = self.client.session().clear() {
            tracing::warn!("failed to clear stored token: {err}");
        }
        self.state.leave(Some(SESSION_EXPIRED.to_string()));
    }

    /// Turns a client error into an inline message, logging out on 401.
    fn settle<T>(&mut self, result: std::result::Result<T, ClientError>) -> std::result::Result<T, String> {
        result.map_err(|err| {
            if err.is_auth_failure() {
                self.expire_session();
            }
            message_for_error(&err)
        })
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Login(result) => {
                self.state.login.busy = false;
                match result {
                    Ok(auth) => {
                        self.state.enter(auth.user);
                        self.load_dashboard();
                    }
                    Err(err) => self.state.login.message = Some(login_message_for_error(&err)),
                }
            }
            Update::Primed(user) => {
                self.state.login.busy = false;
                match user {
                    Some(user) => {
                        self.state.enter(user);
                        self.load_dashboard();
                    }
                    None => self.state.login.message = None,
                }
            }
            Update::Profile(ticket, result) => {
                if !self.current(self.state.profile.is_current(ticket), "profile") {
                    return;
                }
                let result = self.settle(result);
                if let Ok(user) = &result {
                    self.state.user = Some(user.clone());
                }
                self.state.profile.finish(ticket, result);
            }
            Update::Leaderboard(ticket, result) => {
                if !self.current(self.state.dashboard.leaderboard.is_current(ticket), "leaderboard") {
                    return;
                }
                let result = self.settle(result);
                self.state.dashboard.leaderboard.finish(ticket, result);
            }
            Update::Activities(ticket, result) => {
                if !self.current(self.state.dashboard.activities.is_current(ticket), "activities") {
                    return;
                }
                let result = self.settle(result);
                self.state.dashboard.activities.finish(ticket, result);
            }
            Update::Users(ticket, result) => {
                if !self.current(self.state.users.page.is_current(ticket), "users") {
                    return;
                }
                let result = self.settle(result);
                self.state.users.page.finish(ticket, result);
                self.state.users.clamp_selection();
            }
            Update::Transactions(ticket, result) => {
                if !self.current(self.state.transactions.list.is_current(ticket), "transactions") {
                    return;
                }
                let result = self.settle(result);
                self.state.transactions.list.finish(ticket, result);
                self.state.transactions.clamp_selection();
            }
            Update::Challenges(ticket, result) => {
                if !self.current(self.state.challenges.list.is_current(ticket), "challenges") {
                    return;
                }
                let result = self.settle(result);
                self.state.challenges.list.finish(ticket, result);
                self.state.challenges.clamp_selection();
            }
            Update::Action { section, result } => {
                if self.state.screen != Screen::Main {
                    return;
                }
                match self.settle(result) {
                    Ok(message) => {
                        self.state.show_toast(message, ToastLevel::Success);
                        self.load_section(section);
                    }
                    Err(message) => {
                        if self.state.screen == Screen::Main {
                            self.state.show_toast(message, ToastLevel::Error);
                            self.load_section(section);
                        }
                    }
                }
            }
        }
    }

    fn current(&self, is_current: bool, resource: &str) -> bool {
        if !is_current {
            tracing::debug!(resource, "discarding stale response");
        }
        is_current
    }

    fn load_section(&mut self, section: Section) {
        match section {
            Section::Dashboard => self.load_dashboard(),
            Section::Users => self.load_users(),
            Section::Transactions => self.load_transactions(),
            Section::Challenges => self.load_challenges(),
            Section::Profile => self.load_profile(),
        }
    }

    fn load_dashboard(&mut self) {
        let client = self.client.clone();
        let ticket = self.state.dashboard.leaderboard.begin();
        tasks::spawn(
            &self.tx,
            async move {
                let rows = client.leaderboard().await?;
                Ok::<_, ClientError>(rank(
                    rows.into_iter()
                        .map(|row| (row.user_name, row.total_co2_emission)),
                    TOP_CONTRIBUTORS,
                ))
            },
            move |result| Update::Leaderboard(ticket, result),
        );

        let client = self.client.clone();
        let ticket = self.state.dashboard.activities.begin();
        tasks::spawn(
            &self.tx,
            async move { client.activity_records().await },
            move |result| Update::Activities(ticket, result),
        );
    }

    fn load_users(&mut self) {
        let users = &mut self.state.users;
        let ticket = users.page.begin();
        let (page, size) = (users.page_no, users.page_size);
        let client = self.client.clone();
        tasks::spawn(
            &self.tx,
            async move { client.users_page(page, size).await },
            move |result| Update::Users(ticket, result),
        );
    }

    fn load_transactions(&mut self) {
        let transactions = &mut self.state.transactions;
        let ticket = transactions.list.begin();
        let (page, size) = (transactions.page_no, transactions.page_size);
        let client = self.client.clone();
        tasks::spawn(
            &self.tx,
            async move { client.transactions_list(page, size).await },
            move |result| Update::Transactions(ticket, result),
        );
    }

    fn load_challenges(&mut self) {
        let ticket = self.state.challenges.list.begin();
        let client = self.client.clone();
        tasks::spawn(
            &self.tx,
            async move { client.challenges_list().await },
            move |result| Update::Challenges(ticket, result),
        );
    }

    fn load_profile(&mut self) {
        let ticket = self.state.profile.begin();
        let client = self.client.clone();
        tasks::spawn(
            &self.tx,
            async move { client.me().await },
            move |result| Update::Profile(ticket, result),
        );
    }

    fn run_action<F>(&self, section: Section, fut: F)
    where
        F: Future<Output = client::Result<String>> + Send + 'static,
    {
        tasks::spawn(&self.tx, fut, move |result| Update::Action { section, result });
    }

    fn cycle_role(&mut self) {
        let Some(user) = self.state.users.selected_user() else {
            return;
        };
        let role = next_role(user.role);
        let (id, name) = (user.id.clone(), user.user_name.clone());
        let client = self.client.clone();
        self.run_action(Section::Users, async move {
            client.user_set_role(&id, role).await?;
            Ok::<_, ClientError>(format!("{name} is now {}.", role.label()))
        });
    }

    fn cycle_subscription(&mut self) {
        let Some(user) = self.state.users.selected_user() else {
            return;
        };
        let subscription = next_subscription(user.subscription_type);
        let (id, name) = (user.id.clone(), user.user_name.clone());
        let client = self.client.clone();
        self.run_action(Section::Users, async move {
            let update = UserUpdate {
                subscription_type: Some(subscription),
                ..Default::default()
            };
            client.user_update(&id, &update).await?;
            Ok::<_, ClientError>(format!("{name} moved to {}.", subscription.label()))
        });
    }

    fn set_transaction_status(&mut self, prompt: StatusPrompt) {
        let StatusPrompt {
            transaction_id,
            target,
            reason,
        } = prompt;
        let reason = Some(reason.trim().to_string()).filter(|r| !r.is_empty());
        let id = wire_id(&transaction_id);
        let client = self.client.clone();
        self.run_action(Section::Transactions, async move {
            let updated = client.transaction_set_status(&id, target, reason).await?;
            Ok::<_, ClientError>(format!("Transaction {} marked {}.", updated.id, updated.status))
        });
    }

    fn toggle_challenge(&mut self) {
        let Some(challenge) = self.state.challenges.selected_challenge().cloned() else {
            return;
        };
        let done = !challenge.is_complete;
        let client = self.client.clone();
        self.run_action(Section::Challenges, async move {
            client.challenge_set_complete(&challenge, done).await?;
            let status = if done { "done" } else { "not done" };
            Ok::<_, ClientError>(format!("\"{}\" marked {status}.", challenge.name))
        });
    }

    fn confirm(&mut self, pending: PendingAction) {
        let client = self.client.clone();
        match pending {
            PendingAction::DeleteUser { id, name } => {
                self.run_action(Section::Users, async move {
                    client.user_delete(&id).await?;
                    Ok::<_, ClientError>(format!("Deleted user {name}."))
                });
            }
            PendingAction::DeleteChallenge { id, name } => {
                self.run_action(Section::Challenges, async move {
                    client.challenge_delete(&id).await?;
                    Ok::<_, ClientError>(format!("Deleted \"{name}\"."))
                });
            }
        }
    }
}

fn next_role(role: Role) -> Role {
    let index = Role::ALL.iter().position(|r| *r == role).unwrap_or(0);
    Role::ALL[(index + 1) % Role::ALL.len()]
}

fn next_subscription(subscription: SubscriptionType) -> SubscriptionType {
    let all = SubscriptionType::ALL;
    let index = all.iter().position(|s| *s == subscription).unwrap_or(0);
    all[(index + 1) % all.len()]
}

fn message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized => SESSION_EXPIRED.to_string(),
        ClientError::Forbidden => "You are not allowed to do that.".to_string(),
        ClientError::NotFound => "Not found.".to_string(),
        ClientError::Conflict(message) => format!("Conflict: {message}"),
        ClientError::Validation(message) => format!("Validation error: {message}"),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
        ClientError::Engine(err) => err.to_string(),
        other => other.to_string(),
    }
}

fn login_message_for_error(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            "Wrong email or password.".to_string()
        }
        ClientError::Validation(message) => format!("Validation error: {message}"),
        other => message_for_error(other),
    }
}
