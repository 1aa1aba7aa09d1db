use std::time::{Duration, Instant};

use api_types::{Id, Page, challenge::Challenge, user::User};
use engine::{
    ActivityBreakdown, ActivityRecord, DayKey, Generation, Ranked, Ticket, Transaction,
    TransactionId, TransactionStatus, aggregate, daily_totals,
};

const TOAST_TTL: Duration = Duration::from_secs(4);
/// Days shown in the dashboard trend line, selected day included.
pub const TREND_DAYS: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Users,
    Transactions,
    Challenges,
    Profile,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Users,
        Section::Transactions,
        Section::Challenges,
        Section::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
            Self::Transactions => "Transactions",
            Self::Challenges => "Challenges",
            Self::Profile => "Profile",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// `'1'..='5'` select a section directly.
    pub fn from_digit(ch: char) -> Option<Self> {
        let index = ch.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }
}

/// Data fetched in the background.
///
/// Each load takes a ticket from the resource's [`Generation`]; a response is
/// applied only while its ticket is current, so the last request wins.
#[derive(Debug)]
pub struct Resource<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    generation: Generation,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: Generation::default(),
        }
    }
}

impl<T> Resource<T> {
    pub fn begin(&mut self) -> Ticket {
        self.loading = true;
        self.generation.next()
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.is_current(ticket)
    }

    /// Applies a response. Returns `false` (and changes nothing) when the
    /// ticket was superseded.
    pub fn finish(&mut self, ticket: Ticket, result: Result<T, String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Forgets the data and drops every response still in flight.
    pub fn reset(&mut self) {
        self.data = None;
        self.loading = false;
        self.error = None;
        self.generation.invalidate();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
    pub busy: bool,
}

impl LoginState {
    pub fn new(email: String) -> Self {
        let focus = if email.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
        Self {
            email,
            password: String::new(),
            focus,
            message: None,
            busy: false,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    /// Trimmed credentials, or `None` when a field is empty.
    pub fn credentials(&self) -> Option<(String, String)> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return None;
        }
        Some((email.to_string(), self.password.clone()))
    }
}

#[derive(Debug)]
pub struct DashboardState {
    pub day: DayKey,
    pub activities: Resource<Vec<ActivityRecord>>,
    pub leaderboard: Resource<Vec<Ranked>>,
}

impl DashboardState {
    pub fn new(day: DayKey) -> Self {
        Self {
            day,
            activities: Resource::default(),
            leaderboard: Resource::default(),
        }
    }

    /// Breakdown for the selected day; recomputed from the loaded records.
    pub fn breakdown(&self) -> Option<ActivityBreakdown> {
        self.activities
            .data
            .as_ref()
            .map(|records| aggregate(records, self.day))
    }

    /// Daily totals for the `days` days ending at the selected one, oldest
    /// first. Days without records are 0.
    pub fn trend(&self, days: usize) -> Vec<(DayKey, f64)> {
        let totals = self
            .activities
            .data
            .as_deref()
            .map(daily_totals)
            .unwrap_or_default();

        let mut day = self.day;
        let mut out = Vec::with_capacity(days);
        for _ in 0..days {
            let total = totals
                .iter()
                .find(|(d, _)| *d == day)
                .map(|(_, t)| *t)
                .unwrap_or(0.0);
            out.push((day, total));
            day = day.pred();
        }
        out.reverse();
        out
    }
}

#[derive(Debug)]
pub struct UsersState {
    pub page: Resource<Page<User>>,
    pub page_no: u32,
    pub page_size: u32,
    pub selected: usize,
}

impl UsersState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: Resource::default(),
            page_no: 1,
            page_size,
            selected: 0,
        }
    }

    pub fn items(&self) -> &[User] {
        self.page.data.as_ref().map_or(&[], |page| page.data.as_slice())
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.items().get(self.selected)
    }

    pub fn select_next(&mut self) {
        self.selected = step(self.selected, self.items().len(), 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = step(self.selected, self.items().len(), -1);
    }

    /// Moves to the next page when the server reports one.
    ///
    /// Ignored while a page is loading: the metadata on screen belongs to the
    /// previous page and would let the counter run past the last one.
    pub fn next_page(&mut self) -> bool {
        if self.page.loading {
            return false;
        }
        let has_next = self.page.data.as_ref().is_some_and(|page| {
            page.has_next_page || self.page_no < page.total_pages
        });
        if has_next {
            self.page_no += 1;
            self.selected = 0;
        }
        has_next
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page_no <= 1 {
            return false;
        }
        self.page_no -= 1;
        self.selected = 0;
        true
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items().len().saturating_sub(1));
    }
}

/// Reason prompt shown before a status change is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPrompt {
    pub transaction_id: TransactionId,
    pub target: TransactionStatus,
    pub reason: String,
}

#[derive(Debug)]
pub struct TransactionsState {
    pub list: Resource<Vec<Transaction>>,
    pub page_no: u32,
    pub page_size: u32,
    pub selected: usize,
    pub prompt: Option<StatusPrompt>,
}

impl TransactionsState {
    pub fn new(page_size: u32) -> Self {
        Self {
            list: Resource::default(),
            page_no: 1,
            page_size,
            selected: 0,
            prompt: None,
        }
    }

    pub fn items(&self) -> &[Transaction] {
        self.list.data.as_deref().unwrap_or(&[])
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.items().get(self.selected)
    }

    pub fn select_next(&mut self) {
        self.selected = step(self.selected, self.items().len(), 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = step(self.selected, self.items().len(), -1);
    }

    /// The listing carries no page metadata: a full page means there may be
    /// another one. Ignored while a page is loading.
    pub fn next_page(&mut self) -> bool {
        if self.list.loading {
            return false;
        }
        let full = self.items().len() as u32 >= self.page_size;
        if full {
            self.page_no += 1;
            self.selected = 0;
        }
        full
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page_no <= 1 {
            return false;
        }
        self.page_no -= 1;
        self.selected = 0;
        true
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items().len().saturating_sub(1));
    }

    /// Opens the reason prompt for the selected transaction.
    ///
    /// Fails with a user-facing message when the local copy is already final;
    /// the server copy is checked again before anything is written.
    pub fn open_prompt(&mut self, target: TransactionStatus) -> Result<(), String> {
        let Some(tx) = self.selected_transaction() else {
            return Err("No transaction selected.".to_string());
        };
        if !engine::can_transition(tx.status, target) {
            return Err(format!("Transaction {} is already {}.", tx.id, tx.status));
        }
        self.prompt = Some(StatusPrompt {
            transaction_id: tx.id.clone(),
            target,
            reason: String::new(),
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ChallengesState {
    pub list: Resource<Vec<Challenge>>,
    pub selected: usize,
}

impl ChallengesState {
    pub fn items(&self) -> &[Challenge] {
        self.list.data.as_deref().unwrap_or(&[])
    }

    pub fn selected_challenge(&self) -> Option<&Challenge> {
        self.items().get(self.selected)
    }

    pub fn select_next(&mut self) {
        self.selected = step(self.selected, self.items().len(), 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = step(self.selected, self.items().len(), -1);
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items().len().saturating_sub(1));
    }
}

/// Destructive action waiting for a `y`.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    DeleteUser { id: Id, name: String },
    DeleteChallenge { id: Id, name: String },
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            Self::DeleteUser { name, .. } => format!("Delete user \"{name}\"? (y/n)"),
            Self::DeleteChallenge { name, .. } => format!("Delete \"{name}\"? (y/n)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

impl ToastState {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_TTL
    }
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub login: LoginState,
    pub base_url: String,
    pub user: Option<User>,
    pub dashboard: DashboardState,
    pub users: UsersState,
    pub transactions: TransactionsState,
    pub challenges: ChallengesState,
    pub profile: Resource<User>,
    pub confirm: Option<PendingAction>,
    pub toast: Option<ToastState>,
}

impl AppState {
    pub fn new(base_url: String, email: String, today: DayKey, page_size: u32) -> Self {
        Self {
            screen: Screen::Login,
            section: Section::Dashboard,
            login: LoginState::new(email),
            base_url,
            user: None,
            dashboard: DashboardState::new(today),
            users: UsersState::new(page_size),
            transactions: TransactionsState::new(page_size),
            challenges: ChallengesState::default(),
            profile: Resource::default(),
            confirm: None,
            toast: None,
        }
    }

    /// Switches to the main screen for `user`.
    pub fn enter(&mut self, user: User) {
        self.profile.reset();
        self.profile.data = Some(user.clone());
        self.user = Some(user);
        self.screen = Screen::Main;
        self.section = Section::Dashboard;
        self.login.password.clear();
        self.login.message = None;
        self.login.busy = false;
    }

    /// Back to the login screen; every loaded resource is dropped and
    /// responses still in flight are ignored.
    pub fn leave(&mut self, message: Option<String>) {
        self.screen = Screen::Login;
        self.user = None;
        self.login.password.clear();
        self.login.focus = LoginField::Password;
        self.login.message = message;
        self.login.busy = false;
        self.confirm = None;
        self.transactions.prompt = None;

        self.dashboard.activities.reset();
        self.dashboard.leaderboard.reset();
        self.users.page.reset();
        self.users.page_no = 1;
        self.users.selected = 0;
        self.transactions.list.reset();
        self.transactions.page_no = 1;
        self.transactions.selected = 0;
        self.challenges.list.reset();
        self.challenges.selected = 0;
        self.profile.reset();
    }

    pub fn show_toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toast = Some(ToastState::new(message, level));
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expired(now)) {
            self.toast = None;
        }
    }
}

fn step(selected: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.saturating_add_signed(delta).min(len - 1)
}
