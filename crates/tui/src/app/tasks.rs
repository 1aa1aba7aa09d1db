use std::future::Future;

use api_types::{
    Page,
    challenge::Challenge,
    user::{AuthResult, User},
};
use client::ClientError;
use engine::{ActivityRecord, Ranked, Ticket, Transaction};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::state::Section;

type Loaded<T> = Result<T, ClientError>;

/// Completion of a background request, sent back to the event loop.
#[derive(Debug)]
pub enum Update {
    Login(Loaded<AuthResult>),
    Primed(Option<User>),
    Profile(Ticket, Loaded<User>),
    Leaderboard(Ticket, Loaded<Vec<Ranked>>),
    Activities(Ticket, Loaded<Vec<ActivityRecord>>),
    Users(Ticket, Loaded<Page<User>>),
    Transactions(Ticket, Loaded<Vec<Transaction>>),
    Challenges(Ticket, Loaded<Vec<Challenge>>),
    /// A mutation finished; on success `section` is reloaded.
    Action {
        section: Section,
        result: Loaded<String>,
    },
}

/// Runs `fut` on the runtime and posts its wrapped output to `tx`.
pub fn spawn<F, T, W>(tx: &UnboundedSender<Update>, fut: F, wrap: W)
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
    W: FnOnce(T) -> Update + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = wrap(fut.await);
        if tx.send(event).is_err() {
            tracing::debug!("event loop closed before a response arrived");
        }
    });
}
