use api_types::{
    Id,
    challenge::{ChallengeBody, to_utc_iso},
    user::{RegisterRequest, UserUpdate},
};
use client::{Client, transactions::encode};
use engine::{DayKey, aggregate, rank};
use serde::Serialize;
use serde_json::json;

use crate::{
    cli::{
        ActivityArgs, ChallengeArgs, ChallengeCommand, ChallengeFields, Challenges, Command,
        LeaderboardArgs, LoginArgs, PageArgs, RegisterArgs, TransactionCommand, Transactions,
        UserCommand, UserUpdateArgs, Users,
    },
    config::AdminConfig,
    error::{AdminError, Result},
    prompt, render,
};

/// Everything a command needs: the API client and how to print.
pub struct Context {
    pub client: Client,
    pub config: AdminConfig,
    pub json: bool,
}

impl Context {
    fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> Vec<String>,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            for line in text() {
                println!("{line}");
            }
        }
        Ok(())
    }

    fn done(&self, message: String) -> Result<()> {
        self.emit(&json!({ "ok": true, "message": &message }), || vec![message.clone()])
    }

    fn page_size(&self, page: PageArgs) -> u32 {
        page.page_size
            .filter(|size| *size > 0)
            .unwrap_or(self.config.page_size)
    }
}

pub async fn execute(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Login(args) => login(ctx, args).await,
        Command::Logout => {
            ctx.client.logout()?;
            ctx.done("Logged out.".to_string())
        }
        Command::Me => {
            let user = ctx.client.me().await?;
            ctx.emit(&user, || render::user_detail(&user))
        }
        Command::Register(args) => register(ctx, args).await,
        Command::Users(Users { command }) => users(ctx, command).await,
        Command::Challenges(Challenges { command }) => challenges(ctx, command).await,
        Command::Transactions(Transactions { command }) => transactions(ctx, command).await,
        Command::Leaderboard(args) => leaderboard(ctx, args).await,
        Command::Activity(args) => activity(ctx, args).await,
    }
}

async fn login(ctx: &Context, args: LoginArgs) -> Result<()> {
    let email = args
        .email
        .or_else(|| Some(ctx.config.email.clone()))
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AdminError::Usage("--email is required".to_string()))?;
    let password = match args.password {
        Some(password) => password,
        None => prompt::password("Password: ")?,
    };

    let auth = ctx.client.login(&email, &password).await?;
    let user = auth.user;
    ctx.emit(&user, || {
        vec![format!(
            "Logged in as {} ({}).",
            user.user_name,
            user.role.label()
        )]
    })
}

async fn register(ctx: &Context, args: RegisterArgs) -> Result<()> {
    let password = prompt::new_password()?;
    let request = RegisterRequest {
        user_name: args.user_name,
        email: args.email,
        password,
        phone_number: args.phone,
        firstname: args.firstname,
        lastname: args.lastname,
    };
    ctx.client.register(&request).await?;
    ctx.done(format!("Registered {}.", request.user_name))
}

async fn users(ctx: &Context, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::List(page) => {
            let users = ctx
                .client
                .users_page(page.page, ctx.page_size(page))
                .await?;
            ctx.emit(&users, || {
                let mut lines: Vec<String> = users.data.iter().map(render::user_row).collect();
                lines.push(render::page_footer(&users));
                lines
            })
        }
        UserCommand::Get { id } => {
            let user = ctx.client.user_get(&Id::from(id.as_str())).await?;
            ctx.emit(&user, || render::user_detail(&user))
        }
        UserCommand::Update(args) => update_user(ctx, args).await,
        UserCommand::Role { id, role } => {
            let user = ctx.client.user_set_role(&Id::from(id.as_str()), role).await?;
            ctx.emit(&user, || {
                vec![format!("{} is now {}.", user.user_name, user.role.label())]
            })
        }
        UserCommand::Delete { id } => {
            ctx.client.user_delete(&Id::from(id.as_str())).await?;
            ctx.done(format!("Deleted user {id}."))
        }
    }
}

async fn update_user(ctx: &Context, args: UserUpdateArgs) -> Result<()> {
    let update = UserUpdate {
        user_name: args.user_name,
        email: args.email,
        phone_number: args.phone,
        date_of_birth: args.date_of_birth,
        subscription_type: args.subscription,
    };
    if update.is_empty() {
        return Err(AdminError::Usage("nothing to update".to_string()));
    }
    let user = ctx
        .client
        .user_update(&Id::from(args.id.as_str()), &update)
        .await?;
    ctx.emit(&user, || render::user_detail(&user))
}

async fn challenges(ctx: &Context, command: ChallengeCommand) -> Result<()> {
    match command {
        ChallengeCommand::List => {
            let challenges = ctx.client.challenges_list().await?;
            ctx.emit(&challenges, || {
                if challenges.is_empty() {
                    return vec!["No challenges.".to_string()];
                }
                challenges.iter().map(render::challenge_row).collect()
            })
        }
        ChallengeCommand::Get { id } => {
            let challenge = ctx.client.challenge_get(&Id::from(id.as_str())).await?;
            ctx.emit(&challenge, || render::challenge_detail(&challenge))
        }
        ChallengeCommand::Create(args) => create_challenge(ctx, args).await,
        ChallengeCommand::Update { id, fields } => update_challenge(ctx, &id, fields).await,
        ChallengeCommand::Delete { id } => {
            ctx.client.challenge_delete(&Id::from(id.as_str())).await?;
            ctx.done(format!("Deleted challenge {id}."))
        }
        ChallengeCommand::Complete { id, undo } => {
            let challenge = ctx.client.challenge_get(&Id::from(id.as_str())).await?;
            ctx.client.challenge_set_complete(&challenge, !undo).await?;
            let state = if undo { "not done" } else { "done" };
            ctx.done(format!("Challenge \"{}\" marked {state}.", challenge.name))
        }
    }
}

async fn create_challenge(ctx: &Context, args: ChallengeArgs) -> Result<()> {
    let body = ChallengeBody {
        id: None,
        name: args.name,
        description: args.description,
        start_date: checked_date(args.start)?,
        end_date: checked_date(args.end)?,
        is_complete: false,
    };
    ctx.client.challenge_create(body.clone()).await?;
    ctx.done(format!("Created challenge \"{}\".", body.name))
}

async fn update_challenge(ctx: &Context, id: &str, fields: ChallengeFields) -> Result<()> {
    let id = Id::from(id);
    let current = ctx.client.challenge_get(&id).await?;
    let mut body = ChallengeBody::from_challenge(&current);
    if let Some(name) = fields.name {
        body.name = name;
    }
    if let Some(description) = fields.description {
        body.description = description;
    }
    if let Some(start) = checked_date(fields.start)? {
        body.start_date = Some(start);
    }
    if let Some(end) = checked_date(fields.end)? {
        body.end_date = Some(end);
    }
    let name = body.name.clone();
    ctx.client.challenge_update(&id, body).await?;
    ctx.done(format!("Updated challenge \"{name}\"."))
}

/// Rejects dates that would otherwise be dropped from the request body.
fn checked_date(raw: Option<String>) -> Result<Option<String>> {
    match raw {
        None => Ok(None),
        Some(raw) => to_utc_iso(&raw)
            .map(Some)
            .ok_or_else(|| AdminError::Usage(format!("unreadable date: {raw}"))),
    }
}

async fn transactions(ctx: &Context, command: TransactionCommand) -> Result<()> {
    match command {
        TransactionCommand::List { page, user } => {
            let size = ctx.page_size(page);
            let list = match user {
                Some(user) => {
                    ctx.client
                        .transactions_by_user(&Id::from(user.as_str()), page.page, size)
                        .await?
                }
                None => ctx.client.transactions_list(page.page, size).await?,
            };
            let records: Vec<_> = list.iter().map(encode).collect();
            ctx.emit(&records, || {
                if list.is_empty() {
                    return vec!["No transactions.".to_string()];
                }
                list.iter().map(render::transaction_row).collect()
            })
        }
        TransactionCommand::Get { id } => {
            let transaction = ctx.client.transaction_get(&Id::from(id.as_str())).await?;
            ctx.emit(&encode(&transaction), || {
                vec![render::transaction_row(&transaction)]
            })
        }
        TransactionCommand::Status { id, status, reason } => {
            let updated = ctx
                .client
                .transaction_set_status(&Id::from(id.as_str()), status, reason)
                .await?;
            ctx.emit(&encode(&updated), || {
                vec![
                    format!("Transaction {id} is now {}.", updated.status),
                    render::transaction_row(&updated),
                ]
            })
        }
    }
}

async fn leaderboard(ctx: &Context, args: LeaderboardArgs) -> Result<()> {
    let rows = ctx.client.leaderboard().await?;
    let ranked = rank(
        rows.into_iter()
            .map(|row| (row.user_name, row.total_co2_emission)),
        args.limit,
    );
    let value: Vec<_> = ranked
        .iter()
        .map(|row| {
            json!({
                "rank": row.rank + 1,
                "userName": row.name,
                "totalCO2Emission": row.total,
                "medal": row.medal.map(|m| m.label()),
            })
        })
        .collect();
    ctx.emit(&value, || render::leaderboard(&ranked))
}

async fn activity(ctx: &Context, args: ActivityArgs) -> Result<()> {
    let day = match args.date {
        Some(day) => day,
        None => DayKey::today(ctx.config.tz()?),
    };
    let records = ctx.client.activity_records().await?;
    let breakdown = aggregate(&records, day);
    tracing::debug!(%day, records = records.len(), total = breakdown.total_raw, "aggregated activities");

    let slices: Vec<_> = breakdown
        .slices
        .iter()
        .map(|slice| {
            json!({
                "category": slice.category.label(),
                "total": slice.raw_total,
                "percentage": slice.percentage,
            })
        })
        .collect();
    let value = json!({
        "day": day.to_string(),
        "total": breakdown.total_raw,
        "slices": slices,
    });
    ctx.emit(&value, || render::breakdown(&breakdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_date_normalizes_to_utc() {
        assert_eq!(
            checked_date(Some("2025-10-02".to_string())).unwrap().as_deref(),
            Some("2025-10-02T00:00:00.000Z")
        );
        assert_eq!(checked_date(None).unwrap(), None);
    }

    #[test]
    fn checked_date_rejects_garbage() {
        let err = checked_date(Some("next tuesday".to_string())).unwrap_err();
        assert!(matches!(err, AdminError::Usage(msg) if msg == "unreadable date: next tuesday"));
    }
}
