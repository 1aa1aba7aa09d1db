use api_types::user::{Role, SubscriptionType};
use clap::{Args, Parser, Subcommand};
use engine::{DayKey, TOP_CONTRIBUTORS, TransactionStatus};

#[derive(Parser, Debug)]
#[command(name = "carbonboard_admin")]
#[command(about = "Admin utilities for the carbonboard API (users, challenges, transactions)")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides layered on top of the config file and `CARBONBOARD_*` env.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// API base URL, `/api` prefix included.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// IANA timezone used to pick "today".
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Log level for stderr output.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// Persisted session file.
    #[arg(long, global = true)]
    pub token_path: Option<String>,
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and persist the session token.
    Login(LoginArgs),
    /// Forget the persisted session token.
    Logout,
    /// Show the logged-in user.
    Me,
    /// Create an account (password is prompted).
    Register(RegisterArgs),
    Users(Users),
    Challenges(Challenges),
    Transactions(Transactions),
    /// Lowest-emission users first.
    Leaderboard(LeaderboardArgs),
    /// Emission breakdown of one day.
    Activity(ActivityArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Defaults to the configured email.
    #[arg(long)]
    pub email: Option<String>,
    /// Prompted when absent.
    #[arg(long, env = "CARBONBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub user_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub firstname: Option<String>,
    #[arg(long)]
    pub lastname: Option<String>,
}

#[derive(Args, Debug)]
pub struct Users {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    List(PageArgs),
    Get {
        id: String,
    },
    Update(UserUpdateArgs),
    /// Change a user's role (admin, staff, user).
    Role {
        id: String,
        #[arg(value_parser = parse_role)]
        role: Role,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct UserUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub user_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub date_of_birth: Option<String>,
    /// free, vip25 or vip50.
    #[arg(long, value_parser = parse_subscription)]
    pub subscription: Option<SubscriptionType>,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Defaults to the configured page size.
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Args, Debug)]
pub struct Challenges {
    #[command(subcommand)]
    pub command: ChallengeCommand,
}

#[derive(Subcommand, Debug)]
pub enum ChallengeCommand {
    List,
    Get {
        id: String,
    },
    Create(ChallengeArgs),
    /// Replace a challenge; omitted fields keep their current value.
    Update {
        id: String,
        #[command(flatten)]
        fields: ChallengeFields,
    },
    Delete {
        id: String,
    },
    /// Mark a challenge done (or not done with `--undo`).
    Complete {
        id: String,
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Args, Debug)]
pub struct ChallengeArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// `YYYY-MM-DD` or an ISO-8601 timestamp.
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ChallengeFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args, Debug)]
pub struct Transactions {
    #[command(subcommand)]
    pub command: TransactionCommand,
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Only this user's transactions.
        #[arg(long)]
        user: Option<String>,
    },
    Get {
        id: String,
    },
    /// Move a pending transaction to completed, failed or cancelled.
    Status {
        id: String,
        #[arg(value_parser = parse_status)]
        status: TransactionStatus,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct LeaderboardArgs {
    #[arg(long, default_value_t = TOP_CONTRIBUTORS)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// `YYYY-MM-DD`; defaults to today in the configured timezone.
    #[arg(long)]
    pub date: Option<DayKey>,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::from_label(raw).ok_or_else(|| format!("unknown role: {raw} (admin, staff, user)"))
}

fn parse_subscription(raw: &str) -> Result<SubscriptionType, String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    SubscriptionType::ALL
        .into_iter()
        .find(|tier| tier.label().replace(' ', "").eq_ignore_ascii_case(&compact))
        .ok_or_else(|| format!("unknown subscription: {raw} (free, vip25, vip50)"))
}

fn parse_status(raw: &str) -> Result<TransactionStatus, String> {
    TransactionStatus::from_label(raw)
        .ok_or_else(|| format!("unknown status: {raw} (completed, failed, cancelled)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        let mut full = vec!["carbonboard_admin"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = parse(&["me", "--base-url", "http://api.test/api", "--json"]);
        assert!(matches!(cli.command, Command::Me));
        assert_eq!(cli.global.base_url.as_deref(), Some("http://api.test/api"));
        assert!(cli.global.json);
    }

    #[test]
    fn role_names_are_case_insensitive() {
        let cli = parse(&["users", "role", "12", "STAFF"]);
        match cli.command {
            Command::Users(Users {
                command: UserCommand::Role { id, role },
            }) => {
                assert_eq!(id, "12");
                assert_eq!(role, Role::Staff);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["carbonboard_admin", "users", "role", "1", "root"]).is_err());
    }

    #[test]
    fn subscription_accepts_compact_and_spaced_names() {
        assert_eq!(parse_subscription("vip25"), Ok(SubscriptionType::Vip25));
        assert_eq!(parse_subscription("VIP 50"), Ok(SubscriptionType::Vip50));
        assert_eq!(parse_subscription("free"), Ok(SubscriptionType::Free));
        assert!(parse_subscription("gold").is_err());
    }

    #[test]
    fn transaction_status_takes_reason() {
        let cli = parse(&["transactions", "status", "7", "failed", "--reason", "card declined"]);
        match cli.command {
            Command::Transactions(Transactions {
                command: TransactionCommand::Status { id, status, reason },
            }) => {
                assert_eq!(id, "7");
                assert_eq!(status, TransactionStatus::Failed);
                assert_eq!(reason.as_deref(), Some("card declined"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn activity_date_is_strict() {
        let cli = parse(&["activity", "--date", "2025-10-02"]);
        match cli.command {
            Command::Activity(ActivityArgs { date: Some(day) }) => {
                assert_eq!(day.to_string(), "2025-10-02");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(
            Cli::try_parse_from(["carbonboard_admin", "activity", "--date", "2025-13-40"]).is_err()
        );
    }

    #[test]
    fn leaderboard_defaults_to_top_contributors() {
        match parse(&["leaderboard"]).command {
            Command::Leaderboard(args) => assert_eq!(args.limit, TOP_CONTRIBUTORS),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn challenge_update_fields_are_optional() {
        match parse(&["challenges", "update", "3", "--end", "2025-10-09"]).command {
            Command::Challenges(Challenges {
                command: ChallengeCommand::Update { id, fields },
            }) => {
                assert_eq!(id, "3");
                assert!(fields.name.is_none());
                assert_eq!(fields.end.as_deref(), Some("2025-10-09"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
