//! ClassMate CLI
//!
//! Drives the client core from a terminal: sign in, open a profile page,
//! search posts, ban or promote forum members, read and save notification
//! preferences, and list a post's comments. Results are printed as JSON on
//! stdout; logs go to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use classmate_core::api::{
    AuthApi, CommentApi, ForumApi, NotificationPreferenceApi, DEFAULT_COMMENT_PAGE_SIZE,
};
use classmate_core::config::DEFAULT_BASE_URL;
use classmate_core::model::{
    AuthRequest, ForumId, Post, PostId, PreferenceKind, PreferenceSet, RegisterRequest, UserId,
    UserProfile, UserType,
};
use classmate_core::moderation::{user_type_label, TargetUser, Viewer};
use classmate_core::{ClassMateClient, ClientConfig, ClientEvent};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "classmate", version, about = "ClassMate forum client")]
struct Cli {
    /// Backend gateway URL
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "CLASSMATE_API_URL")]
    api_url: String,

    /// Bearer token for the backend
    #[arg(long, env = "CLASSMATE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, env = "CLASSMATE_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Quiet period before preference edits are saved, in milliseconds
    #[arg(long, default_value_t = 150, env = "CLASSMATE_DEBOUNCE_MS")]
    debounce_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the JWT to use as CLASSMATE_TOKEN
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long, env = "CLASSMATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account; a confirmation email is sent
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLASSMATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show a user's profile, photo and posts
    Profile {
        /// User to show
        user_id: UserId,
        /// Signed-in user (defaults to the shown user)
        #[arg(long = "as")]
        viewer: Option<UserId>,
    },

    /// Search posts by title
    Search {
        /// Title text; omitted means the empty query
        query: Option<String>,
        /// Restrict to one forum (0 searches every forum)
        #[arg(long)]
        forum_id: Option<ForumId>,
    },

    /// Ban a member from a forum
    Ban {
        /// User id of the forum's creator
        #[arg(long)]
        forum_owner: UserId,
        /// User issuing the ban
        #[arg(long)]
        actor: UserId,
        /// User to ban
        #[arg(long)]
        target: UserId,
        /// The actor created the forum
        #[arg(long)]
        creator: bool,
        /// The actor moderates the forum
        #[arg(long)]
        admin: bool,
        /// The target's role in the forum
        #[arg(long, value_enum, default_value_t = Role::Subscriber)]
        target_type: Role,
    },

    /// Promote a member to moderator
    AddAdmin {
        /// Forum id
        #[arg(long)]
        forum: ForumId,
        /// Member to promote
        #[arg(long)]
        user: UserId,
    },

    /// Read or change notification preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsCommand,
    },

    /// List a post's comments
    Comments {
        /// Post id
        post_id: PostId,
        /// Page number, from 0
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = DEFAULT_COMMENT_PAGE_SIZE)]
        size: u32,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Print the stored preferences
    Get {
        /// Owner of the preferences
        user_id: UserId,
    },

    /// Change some flags and save once
    Set {
        /// Owner of the preferences
        user_id: UserId,
        #[arg(long)]
        comment: Option<bool>,
        #[arg(long)]
        like: Option<bool>,
        #[arg(long)]
        message: Option<bool>,
        #[arg(long)]
        event: Option<bool>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Role {
    Creator,
    Admin,
    Subscriber,
}

impl From<Role> for UserType {
    fn from(role: Role) -> Self {
        match role {
            Role::Creator => UserType::Creator,
            Role::Admin => UserType::Admin,
            Role::Subscriber => UserType::Subscriber,
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileReport {
    profile: Option<UserProfile>,
    photo_url: Option<String>,
    posts: Vec<Post>,
    own_profile: bool,
    edit_route: Option<String>,
    preferences_route: Option<String>,
    preferences: PreferenceSet,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BanReport {
    forum_owner_id: UserId,
    acting_user_id: UserId,
    target_user_id: UserId,
    target_role: &'static str,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// View-models swallow failures and publish them; surface the first one.
fn take_failure(rx: &mut broadcast::Receiver<ClientEvent>) -> Result<()> {
    loop {
        match rx.try_recv() {
            Ok(ClientEvent::OperationFailed { operation, error }) => {
                return Err(eyre!(error).wrap_err(format!("{} failed", operation)));
            }
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
        }
    }
}

// ── Entry Point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classmate_core=info,classmate_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::default()
        .with_base_url(cli.api_url)
        .with_preference_debounce(std::time::Duration::from_millis(cli.debounce_ms));
    config.request_timeout = std::time::Duration::from_secs(cli.timeout_secs);
    if let Some(token) = cli.token {
        config = config.with_auth_token(token);
    }

    let client = ClassMateClient::new(config).wrap_err("Invalid client configuration")?;
    let mut failures = client.events().subscribe();

    match cli.command {
        Command::Login { email, password } => {
            let token = client
                .backend()
                .authenticate(&AuthRequest::new(email, password))
                .await
                .wrap_err("Sign-in failed")?;
            println!("{}", token);
        }

        Command::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            client
                .backend()
                .register(&RegisterRequest {
                    first_name,
                    last_name,
                    email: email.clone(),
                    password,
                })
                .await
                .wrap_err("Registration failed")?;
            tracing::info!(%email, "Account created; check the inbox to confirm it");
        }

        Command::Profile { user_id, viewer } => {
            let page = client.profile_page(viewer.unwrap_or(user_id));
            page.open(user_id).await;
            take_failure(&mut failures)?;

            print_json(&ProfileReport {
                profile: page.profile(),
                photo_url: page.photo_url(),
                posts: page.posts(),
                own_profile: page.is_own_profile(),
                edit_route: page.navigate_to_edit_profile(),
                preferences_route: page.navigate_to_notification_preferences(),
                preferences: page.preferences(),
            })?;
        }

        Command::Search { query, forum_id } => {
            let search = client.post_search();
            search.search(query.as_deref(), forum_id).await;
            take_failure(&mut failures)?;
            print_json(&search.results())?;
        }

        Command::Ban {
            forum_owner,
            actor,
            target,
            creator,
            admin,
            target_type,
        } => {
            let viewer = Viewer {
                user_id: actor,
                is_creator: creator,
                is_admin: admin,
            };
            let target = TargetUser {
                user_id: target,
                user_type: target_type.into(),
            };
            client
                .moderator()
                .ban_user(&viewer, forum_owner, &target)
                .await
                .wrap_err("Ban failed")?;

            print_json(&BanReport {
                forum_owner_id: forum_owner,
                acting_user_id: actor,
                target_user_id: target.user_id,
                target_role: user_type_label(target.user_type.as_str()),
            })?;
        }

        Command::AddAdmin { forum, user } => {
            client
                .backend()
                .add_admin(forum, user)
                .await
                .wrap_err("Promotion failed")?;
            tracing::info!(forum, user, "Moderator added");
        }

        Command::Prefs { action } => match action {
            PrefsCommand::Get { user_id } => {
                let prefs = client.backend().get_user_preferences(user_id).await?;
                print_json(&prefs)?;
            }
            PrefsCommand::Set {
                user_id,
                comment,
                like,
                message,
                event,
            } => {
                let edits: Vec<(PreferenceKind, bool)> = [
                    (PreferenceKind::Comment, comment),
                    (PreferenceKind::Like, like),
                    (PreferenceKind::Message, message),
                    (PreferenceKind::Event, event),
                ]
                .into_iter()
                .filter_map(|(kind, value)| value.map(|v| (kind, v)))
                .collect();
                if edits.is_empty() {
                    bail!("Nothing to change; pass at least one of --comment, --like, --message, --event");
                }

                let stored = client.backend().get_user_preferences(user_id).await?;
                let sync = client.preference_synchronizer(user_id, stored);
                for (kind, enabled) in edits {
                    sync.set(kind, enabled);
                }
                sync.flush_now().await.wrap_err("Saving preferences failed")?;
                print_json(&sync.current())?;
                sync.shutdown();
            }
        },

        Command::Comments {
            post_id,
            page,
            size,
        } => {
            let comments = client
                .backend()
                .get_comments_by_post(post_id, page, size)
                .await?;
            print_json(&comments)?;
        }
    }

    Ok(())
}
