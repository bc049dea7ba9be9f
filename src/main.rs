use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use onta::api::HttpApi;
use onta::articles::{ArticleCollection, DEFAULT_PRIORITY};
use onta::auth::Account;
use onta::catalog::{Color, Icon};
use onta::categories::CategoryCollection;
use onta::config::Config;
use onta::ids::{ArticleId, CategoryId};
use onta::navigation::{Outcome, Route};
use onta::search::SearchSession;
use onta::session::{Session, SqliteSessionStore};
use onta::util::{strip_control_chars, truncate_to_width};

/// Column width for titles in list output.
const TITLE_WIDTH: usize = 48;

type Shell = Account<HttpApi, SqliteSessionStore>;

/// Get the config directory path (~/.config/onta/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("onta"))
}

#[derive(Parser, Debug)]
#[command(name = "onta", about = "Organize notes into categories on an OnTa server")]
struct Args {
    /// Config file (default: ~/.config/onta/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in. The password is read from stdin.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create an account. The password is read from stdin.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },
    /// Email a password reset link
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Sign out
    Logout,
    /// Show the profile of the signed-in user
    Profile,
    /// Change the display name
    Rename { name: String },
    /// Change the sign-in email
    ChangeEmail { email: String },
    /// Change the password. Current and new password are read from stdin.
    ChangePassword,
    /// List categories
    Categories,
    /// Create, delete or browse categories
    #[command(subcommand)]
    Category(CategoryCommand),
    /// List articles, starred first
    Articles {
        /// Only articles of this category
        #[arg(long)]
        category: Option<CategoryId>,
        /// Star these article ids for this listing
        #[arg(long = "star", value_name = "ID")]
        starred: Vec<ArticleId>,
    },
    /// Create, edit or delete an article
    #[command(subcommand)]
    Article(ArticleCommand),
    /// Search article titles and text
    Search {
        /// Empty searches are sent as-is
        #[arg(default_value = "")]
        query: String,
        #[arg(long = "star", value_name = "ID")]
        starred: Vec<ArticleId>,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        icon: String,
        #[arg(long, default_value_t = Color::default().to_string())]
        color: String,
    },
    Delete { id: CategoryId },
    /// Print the accepted icon names and colors
    Catalog,
}

#[derive(Subcommand, Debug)]
enum ArticleCommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        category: Option<CategoryId>,
        #[arg(long, default_value_t = DEFAULT_PRIORITY)]
        priority: i64,
    },
    Edit {
        id: ArticleId,
        #[arg(long)]
        title: String,
    },
    Delete { id: ArticleId },
}

/// Read one line from stdin without echoing it into logs.
fn read_secret(prompt: &str) -> Result<SecretString> {
    eprint!("{prompt}: ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::from(trimmed))
}

fn title_cell(title: &str) -> String {
    let clean = strip_control_chars(title);
    truncate_to_width(&clean, TITLE_WIDTH).into_owned()
}

/// The command that opens `route` in this shell.
fn hint(route: &Route) -> Option<&'static str> {
    match route {
        Route::Login => Some("onta login --email <EMAIL>"),
        Route::Home { .. } => Some("onta categories"),
        Route::CategoryList => Some("onta articles"),
        _ => None,
    }
}

fn finish(outcome: Outcome) {
    if let Some(message) = outcome.message {
        println!("{}", strip_control_chars(&message));
    }
    if let Some(next) = hint(&outcome.next) {
        println!("Next: {next}");
    }
}

async fn run(shell: &Shell, command: Command) -> onta::Result<()> {
    let api = shell.api().clone();
    match command {
        Command::Login { email } => {
            let password = read_secret("Password")
                .map_err(|_| onta::error::ValidationError::MissingField("Password"))?;
            let next = shell.login(&email, &password).await?;
            let me = shell.session().identity().await?;
            println!("Signed in as {} <{}>", me.name, me.email);
            if let Some(next) = hint(&next) {
                println!("Next: {next}");
            }
        }
        Command::Register {
            name,
            email,
            accept_terms,
        } => {
            let password = read_secret("Password")
                .map_err(|_| onta::error::ValidationError::MissingField("Password"))?;
            finish(shell.register(&name, &email, password, accept_terms).await?);
        }
        Command::ResetPassword { email } => {
            finish(shell.request_password_reset(&email).await?);
        }
        Command::Logout => {
            shell.logout().await?;
            println!("Signed out");
        }
        Command::Profile => {
            let profile = shell.profile().await?;
            println!("{}", strip_control_chars(&profile.name));
            println!("{}", strip_control_chars(&profile.email));
        }
        Command::Rename { name } => {
            let message = shell.rename(&name).await?;
            println!("{}", message.unwrap_or_else(|| "Name updated".to_string()));
        }
        Command::ChangeEmail { email } => {
            let message = shell.change_email(&email).await?;
            println!("{}", message.unwrap_or_else(|| "Email updated".to_string()));
        }
        Command::ChangePassword => {
            let missing = |_| onta::error::ValidationError::MissingField("Password");
            let current = read_secret("Current password").map_err(missing)?;
            let new = read_secret("New password").map_err(missing)?;
            let message = shell.change_password(&current, &new).await?;
            println!("{}", message.unwrap_or_else(|| "Password updated".to_string()));
        }
        Command::Categories => {
            let user = shell.session().user_id().await?;
            let mut categories = CategoryCollection::new(api);
            categories.load(user).await?;
            shell.session().cache_categories(categories.categories()).await?;
            for c in categories.categories() {
                println!(
                    "{:>6}  {:<20} {} {:>4}  {}",
                    c.id,
                    c.icon,
                    c.color,
                    c.article_count,
                    title_cell(&c.name)
                );
            }
        }
        Command::Category(CategoryCommand::Create { name, icon, color }) => {
            let user = shell.session().user_id().await?;
            let categories = CategoryCollection::new(api);
            finish(categories.create(&name, &icon, &color, user).await?);
        }
        Command::Category(CategoryCommand::Delete { id }) => {
            let user = shell.session().user_id().await?;
            let mut categories = CategoryCollection::new(api);
            categories.load(user).await?;
            categories.delete(id).await?;
            println!("Category {id} deleted");
        }
        Command::Category(CategoryCommand::Catalog) => {
            let icons: Vec<&str> = Icon::all().map(|i| i.as_str()).collect();
            let colors: Vec<&str> = Color::all().map(|c| c.as_str()).collect();
            println!("Icons:  {}", icons.join(" "));
            println!("Colors: {}", colors.join(" "));
        }
        Command::Articles { category, starred } => {
            let user = shell.session().user_id().await?;
            let mut articles = ArticleCollection::new(api);
            articles.load(user).await?;
            for id in starred {
                articles.toggle_starred(id);
            }
            let listed = match category {
                Some(id) => articles.in_category(id),
                None => articles.ordered(),
            };
            for a in listed {
                let star = if articles.is_starred(a.id) { '*' } else { ' ' };
                println!("{star} {:>6}  {}", a.id, title_cell(&a.title));
            }
        }
        Command::Article(ArticleCommand::Create {
            title,
            body,
            category,
            priority,
        }) => {
            let user = shell.session().user_id().await?;
            let articles = ArticleCollection::new(api);
            finish(articles.create(&title, &body, category, user, priority).await?);
        }
        Command::Article(ArticleCommand::Edit { id, title }) => {
            let user = shell.session().user_id().await?;
            let mut articles = ArticleCollection::new(api);
            articles.load(user).await?;
            articles.edit(id, &title).await?;
            println!("Article {id} renamed");
        }
        Command::Article(ArticleCommand::Delete { id }) => {
            shell.session().user_id().await?;
            let mut articles = ArticleCollection::new(api);
            articles.delete(id).await?;
            println!("Article {id} deleted");
        }
        Command::Search { query, starred } => {
            let mut search = SearchSession::open(api, shell.session()).await;
            search.search(&query).await?;
            for id in starred {
                search.toggle_starred(id);
            }
            for hit in search.ordered() {
                let star = if search.is_starred(hit.id) { '*' } else { ' ' };
                println!("{star} {:>6}  {}", hit.id, title_cell(&hit.title));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // The session database holds the user's identity: user-only access
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .context("Failed to load configuration")?
        .with_env_overrides();

    let api = HttpApi::from_config(&config).context("Invalid API base URL")?;

    let db_path = config.session_db_path(&config_dir);
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in session database path"))?;
    let store = SqliteSessionStore::open(db_path_str)
        .await
        .context("Failed to open session database")?;

    let shell = Account::new(api, Session::new(store));

    if let Err(e) = run(&shell, args.command).await {
        eprintln!("Error: {}", strip_control_chars(&e.notice()));
        if let Some(next) = e.redirect().as_ref().and_then(hint) {
            eprintln!("Next: {next}");
        }
        std::process::exit(1);
    }
    Ok(())
}
