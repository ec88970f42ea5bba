//! `jury` command line.
//!
//! Every command names a route; it is resolved through the route guard
//! before anything is loaded. A refused command renders the screen the
//! guard redirected to instead.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use jury_auth::Role;
use jury_core::{CandidateId, CategoryId, CriterionId, UserId};
use jury_observability::LogFormat;

use crate::app::App;
use crate::config::ClientConfig;
use crate::notify::Notification;
use crate::routes::Route;
use crate::screens::{
    CandidateForm, CandidatesScreen, CategoriesScreen, CategoryForm, CriteriaScreen, CriterionForm,
    FinalScoresScreen, LoginScreen, Screen, ScoreEntryScreen, UserForm, UsersScreen,
};

/// Terminal client of the jury evaluation backend.
#[derive(Parser, Debug)]
#[command(name = "jury")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides JURY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session token file (overrides JURY_TOKEN_PATH)
    #[arg(long, global = true)]
    pub token_path: Option<PathBuf>,

    /// Log output format: text or json (overrides JURY_LOG_FORMAT)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration.
    pub fn configure(&self, config: ClientConfig) -> Result<ClientConfig> {
        let mut config = match &self.api_url {
            Some(url) => config.with_api_url(url).context("invalid --api-url")?,
            None => config,
        };
        if let Some(path) = &self.token_path {
            config = config.with_token_path(path.clone());
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long, env = "JURY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in identity
    Whoami,

    /// Render the screen at a route path (e.g. /dashboard)
    Open { path: String },

    /// Candidates
    #[command(subcommand)]
    Candidates(CandidatesCommand),

    /// Categories and their rosters (admin)
    #[command(subcommand)]
    Categories(CategoriesCommand),

    /// Scoring criteria (admin)
    #[command(subcommand)]
    Criteria(CriteriaCommand),

    /// User accounts (admin)
    #[command(subcommand)]
    Users(UsersCommand),

    /// Score entry (jury)
    #[command(subcommand)]
    Scores(ScoresCommand),

    /// Final leaderboard of a category (admin)
    FinalScores {
        #[arg(long)]
        category: Option<CategoryId>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CandidatesCommand {
    #[command(alias = "ls")]
    List,
    Add(CandidateArgs),
    Delete { id: CandidateId },
}

#[derive(Args, Debug)]
pub struct CandidateArgs {
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    #[command(alias = "ls")]
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: CategoryId,
    },
    AssignCandidate {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        candidate: CandidateId,
    },
    AssignJury {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        jury: UserId,
    },
    RemoveCandidate {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        candidate: CandidateId,
    },
    RemoveJury {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        jury: UserId,
    },
}

#[derive(Subcommand, Debug)]
pub enum CriteriaCommand {
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        category: Option<CategoryId>,
    },
    Add {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        max: i64,
    },
    Delete {
        id: CriterionId,
        /// Category to list afterwards
        #[arg(long)]
        category: Option<CategoryId>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    #[command(alias = "ls")]
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "JURY_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "jury")]
        role: Role,
    },
    Delete {
        id: UserId,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScoresCommand {
    /// Candidates and criteria of a category
    Show {
        #[arg(long)]
        category: Option<CategoryId>,
    },
    /// Save one note
    Save {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        candidate: CandidateId,
        #[arg(long)]
        criterion: CriterionId,
        #[arg(long)]
        note: f64,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Every jury member's total for a candidate
    JuryTotals {
        #[arg(long)]
        category: CategoryId,
        #[arg(long)]
        candidate: CandidateId,
    },
}

impl Command {
    pub fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout | Command::Whoami => Route::Login,
            Command::Open { path } => Route::from_path(path),
            Command::Candidates(_) => Route::Candidates,
            Command::Categories(_) => Route::Categories,
            Command::Criteria(_) => Route::Criteria,
            Command::Users(_) => Route::Users,
            Command::Scores(_) => Route::Scores,
            Command::FinalScores { .. } => Route::FinalScores,
        }
    }
}

/// Execute one command. Screen output goes to stdout; the exit code is
/// non-zero when the command ends on an error notification.
pub async fn run(app: &App, command: Command) -> Result<ExitCode> {
    match command {
        Command::Login { email, password } => login(app, &email, password).await,
        Command::Logout => {
            app.session().logout().context("failed to clear the stored session")?;
            println!("Logged out.");
            Ok(ExitCode::SUCCESS)
        }
        Command::Whoami => Ok(whoami(app)),
        command => {
            let navigation = app.navigate(command.route());
            if navigation.redirected() {
                eprintln!(
                    "{} is not available to you; showing {} instead.",
                    navigation.requested, navigation.target
                );
                let mut screen = app.mount(navigation.target).await;
                return Ok(present(screen.as_mut()));
            }
            dispatch(app, command).await
        }
    }
}

async fn dispatch(app: &App, command: Command) -> Result<ExitCode> {
    let api = app.api().clone();
    let code = match command {
        Command::Open { path } => {
            let mut screen = app.mount(Route::from_path(&path)).await;
            present(screen.as_mut())
        }
        Command::Candidates(cmd) => {
            let mut screen = CandidatesScreen::new(api);
            screen.mount().await;
            match cmd {
                CandidatesCommand::List => {}
                CandidatesCommand::Add(args) => {
                    let form = CandidateForm {
                        last_name: args.last_name,
                        first_name: args.first_name,
                        email: args.email,
                        project: args.project,
                        company: args.company,
                    };
                    screen.create(&form).await;
                }
                CandidatesCommand::Delete { id } => screen.delete(id).await,
            }
            present(&mut screen)
        }
        Command::Categories(cmd) => {
            let mut screen = CategoriesScreen::new(api);
            screen.mount().await;
            if !loaded(&screen) {
                return Ok(present(&mut screen));
            }
            match cmd {
                CategoriesCommand::List => {}
                CategoriesCommand::Add { name, description } => {
                    screen.create_category(&CategoryForm { name, description }).await;
                }
                CategoriesCommand::Delete { id } => screen.delete_category(id).await,
                CategoriesCommand::AssignCandidate { category, candidate } => {
                    match screen.select_candidate(candidate) {
                        Ok(()) => screen.add_candidate(category).await,
                        Err(err) => return Ok(reject(&mut screen, err)),
                    }
                }
                CategoriesCommand::AssignJury { category, jury } => match screen.select_jury(jury) {
                    Ok(()) => screen.add_jury(category).await,
                    Err(err) => return Ok(reject(&mut screen, err)),
                },
                CategoriesCommand::RemoveCandidate { category, candidate } => {
                    screen.remove_candidate(category, candidate).await;
                }
                CategoriesCommand::RemoveJury { category, jury } => {
                    screen.remove_jury(category, jury).await;
                }
            }
            present(&mut screen)
        }
        Command::Criteria(cmd) => {
            let mut screen = CriteriaScreen::new(api);
            screen.mount().await;
            if !loaded(&screen) {
                return Ok(present(&mut screen));
            }
            match cmd {
                CriteriaCommand::List { category } => {
                    if let Some(category) = category {
                        screen.select_category(category).await;
                    }
                }
                CriteriaCommand::Add { category, name, max } => {
                    screen.select_category(category).await;
                    if screen.selected_category() == Some(category) {
                        screen.create(&CriterionForm { name, max_value: max }).await;
                    }
                }
                CriteriaCommand::Delete { id, category } => {
                    if let Some(category) = category {
                        screen.select_category(category).await;
                    }
                    screen.delete(id).await;
                }
            }
            present(&mut screen)
        }
        Command::Users(cmd) => {
            let mut screen = UsersScreen::new(api);
            screen.mount().await;
            match cmd {
                UsersCommand::List => {}
                UsersCommand::Add {
                    name,
                    email,
                    password,
                    role,
                } => {
                    let form = UserForm {
                        name,
                        email,
                        password,
                        role,
                    };
                    screen.create(&form).await;
                }
                UsersCommand::Delete { id } => screen.delete(id).await,
            }
            present(&mut screen)
        }
        Command::Scores(cmd) => {
            let mut screen = ScoreEntryScreen::new(api);
            screen.mount().await;
            if !loaded(&screen) {
                return Ok(present(&mut screen));
            }
            match cmd {
                ScoresCommand::Show { category } => {
                    if let Some(category) = category {
                        screen.select_category(category).await;
                    }
                }
                ScoresCommand::Save {
                    category,
                    candidate,
                    criterion,
                    note,
                    comment,
                } => {
                    screen.select_category(category).await;
                    if screen.selected_category() == Some(category) {
                        screen.set_note(candidate, criterion, Some(note));
                        screen.set_comment(candidate, criterion, comment.unwrap_or_default());
                        screen.save(candidate, criterion).await;
                    }
                }
                ScoresCommand::JuryTotals { category, candidate } => {
                    screen.select_category(category).await;
                    if screen.selected_category() == Some(category) {
                        screen.load_jury_totals(candidate).await;
                    }
                }
            }
            present(&mut screen)
        }
        Command::FinalScores { category } => {
            let mut screen = FinalScoresScreen::new(api);
            screen.mount().await;
            if let Some(category) = category.filter(|_| loaded(&screen)) {
                screen.select_category(category).await;
            }
            present(&mut screen)
        }
        Command::Login { .. } | Command::Logout | Command::Whoami => {
            anyhow::bail!("session commands are not routed through screens")
        }
    };
    Ok(code)
}

async fn login(app: &App, email: &str, password: Option<String>) -> Result<ExitCode> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let mut screen = LoginScreen::new(app.api().clone());
    let Some(next) = screen.submit(email, &password).await else {
        return Ok(present(&mut screen));
    };
    if let Some(notice) = screen.take_notification() {
        println!("{notice}");
    }

    let (navigation, mut landing) = app.open_route(next).await;
    if navigation.redirected() {
        eprintln!("The token returned by the backend could not be read; you are not logged in.");
    }
    Ok(present(landing.as_mut()))
}

fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush().context("failed to write prompt")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn whoami(app: &App) -> ExitCode {
    let session = app.session().snapshot();
    match &session.identity {
        Some(identity) => {
            println!("{} <{}>", identity.name, identity.email);
            println!("role:    {}", identity.role);
            println!("user id: {}", identity.user_id);
            if let Some(expires_at) = identity.expires_at {
                let state = if identity.is_expired(chrono::Utc::now()) { "expired" } else { "expires" };
                println!("token:   {state} {}", expires_at.to_rfc3339());
            }
            ExitCode::SUCCESS
        }
        None => {
            if session.has_undecodable_token() {
                eprintln!("A session token is stored but cannot be read; run `jury login` again.");
            }
            println!("Not logged in.");
            ExitCode::FAILURE
        }
    }
}

/// Mount went through without an error notification.
fn loaded(screen: &dyn Screen) -> bool {
    !screen.notification().is_some_and(Notification::is_error)
}

fn reject(screen: &mut dyn Screen, err: crate::forms::FormError) -> ExitCode {
    println!("{}", screen.render());
    println!("{}", Notification::error(err.to_string()));
    ExitCode::FAILURE
}

/// Print a screen and its pending notification.
fn present(screen: &mut dyn Screen) -> ExitCode {
    print!("{}", screen.render());
    match screen.take_notification() {
        Some(notice) => {
            println!("\n{notice}");
            if notice.is_error() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        }
        None => ExitCode::SUCCESS,
    }
}
