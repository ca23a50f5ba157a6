mod storage;
mod transport;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use gallery_client::net::types::UploadFile;
use gallery_client::routes::{Navigation, Route};
use gallery_client::state::auth::AuthOutcome;
use gallery_client::state::gallery::{LoadState, UploadStatus};
use gallery_client::util::browser::upload_failure_text;
use gallery_client::{ClientConfig, ClientError, GalleryApp};
use tracing_subscriber::EnvFilter;

use crate::storage::FileStorage;
use crate::transport::ReqwestTransport;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not signed in; run `gallery-cli login` first")]
    SignedOut,
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{failed} of {total} uploads failed")]
    UploadsFailed { failed: usize, total: usize },
}

#[derive(Parser, Debug)]
#[command(name = "gallery-cli", about = "Image gallery client")]
struct Cli {
    #[arg(long, env = "GALLERY_BASE_URL", default_value = gallery_client::config::DEFAULT_API_BASE_URL)]
    base_url: String,

    #[arg(long, env = "GALLERY_SESSION_FILE", default_value = ".gallery-session.json")]
    session_file: PathBuf,

    #[arg(long, env = "GALLERY_SESSION_KEY", default_value = gallery_client::config::DEFAULT_SESSION_KEY)]
    session_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with an email or username.
    Login {
        identifier: String,
        #[arg(long, env = "GALLERY_PASSWORD")]
        password: String,
    },
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "GALLERY_PASSWORD")]
        password: String,
    },
    /// Forget the stored token.
    Logout,
    /// Show whether a token is stored.
    Status,
    /// Show where navigating to a path would land.
    Route { path: String },
    Images(ImagesCommand),
}

#[derive(Args, Debug)]
struct ImagesCommand {
    #[command(subcommand)]
    command: ImagesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ImagesSubcommand {
    /// List the gallery in server order.
    List,
    /// Upload files one at a time, in the order given.
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "command failed");
            eprintln!("{}", error_line(&error));
            ExitCode::FAILURE
        }
    }
}

/// What the user sees on stderr when a command fails.
fn error_line(error: &CliError) -> String {
    format!("error: {error}")
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig { session_key: cli.session_key, ..ClientConfig::new(&cli.base_url) };
    let transport = ReqwestTransport::new(reqwest::Client::builder().build()?);
    let app = GalleryApp::new(transport, FileStorage::new(&cli.session_file), config);

    match cli.command {
        Command::Login { identifier, password } => {
            finish_auth(app.login(&identifier, &password).await)
        }
        Command::Signup { email, username, password } => {
            finish_auth(app.signup(&email, &username, &password).await)
        }
        Command::Logout => {
            let next = app.logout();
            println!("signed out; continue at {}", next.path());
            Ok(())
        }
        Command::Status => {
            if app.session().is_authenticated() {
                println!("signed in");
            } else {
                println!("signed out");
            }
            Ok(())
        }
        Command::Route { path } => {
            match app.navigate(&path) {
                Navigation::Render(route) => println!("render {}", route.path()),
                Navigation::Redirect(route) => println!("redirect {}", route.path()),
            }
            Ok(())
        }
        Command::Images(images) => run_images(&app, images).await,
    }
}

fn finish_auth(outcome: AuthOutcome) -> Result<(), CliError> {
    match outcome {
        AuthOutcome::Authenticated { redirect } => {
            println!("signed in; continue at {}", redirect.path());
            Ok(())
        }
        AuthOutcome::Invalid(err) => Err(CliError::Client(err)),
        AuthOutcome::Rejected { message } => Err(CliError::Rejected(message)),
        AuthOutcome::Busy => Err(CliError::Rejected("another submit is in progress".to_owned())),
    }
}

async fn run_images(app: &GalleryApp<ReqwestTransport>, images: ImagesCommand) -> Result<(), CliError> {
    if let Navigation::Redirect(_) = app.navigate(Route::Images.path()) {
        return Err(CliError::SignedOut);
    }

    match images.command {
        ImagesSubcommand::List => {
            if app.refresh_gallery().await == Some(Route::Login) {
                return Err(CliError::SignedOut);
            }
            if let LoadState::LoadFailed(message) = app.gallery().state().load {
                return Err(CliError::Rejected(message));
            }
            for image in app.gallery().images() {
                println!("{}\t{}", image.id, app.gallery().image_url(&image));
            }
            Ok(())
        }
        ImagesSubcommand::Upload { files } => {
            let files = files.iter().map(|path| read_upload(path)).collect::<Result<Vec<_>, _>>()?;
            let total = files.len();
            app.gallery().set_failure_handler(|failure| eprintln!("{}", upload_failure_text(failure)));

            let (report, redirect) = app.upload(files).await;
            for result in &report.results {
                if result.status == UploadStatus::Succeeded {
                    println!("uploaded {}", result.file_name);
                }
            }
            if redirect == Some(Route::Login) {
                return Err(CliError::SignedOut);
            }
            let failed = total - report.succeeded();
            if failed > 0 {
                return Err(CliError::UploadsFailed { failed, total });
            }
            Ok(())
        }
    }
}

fn read_upload(path: &Path) -> Result<UploadFile, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::ReadFile { path: path.to_owned(), source })?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(UploadFile::new(name, content_type_for(path).map(ToOwned::to_owned), bytes))
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;
