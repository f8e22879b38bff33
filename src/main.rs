//! Libdesk - command-line front end for the school library backend.

mod cli;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libdesk::{
    config::{AppConfig, LoggingConfig},
    models::{BookType, RequestStatus, SearchForm},
    services::{
        catalog::{CatalogCriteria, CatalogView},
        dispatcher::{ActionOutcome, DeskAction, RequestDispatcher},
        editor::BookEditor,
        requests::{RequestCriteria, RequestsView},
        search::SearchOverlay,
        Confirm,
    },
    ApiClient, LibraryApi,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog
    Books {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long = "type")]
        book_type: Option<BookType>,
        #[arg(long)]
        strand: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        level: Option<String>,
    },
    /// Show one book
    Book { id: i64 },
    /// List borrow requests
    Requests {
        #[arg(short, long, default_value = "")]
        search: String,
        /// pending, approved, rejected, toReturn or returned
        #[arg(long)]
        status: Option<String>,
    },
    /// Approve a pending request
    Approve { id: i64 },
    /// Reject a pending request
    Reject { id: i64 },
    /// Mark a borrowed book as returned
    Return { id: i64 },
    /// Move overdue approved requests to "to return"
    CheckDue,
    /// Advanced search
    Search {
        query: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        author: String,
        #[arg(long, default_value = "")]
        year: String,
        #[arg(long)]
        exact: bool,
        #[arg(long)]
        description: bool,
        #[arg(long)]
        available: bool,
    },
    /// Edit a book's details
    EditBook {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type")]
        book_type: Option<BookType>,
        #[arg(long)]
        quantity: Option<u32>,
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        strand: Option<String>,
        #[arg(long)]
        qtr: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        publisher: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    /// Check backend health
    Health,
    /// End the current session
    Logout,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libdesk={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    tracing::debug!("Libdesk v{} using {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let client = ApiClient::new(&config.api)?;
    let endpoints = client.endpoints().clone();
    let confirm = cli::prompt_confirm(args.yes);

    match args.command {
        Command::Books { search, book_type, strand, genre, level } => {
            let mut view = CatalogView::new(endpoints);
            if view.load(&client).await.is_ok() {
                view.apply(CatalogCriteria {
                    text: search,
                    book_type,
                    strand: non_empty(strand),
                    genre: non_empty(genre),
                    level: non_empty(level),
                });
            }
            cli::print_catalog(&view.render());
        }
        Command::Book { id } => {
            let mut view = CatalogView::new(endpoints);
            // The cached catalog is the fallback when the detail call fails
            if let Err(e) = view.load(&client).await {
                tracing::debug!("Catalog unavailable for detail fallback: {}", e);
            }
            let book = view.details(&client, id).await?;
            cli::print_book(&book, client.endpoints());
        }
        Command::Requests { search, status } => {
            let mut view = RequestsView::new(endpoints);
            if view.load(&client).await.is_err() {
                cli::print_error(RequestsView::load_failure_message());
            }
            view.apply(RequestCriteria {
                text: search,
                status: non_empty(status).map(RequestStatus::from),
            });
            cli::print_requests(&view.render());
        }
        Command::Approve { id } => run_action(&client, &confirm, endpoints, DeskAction::Approve(id)).await,
        Command::Reject { id } => run_action(&client, &confirm, endpoints, DeskAction::Reject(id)).await,
        Command::Return { id } => run_action(&client, &confirm, endpoints, DeskAction::Return(id)).await,
        Command::CheckDue => run_action(&client, &confirm, endpoints, DeskAction::CheckDue).await,
        Command::Search { query, category, author, year, exact, description, available } => {
            let overlay = SearchOverlay::new(Arc::new(client));
            overlay.check_backend_health().await;
            let form = SearchForm {
                query,
                category,
                author,
                year,
                exact_match: exact,
                include_description: description,
                available_only: available,
            };
            overlay.submit(&form).await;
            cli::print_search(&overlay.view().await);
        }
        Command::EditBook {
            id,
            title,
            book_type,
            quantity,
            level,
            strand,
            qtr,
            genre,
            author,
            publisher,
            description,
            link,
        } => {
            let editor = BookEditor::new(&client);
            let mut form = match editor.open(id).await {
                Ok(form) => form,
                Err(notice) => {
                    cli::print_notice(&notice);
                    return Ok(());
                }
            };

            if let Some(book_type) = book_type {
                form.set_book_type(book_type);
            }
            let fields = [
                (&mut form.title, title),
                (&mut form.level, level),
                (&mut form.strand, strand),
                (&mut form.qtr, qtr),
                (&mut form.genre, genre),
                (&mut form.author, author),
                (&mut form.publisher, publisher),
                (&mut form.description, description),
                (&mut form.link, link),
            ];
            for (slot, value) in fields {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            if let Some(quantity) = quantity {
                form.quantity = quantity;
            }

            let mut catalog = CatalogView::new(endpoints);
            match editor.submit(&form, &mut catalog).await {
                Ok(notice) | Err(notice) => cli::print_notice(&notice),
            }
        }
        Command::Health => {
            let health = client.health().await?;
            cli::print_health(&health);
        }
        Command::Logout => {
            client.logout().await?;
            println!("Logged out");
        }
    }

    Ok(())
}

async fn run_action(
    client: &ApiClient,
    confirm: &dyn Confirm,
    endpoints: libdesk::Endpoints,
    action: DeskAction,
) {
    let mut view = RequestsView::new(endpoints);
    let dispatcher = RequestDispatcher::new(client, confirm);

    match dispatcher.dispatch(action, &mut view).await {
        ActionOutcome::Cancelled => println!("Cancelled"),
        ActionOutcome::Failed(notice) => cli::print_notice(&notice),
        ActionOutcome::Applied { notice, reload_error } => {
            cli::print_notice(&notice);
            match reload_error {
                Some(err) => cli::print_notice(&err),
                None => cli::print_requests(&view.render()),
            }
        }
    }
}
