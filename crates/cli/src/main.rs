//! Bookshelf CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Create or update the database schema
//! bookshelf migrate
//!
//! # Insert a few sample authors and books into an empty catalog
//! bookshelf seed
//!
//! # Add an author
//! bookshelf author add --name "Jane Doe" --birth-date 1970-01-01
//!
//! # Add a book (looks up ISBN and cover)
//! bookshelf book add --title "Example Title" --author-id 1
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about = "Bookshelf CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed an empty database with sample authors and books
    Seed,
    /// Manage authors
    Author {
        #[command(subcommand)]
        action: AuthorAction,
    },
    /// Manage books
    Book {
        #[command(subcommand)]
        action: BookAction,
    },
}

#[derive(Subcommand)]
enum AuthorAction {
    /// Add a new author
    Add {
        /// Author name
        #[arg(short, long)]
        name: String,

        /// Birth date (YYYY-MM-DD)
        #[arg(short, long)]
        birth_date: String,

        /// Date of death (YYYY-MM-DD)
        #[arg(short, long)]
        date_of_death: Option<String>,
    },
}

#[derive(Subcommand)]
enum BookAction {
    /// Add a new book
    Add {
        /// Book title
        #[arg(short, long)]
        title: String,

        /// Owning author ID
        #[arg(short, long)]
        author_id: i64,

        /// Publication date (YYYY-MM-DD)
        #[arg(short, long)]
        publication_date: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Author { action } => match action {
            AuthorAction::Add {
                name,
                birth_date,
                date_of_death,
            } => commands::catalog::add_author(&name, &birth_date, date_of_death.as_deref()).await?,
        },
        Commands::Book { action } => match action {
            BookAction::Add {
                title,
                author_id,
                publication_date,
            } => {
                commands::catalog::add_book(&title, author_id, publication_date.as_deref()).await?;
            }
        },
    }
    Ok(())
}
