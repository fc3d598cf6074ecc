//! blogfront CLI
//!
//! Terminal front end: listings, articles, live refresh, share links and
//! the admin desk.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use blogfront::{
    error::{AppError, Result},
    models::{Config, SortOrder},
    pipeline::{AdminCredentials, AdminDesk, BlogController, Listing, NewPost, Poller},
    services::{
        ContentFetcher, FetchOutcome, GeminiAssistant, PostAssistant,
        share::{NoShareSheet, StdoutClipboard, share_post},
    },
    storage::{LocalStore, PostRepository},
};
use clap::{Parser, Subcommand};

/// blogfront - blog reader and admin desk
#[derive(Parser, Debug)]
#[command(name = "blogfront", version, about = "Blog front end and admin desk")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Display language (defaults to locale.default_language)
    #[arg(short, long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a page of posts
    List {
        /// Search query
        #[arg(short, long, default_value = "")]
        query: String,

        /// newest or oldest
        #[arg(short, long, default_value = "newest")]
        sort: SortOrder,

        /// 1-indexed page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Show one article
    Show { id: String },

    /// Keep the listing fresh by polling the content source
    Watch,

    /// Share an article link
    Share { id: String },

    /// Validate the configuration file
    Validate,

    /// Manage local posts (requires login)
    Admin {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        password: String,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// List local posts
    List,
    /// Create a post by hand
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Markdown file with the body
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Edit an existing post; omitted fields keep their value
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Markdown file with the new body
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        read_time: Option<u32>,
    },
    /// Draft a post from a topic with the writing assistant
    Draft { topic: String },
    /// Translate a post into every missing language
    Translate { id: String },
    /// Delete a post
    Delete { id: String },
    /// Select the working language
    Language { code: String },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_listing(listing: &Listing) {
    let messages = &listing.messages;
    if let Some(updated) = listing.last_updated {
        println!(
            "{}",
            messages
                .last_updated
                .replace("{time}", &updated.format("%Y-%m-%d %H:%M:%S").to_string())
        );
    }
    if listing.searching {
        println!(
            "{}",
            messages
                .search_results
                .replace("{count}", &listing.total_items.to_string())
        );
    }
    if listing.is_empty() {
        println!("{}", messages.no_results);
        return;
    }

    for card in &listing.cards {
        println!();
        println!("[{}] {}", card.id, card.title);
        println!(
            "    {} · {} · {}",
            card.author,
            card.publication_date,
            messages
                .min_read
                .replace("{minutes}", &card.read_time_minutes.to_string())
        );
        match (&card.matched_field, &card.snippet) {
            (_, Some(snippet)) => println!("    {snippet}"),
            (Some(field), None) => println!("    ({field}) {}", card.description),
            (None, None) => println!("    {}", card.description),
        }
    }
    println!();
    println!(
        "{}",
        messages
            .page_of
            .replace("{page}", &listing.page.to_string())
            .replace("{total}", &listing.total_pages.to_string())
    );
    match (listing.has_previous, listing.has_next) {
        (true, true) => println!("<- --page {}  |  --page {} ->", listing.page - 1, listing.page + 1),
        (true, false) => println!("<- --page {}", listing.page - 1),
        (false, true) => println!("--page {} ->", listing.page + 1),
        (false, false) => {}
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(cli.verbose, &config.logging.level);

    match load_error {
        None => log::debug!("Loaded configuration from {}", cli.config.display()),
        Some(e) => log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        ),
    }

    let language = cli
        .lang
        .clone()
        .unwrap_or_else(|| config.locale.default_language.clone());

    match cli.command {
        Command::List { query, sort, page } => {
            let fetcher = ContentFetcher::new(&config)?;
            if let FetchOutcome::Failed { reason } = fetcher.fetch(false).await {
                log::error!("Could not load posts: {}", reason);
            }

            let mut controller = BlogController::new(&config, fetcher.feed().clone());
            controller.select_language(&language)?;
            let state = controller.state_mut();
            state.set_query(query);
            state.set_order(sort);
            state.set_page(page);

            print_listing(&controller.listing().await);
        }

        Command::Show { id } => {
            let fetcher = ContentFetcher::new(&config)?;
            fetcher.fetch(false).await;

            let mut controller = BlogController::new(&config, fetcher.feed().clone());
            controller.select_language(&language)?;
            let article = controller.article(&id).await?;

            println!("{}", article.title);
            println!(
                "{} · {} · {}",
                article.author,
                article.publication_date,
                controller
                    .messages()
                    .min_read
                    .replace("{minutes}", &article.read_time_minutes.to_string())
            );
            if let Some(image) = &article.image_url {
                println!("{image}");
            }
            println!();
            println!("{}", article.content);
            println!();
            println!("{}", article.share_url);
        }

        Command::Watch => {
            let fetcher = Arc::new(ContentFetcher::new(&config)?);
            let mut controller = BlogController::new(&config, fetcher.feed().clone());
            controller.select_language(&language)?;

            let interval = Duration::from_secs(config.feed.poll_interval_secs);
            let handle = Poller::new(Arc::clone(&fetcher), interval).start();
            let mut outcomes = handle.outcomes();

            log::info!(
                "Watching {} every {}s (Ctrl-C to stop)",
                fetcher.source_url(),
                config.feed.poll_interval_secs
            );
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    changed = outcomes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let updated = matches!(
                            *outcomes.borrow_and_update(),
                            Some(FetchOutcome::Updated { .. })
                        );
                        if updated {
                            print_listing(&controller.listing().await);
                        }
                    }
                }
            }
            handle.stop().await;
        }

        Command::Share { id } => {
            let fetcher = ContentFetcher::new(&config)?;
            fetcher.fetch(false).await;

            let mut controller = BlogController::new(&config, fetcher.feed().clone());
            controller.select_language(&language)?;
            let article = controller.article(&id).await?;

            let outcome = share_post(
                &NoShareSheet,
                &StdoutClipboard,
                &article.title,
                &article.share_url,
                &controller.messages().link_copied,
            );
            log::info!("Share outcome: {:?}", outcome);
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = Config::load(&cli.config).and_then(|c| c.validate()) {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }

        Command::Admin {
            user,
            password,
            command,
        } => {
            let session = AdminCredentials::from_config(&config.admin).login(&user, &password)?;

            let api_key = config.ai.api_key().unwrap_or_else(|e| {
                log::warn!("{e}; the writing assistant will be unavailable");
                String::new()
            });
            let assistant: Arc<dyn PostAssistant> = Arc::new(GeminiAssistant::new(
                config.ai.endpoint.clone(),
                config.ai.model.clone(),
                api_key,
            ));
            let repo = PostRepository::new(Arc::new(LocalStore::new(&config.admin.storage_dir)));
            let mut desk = AdminDesk::open(session, &config, repo, assistant).await?;

            match command {
                AdminCommand::List => {
                    for post in desk.posts() {
                        let languages: Vec<&str> =
                            post.translations.keys().map(String::as_str).collect();
                        println!(
                            "[{}] {} ({}) {}",
                            post.id,
                            post.title,
                            post.publication_date,
                            languages.join(",")
                        );
                    }
                    log::info!("{} posts, language {}", desk.posts().len(), desk.language());
                }
                AdminCommand::Create {
                    title,
                    description,
                    content_file,
                    author,
                    image_url,
                } => {
                    let content = match content_file {
                        Some(path) => tokio::fs::read_to_string(&path).await?,
                        None => String::new(),
                    };
                    let post = desk
                        .create_post(NewPost {
                            title,
                            description,
                            content,
                            author,
                            image_url,
                        })
                        .await?;
                    println!("{}", post.id);
                }
                AdminCommand::Draft { topic } => {
                    let post = desk.draft_post(&topic).await.map_err(|e| {
                        log::error!("Draft generation failed: {}", e);
                        e
                    })?;
                    println!("[{}] {}", post.id, post.title);
                }
                AdminCommand::Translate { id } => match desk.translate_post(&id).await {
                    Ok(report) => log::info!(
                        "Added translations: [{}], already present: [{}]",
                        report.added.join(", "),
                        report.skipped.join(", ")
                    ),
                    Err(e @ AppError::Translation { .. }) => {
                        log::error!("Translation failed: {}", e);
                        return Err(e);
                    }
                    Err(e) => return Err(e),
                },
                AdminCommand::Update {
                    id,
                    title,
                    description,
                    content_file,
                    author,
                    image_url,
                    read_time,
                } => {
                    let mut post = desk.get(&id).cloned().ok_or_else(|| AppError::not_found(&id))?;
                    if let Some(title) = title {
                        post.title = title;
                    }
                    if let Some(description) = description {
                        post.description = description;
                    }
                    if let Some(path) = content_file {
                        post.content = tokio::fs::read_to_string(&path).await?;
                    }
                    if let Some(author) = author {
                        post.author = author;
                    }
                    if let Some(url) = image_url {
                        post.image_url = Some(url).filter(|u| !u.trim().is_empty());
                    }
                    if let Some(minutes) = read_time {
                        post.read_time_minutes = minutes;
                    }
                    desk.update_post(post).await?;
                    log::info!("Updated post {}", id);
                }
                AdminCommand::Delete { id } => {
                    let removed = desk.delete_post(&id).await?;
                    log::info!("Deleted '{}'", removed.title);
                }
                AdminCommand::Language { code } => {
                    desk.set_language(&code).await?;
                    log::info!("Language set to {}", code);
                }
            }
        }
    }

    Ok(())
}
