//! graph-cli: Graph gateway demo binary
//!
//! One-shot commands against the Graph API using the graph-client facade.
//!
//! Usage:
//!   graph-cli profile
//!   graph-cli groups
//!   graph-cli pages
//!   graph-cli publish <target-id> <message> [--link URL] [--tag ID]... [--place ID]
//!
//! The access token is read from GRAPH_ACCESS_TOKEN; when it does not
//! validate, the login URL is printed instead.

use graph_client::{GraphConfig, GraphSession, Link, Post, Profile};
use tracing_subscriber::EnvFilter;

/// Parsed command line
enum Command {
    /// Show the authenticated user's profile
    Profile,
    /// List the user's groups
    Groups,
    /// List the pages the user manages
    Pages,
    /// Publish a post to a feed
    Publish {
        target_id: String,
        message: String,
        link: Option<String>,
        tags: Vec<String>,
        place: Option<String>,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = match parse_args() {
        Some(command) => command,
        None => {
            print_help();
            std::process::exit(1);
        }
    };

    match command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("graph-cli {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration and open the session
    let config = GraphConfig::load().map_err(|e| anyhow::anyhow!("config error: {}", e))?;
    let session = GraphSession::new(config)
        .map_err(|e| anyhow::anyhow!("failed to create Graph session: {}", e))?;

    // Validate the caller's token; fall back to the login flow
    let token = std::env::var("GRAPH_ACCESS_TOKEN").unwrap_or_default();
    if !session.validate(&token).await {
        eprintln!("access token missing or rejected; log in at:");
        eprintln!("{}", session.login_url()?);
        std::process::exit(2);
    }

    match command {
        Command::Profile => {
            let profile = session.get_profile().await?;
            println!("id:     {}", profile.id());
            println!("name:   {}", profile.name().unwrap_or("-"));
            println!("link:   {}", profile.link().unwrap_or("-"));
            println!("locale: {}", profile.locale().unwrap_or("-"));
        }
        Command::Groups => {
            let profile = session.get_profile().await?;
            let groups = session.get_groups(&profile).await?;
            for group in &groups {
                let marker = if group.is_admin() { " (admin)" } else { "" };
                println!("{}  {}{}", group.id(), group.name().unwrap_or("-"), marker);
            }
            println!("{} group(s)", groups.len());
        }
        Command::Pages => {
            let profile = session.get_profile().await?;
            let pages = session.get_pages(&profile).await?;
            for page in &pages {
                println!(
                    "{}  {} [{}]",
                    page.id(),
                    page.name().unwrap_or("-"),
                    page.category().unwrap_or("-"),
                );
            }
            println!("{} page(s)", pages.len());
        }
        Command::Publish {
            target_id,
            message,
            link,
            tags,
            place,
        } => {
            let mut post = Post::new(message);
            if let Some(url) = link {
                post.set_link(Link::new(url));
            }
            for tag in tags {
                post.add_tag_id(tag);
            }
            if let Some(place) = place {
                post.set_place(place);
            }

            let target = Profile::new(target_id);
            let post = session.publish(&target, post, None).await?;
            println!("published: {}", post.id().unwrap_or("-"));
        }
        Command::Help | Command::Version => unreachable!(),
    }

    Ok(())
}

/// Parse command line arguments; `None` means a usage error.
fn parse_args() -> Option<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(command) = args.first() else {
        return Some(Command::Help);
    };

    match command.as_str() {
        "--help" | "-h" | "help" => Some(Command::Help),
        "--version" | "-v" => Some(Command::Version),
        "profile" => Some(Command::Profile),
        "groups" => Some(Command::Groups),
        "pages" => Some(Command::Pages),
        "publish" => parse_publish(&args[1..]),
        _ => None,
    }
}

/// Parse `publish <target-id> <message> [--link URL] [--tag ID]... [--place ID]`
fn parse_publish(args: &[String]) -> Option<Command> {
    let mut positional = Vec::new();
    let mut link = None;
    let mut tags = Vec::new();
    let mut place = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--link" => link = Some(iter.next()?.clone()),
            "--tag" => tags.push(iter.next()?.clone()),
            "--place" => place = Some(iter.next()?.clone()),
            _ => positional.push(arg.clone()),
        }
    }

    if positional.len() != 2 {
        return None;
    }

    Some(Command::Publish {
        target_id: positional[0].clone(),
        message: positional[1].clone(),
        link,
        tags,
        place,
    })
}

/// Print help message
fn print_help() {
    println!("graph-cli - Graph API demo client");
    println!();
    println!("USAGE:");
    println!("  graph-cli profile");
    println!("  graph-cli groups");
    println!("  graph-cli pages");
    println!("  graph-cli publish <target-id> <message> [--link URL] [--tag ID]... [--place ID]");
    println!();
    println!("ENVIRONMENT:");
    println!("  GRAPH_APP_ID / GRAPH_APP_SECRET / GRAPH_REDIRECT_URL / GRAPH_SCOPE");
    println!("  GRAPH_ACCESS_TOKEN   user access token to validate");
    println!();
    println!("Configuration may also come from ./graph-gateway.toml.");
}
