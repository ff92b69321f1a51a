use clap::{Parser, Subcommand};
use quire::snapshot::{ContentSnapshot, Library};
use quire::{config, output, render};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flag for commands that can target the curated root.
#[derive(clap::Args, Clone)]
struct RootArgs {
    /// Use the curated root instead of the main article root
    #[arg(long)]
    curated: bool,
}

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Load, render and index a directory of markdown articles")]
#[command(long_about = "\
Load, render and index a directory of markdown articles

Every subdirectory holding a meta.yaml is one article. The directory name
is the article's slug.

Content structure:

  posts/
  ├── hello-world/
  │   ├── meta.yaml     # title, date (YYYY-MM-DD), categories, description
  │   └── post.md       # markdown body
  ├── about/            # listed in quire.toml `unlisted` = hidden from the feed
  │   ├── meta.yaml
  │   └── post.md
  └── assets/           # no meta.yaml = not an article, skipped

Any article that fails to load fails the whole run.

Run 'quire gen-config' to generate a documented quire.toml.")]
#[command(version)]
struct Cli {
    /// Config file; relative content roots resolve against its directory
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every configured root and print the content inventory
    Check,
    /// Print the feed, newest first, without unlisted articles
    List(RootArgs),
    /// Print every category with its articles, oldest first
    Categories(RootArgs),
    /// Print the rendered body of one article
    Show {
        slug: String,
        #[command(flatten)]
        root: RootArgs,
    },
    /// Render a markdown file to HTML on stdout
    Render { file: PathBuf },
    /// Write a JSON snapshot of a content root
    Export {
        #[command(flatten)]
        root: RootArgs,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock quire.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
        Command::Render { file } => {
            let markdown = std::fs::read(&file)?;
            print!("{}", render::render_bytes(&markdown));
            Ok(())
        }
        command => run(command, &cli.config),
    }
}

fn run(command: Command, config_path: &Path) -> Result<(), Box<dyn Error>> {
    let site_config = config::load_config(config_path)?;
    init_thread_pool(&site_config.processing);
    let parallel = config::effective_threads(&site_config.processing) > 1;
    let library = Library::load(&site_config, config::base_dir(config_path), parallel)?;

    match command {
        Command::Check => {
            output::print_check(&library);
            println!("==> Content is valid");
        }
        Command::List(root) => {
            let snapshot = select(&library, &root)?;
            let listed: Vec<_> = snapshot.listed().collect();
            output::print_listing(&listed);
        }
        Command::Categories(root) => {
            output::print_categories(select(&library, &root)?);
        }
        Command::Show { slug, root } => {
            let article = select(&library, &root)?
                .article(&slug)
                .ok_or_else(|| format!("no article with slug '{slug}'"))?;
            print!("{}", article.body);
        }
        Command::Export { root, output: target } => {
            let json = serde_json::to_string_pretty(&select(&library, &root)?.export())?;
            match target {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{}", json),
            }
        }
        Command::Render { .. } | Command::GenConfig => {}
    }

    Ok(())
}

fn select<'a>(library: &'a Library, root: &RootArgs) -> Result<&'a ContentSnapshot, Box<dyn Error>> {
    if root.curated {
        library
            .curated
            .as_ref()
            .ok_or_else(|| "no curated root configured (set content.curated)".into())
    } else {
        Ok(&library.articles)
    }
}

/// `RUST_LOG` wins; otherwise `--quiet` → warn, `--verbose` → debug, default info.
fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
