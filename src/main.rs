use clap::{Parser, Subcommand};
use std::path::PathBuf;
use travel_book::config;
use travel_book::generate::{self, Mode};
use travel_book::logging::{self, Verbosity};
use travel_book::output;
use travel_book::qr::PngQrProvider;

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

/// Input and output files of a render command.
#[derive(clap::Args, Clone)]
struct RenderArgs {
    /// Request file: {"travels": [...], "settings": {...}, "layout": {...}}
    #[arg(long, short, default_value = "request.json")]
    input: PathBuf,

    /// Where to write the HTML document
    #[arg(long, short, default_value = "book.html")]
    output: PathBuf,
}

#[derive(Parser)]
#[command(name = "travel-book")]
#[command(about = "Print-ready HTML travel books from travel records")]
#[command(long_about = "\
Print-ready HTML travel books from travel records

Reads a JSON request with the travels to export and the user's book settings,
and writes one self-contained HTML document ready for a browser's print step.

Two renderers:

  book      Fixed template: title page, table of contents, then one
            two-column page per travel with gallery and route map.
  layout    User-defined block layout (cover, toc, photo, description,
            recommendation, plus, minus, gallery, map, qr, spacer).

Travels with a slug or url get a QR code linking to their online version.

Run 'travel-book gen-config' to generate a documented book.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Generator config; stock defaults when the file doesn't exist
    #[arg(long, default_value = "book.toml", global = true)]
    config: PathBuf,

    /// More diagnostics (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Errors only
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the fixed book template
    Book(RenderArgs),
    /// Render a custom block layout
    Layout {
        #[command(flatten)]
        render: RenderArgs,

        /// Layout file, replacing the request's "layout"
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Validate a request and list what would be rendered
    Check {
        /// Request file
        #[arg(long, short, default_value = "request.json")]
        input: PathBuf,

        /// Layout file to validate along with the request
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Print a stock book.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    match cli.command {
        Command::Book(args) => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let provider = PngQrProvider::new(config.qr.clone());
            let rendered = generate::generate_file(
                Mode::Book,
                &args.input,
                None,
                &args.output,
                &provider,
                &config,
            )?;
            if !cli.quiet {
                output::print_render_output(&rendered, &args.output);
            }
        }
        Command::Layout { render, layout } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let provider = PngQrProvider::new(config.qr.clone());
            let rendered = generate::generate_file(
                Mode::Layout,
                &render.input,
                layout.as_deref(),
                &render.output,
                &provider,
                &config,
            )?;
            if !cli.quiet {
                output::print_render_output(&rendered, &render.output);
            }
        }
        Command::Check { input, layout } => {
            let config = config::load_config(&cli.config)?;
            let request = generate::load_request(&input)?;
            let layout = match layout {
                Some(path) => Some(generate::load_layout(&path)?),
                None => request.layout.clone(),
            };
            output::print_check_output(&request, layout.as_ref(), &config.site);
            println!("==> Request is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
