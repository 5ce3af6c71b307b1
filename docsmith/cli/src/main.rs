//! docsmith - maintenance tooling for the API documentation site.
//!
//! ## Usage
//!
//! ```bash
//! # Clone the inference endpoint job resource for a new endpoint
//! docsmith add-endpoint endpoints/whisper.json
//! docsmith create-endpoint-spec endpoints/whisper.json
//!
//! # Spec fix-ups
//! docsmith add-header api-specs/imds.yaml
//! docsmith add-security api-specs/transcription.json
//!
//! # Site maintenance
//! docsmith move-page guides/old-name guides/new-name --update-links
//! docsmith redirects resolve --check
//! ```

mod output;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use color_eyre::eyre::{WrapErr, bail};
use docsmith_lib::analytics::DEFAULT_PORTAL_ID;
use docsmith_lib::{
    EndpointConfig, HeaderParameter, LoaderScript, SiteConfig, add_endpoint_to_spec,
    add_header_to_file, add_security_to_file, check_pages, check_redirect_chains,
    create_endpoint_spec, dedupe_redirects, find_base_spec, move_page, prune_navigation,
    resolve_redirect_chains, update_links,
};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maintenance tooling for an API documentation site
#[derive(Parser)]
#[command(name = "docsmith", version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to stderr as JSON
    #[arg(long = "log-json", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add an inference endpoint's job resource to its base spec, in place
    AddEndpoint {
        /// Endpoint config (JSON or YAML)
        #[arg(value_name = "CONFIG", value_hint = ValueHint::FilePath)]
        config: PathBuf,
    },

    /// Write a standalone spec for an inference endpoint next to its base spec
    CreateEndpointSpec {
        /// Endpoint config (JSON or YAML)
        #[arg(value_name = "CONFIG", value_hint = ValueHint::FilePath)]
        config: PathBuf,
    },

    /// Add a required header parameter to every operation of a spec
    AddHeader {
        /// Spec to read
        #[arg(value_name = "INPUT", value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Where to write the result [default: INPUT]
        #[arg(value_name = "OUTPUT", value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Header name [default: Metadata]
        #[arg(long)]
        name: Option<String>,

        /// The header's single allowed value [default: true]
        #[arg(long)]
        value: Option<String>,

        /// Parameter description
        #[arg(long)]
        description: Option<String>,
    },

    /// Copy the base spec's security scheme into another spec
    AddSecurity {
        /// Spec to update
        #[arg(value_name = "TARGET", value_hint = ValueHint::FilePath)]
        target: PathBuf,

        /// Base spec to copy from [default: <SPEC_DIR>/<BASE_NAME>.*]
        #[arg(long, env = "DOCSMITH_BASE_SPEC", value_hint = ValueHint::FilePath)]
        base: Option<PathBuf>,

        /// Directory searched for the base spec
        #[arg(long, env = "DOCSMITH_API_SPEC_DIR", default_value = "api-specs")]
        spec_dir: PathBuf,

        /// File stem of the base spec
        #[arg(long, env = "DOCSMITH_BASE_SPEC_NAME", default_value = "salad-cloud")]
        base_name: String,
    },

    /// Move a page, redirecting its old path and updating the navigation
    MovePage {
        /// Current page path, relative to the site root (`.mdx` optional)
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// New page path, relative to the site root (`.mdx` optional)
        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,

        /// Also rewrite links in page bodies that point at redirected paths
        #[arg(long)]
        update_links: bool,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Redirect list maintenance
    #[command(subcommand)]
    Redirects(RedirectsCommand),

    /// Navigation maintenance
    #[command(subcommand)]
    Nav(NavCommand),

    /// Rewrite links in page bodies that point at redirected paths
    UpdateLinks {
        #[command(flatten)]
        site: SiteArgs,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Report navigation entries without a page and pages missing from the navigation
    CheckPages {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Print the analytics loader tag
    AnalyticsTag {
        /// HubSpot portal id
        #[arg(long, default_value = DEFAULT_PORTAL_ID)]
        portal: String,
    },
}

#[derive(Subcommand)]
enum RedirectsCommand {
    /// Point every redirect at the end of its chain
    Resolve {
        #[command(flatten)]
        site: SiteArgs,

        /// Report what would change without writing
        #[arg(long, conflicts_with = "check")]
        dry_run: bool,

        /// Only report remaining chains; fails when any exist
        #[arg(long)]
        check: bool,
    },

    /// Keep only the last redirect for each source
    Dedupe {
        #[command(flatten)]
        site: SiteArgs,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum NavCommand {
    /// Remove empty groups and tabs
    Prune {
        #[command(flatten)]
        site: SiteArgs,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct SiteArgs {
    /// Site config [default: docs.json or mint.json in the root]
    #[arg(long, env = "DOCSMITH_SITE_CONFIG", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Site root holding the page files
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
    root: PathBuf,
}

impl SiteArgs {
    fn root(&self) -> color_eyre::Result<PathBuf> {
        std::path::absolute(&self.root)
            .wrap_err_with(|| format!("invalid site root {}", self.root.display()))
    }

    fn config_path(&self, root: &Path) -> color_eyre::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(SiteConfig::discover(root)?),
        }
    }
}

const AFTER_HELP: &str = "\
ENVIRONMENT:
  DOCSMITH_SITE_CONFIG      Site config used when --config is absent
  DOCSMITH_BASE_SPEC        Base spec for add-security
  DOCSMITH_API_SPEC_DIR     Directory searched for the base spec (api-specs)
  DOCSMITH_BASE_SPEC_NAME   File stem of the base spec (salad-cloud)
  RUST_LOG                  Log filter, overrides -v

  Variables may also be set in a .env file in the working directory.

EXAMPLES:
  docsmith add-endpoint endpoints/whisper.json
  docsmith add-header api-specs/imds.yaml --dry-run
  docsmith add-security api-specs/transcription.json
  docsmith move-page guides/old guides/new
  docsmith redirects resolve --check
  docsmith update-links --dry-run
  docsmith nav prune --dry-run
";

/// Initializes the tracing subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,docsmith_lib=info,docsmith=info".to_string(),
            2 => "info,docsmith_lib=debug,docsmith=debug".to_string(),
            _ => "debug,docsmith_lib=trace,docsmith=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    // Usage errors exit 1; help and version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_tracing(cli.verbose, cli.log_json);

    run(cli.command)
}

fn run(command: Command) -> color_eyre::Result<()> {
    match command {
        Command::AddEndpoint { config } => {
            let config = EndpointConfig::load(&config, &std::env::current_dir()?)?;
            if let Some(doc_path) = &config.api_doc_path {
                tracing::info!("api doc path: {}", doc_path.display());
            }
            let report = add_endpoint_to_spec(&config)?;
            output::print_splice(&config.identity, &config.base_schema, &report);
        }

        Command::CreateEndpointSpec { config } => {
            let config = EndpointConfig::load(&config, &std::env::current_dir()?)?;
            let (path, report) = create_endpoint_spec(&config)?;
            output::print_splice(&config.identity, &path, &report);
        }

        Command::AddHeader {
            input,
            output: output_path,
            dry_run,
            name,
            value,
            description,
        } => {
            let mut header = match (name, value) {
                (None, None) => HeaderParameter::default(),
                (name, value) => HeaderParameter::new(
                    name.unwrap_or_else(|| "Metadata".to_string()),
                    value.unwrap_or_else(|| "true".to_string()),
                ),
            };
            if let Some(description) = description {
                header = header.with_description(description);
            }
            let report = add_header_to_file(&input, output_path.as_deref(), &header, dry_run)?;
            output::print_header(&header, &report, dry_run);
        }

        Command::AddSecurity {
            target,
            base,
            spec_dir,
            base_name,
        } => {
            let base = match base {
                Some(base) => base,
                None => find_base_spec(&spec_dir, &base_name)?,
            };
            let scheme = add_security_to_file(&target, &base)?;
            output::print_security(&scheme, &target);
        }

        Command::MovePage {
            source,
            destination,
            update_links: rewrite_links,
            site,
        } => {
            let root = site.root()?;
            let config = site.config_path(&root)?;
            let report = move_page(&root, &source, &destination, &config)?;
            output::print_move(&report);
            if rewrite_links {
                let links = update_links(&root, &SiteConfig::load(&config)?, false)?;
                output::print_links(&links, false);
            }
        }

        Command::UpdateLinks { site, dry_run } => {
            let root = site.root()?;
            let config = SiteConfig::load(&site.config_path(&root)?)?;
            let report = update_links(&root, &config, dry_run)?;
            output::print_links(&report, dry_run);
        }

        Command::Redirects(RedirectsCommand::Resolve {
            site,
            dry_run,
            check,
        }) => {
            let config = site.config_path(&site.root()?)?;
            if check {
                let chains = check_redirect_chains(&config)?;
                output::print_chains(&chains);
                if !chains.is_empty() {
                    bail!("{} redirect chain(s) remain", chains.len());
                }
            } else {
                let report = resolve_redirect_chains(&config, dry_run)?;
                output::print_resolve(&report, dry_run);
            }
        }

        Command::Redirects(RedirectsCommand::Dedupe { site, dry_run }) => {
            let config = site.config_path(&site.root()?)?;
            let report = dedupe_redirects(&config, dry_run)?;
            output::print_dedupe(&report, dry_run);
        }

        Command::Nav(NavCommand::Prune { site, dry_run }) => {
            let config = site.config_path(&site.root()?)?;
            let removed = prune_navigation(&config, dry_run)?;
            output::print_prune(removed, dry_run);
        }

        Command::CheckPages { site } => {
            let root = site.root()?;
            let config = SiteConfig::load(&site.config_path(&root)?)?;
            let check = check_pages(&root, &config)?;
            output::print_page_check(&check);
            if !check.is_clean() {
                bail!(
                    "{} missing page(s), {} orphaned page(s)",
                    check.missing.len(),
                    check.orphaned.len()
                );
            }
        }

        Command::AnalyticsTag { portal } => {
            println!("{}", LoaderScript::new(portal).to_html());
        }
    }

    Ok(())
}
