//! Form Collections CLI
//!
//! Usage:
//!   form-collections [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>         Configuration file (TOML format)
//!   -s, --selector <SELECTOR>   Selector for collection containers
//!   -m, --max-elements <N>      Maximum number of entries per collection
//!       --no-remove             Do not add remove buttons to entries
//!       --add-label <WORD>      Word shown on add buttons
//!       --remove-label <WORD>   Word shown on remove buttons
//!   -k, --click <CLICK>         Click to replay: add:<c> or remove:<c>:<e>
//!       --no-templates          Treat the host as lacking template support
//!   -v, --verbose               Log collection operations to stderr
//!   -h, --help                  Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use form_collections::{
    ClickOutcome, CollectionError, Collections, CollectionsConfig, Document, HostCapabilities,
    NodeId,
};

#[derive(Parser)]
#[command(name = "form-collections")]
#[command(about = "Add and remove repeated form entries in an HTML page")]
struct Cli {
    /// Input HTML file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Selector for collection containers
    #[arg(short, long)]
    selector: Option<String>,

    /// Maximum number of entries per collection
    #[arg(short, long)]
    max_elements: Option<usize>,

    /// Do not add remove buttons to entries
    #[arg(long)]
    no_remove: bool,

    /// Word shown on add buttons
    #[arg(long)]
    add_label: Option<String>,

    /// Word shown on remove buttons
    #[arg(long)]
    remove_label: Option<String>,

    /// Click to replay after setup, in order: `add:<collection>` or
    /// `remove:<collection>:<entry>` (zero-based positions)
    #[arg(short = 'k', long = "click", value_name = "CLICK")]
    clicks: Vec<Click>,

    /// Treat the host as lacking template support
    #[arg(long)]
    no_templates: bool,

    /// Log collection operations to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// A scripted click on a generated control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Click {
    Add { collection: usize },
    Remove { collection: usize, entry: usize },
}

impl FromStr for Click {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let number = |part: &str| {
            part.parse::<usize>()
                .map_err(|_| format!("'{}' is not a position in '{}'", part, s))
        };
        match parts.as_slice() {
            ["add", collection] => Ok(Click::Add {
                collection: number(*collection)?,
            }),
            ["remove", collection, entry] => Ok(Click::Remove {
                collection: number(*collection)?,
                entry: number(*entry)?,
            }),
            _ => Err(format!(
                "expected add:<collection> or remove:<collection>:<entry>, got '{}'",
                s
            )),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "form_collections=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Load configuration, then apply flag overrides
    let mut config = match &cli.config {
        Some(path) => match CollectionsConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => CollectionsConfig::default(),
    };
    if let Some(selector) = &cli.selector {
        config = config.with_selector(selector.as_str());
    }
    if let Some(max) = cli.max_elements {
        config = config.with_max_elements(max);
    }
    if cli.no_remove {
        config = config.with_manage_remove_entry(false);
    }
    if let Some(add) = &cli.add_label {
        config.lang.add = add.clone();
    }
    if let Some(remove) = &cli.remove_label {
        config.lang.remove = remove.clone();
    }

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let capabilities = if cli.no_templates {
        HostCapabilities::without_templates()
    } else {
        HostCapabilities::default()
    };
    let mut doc = match Document::parse_with_capabilities(&source, capabilities) {
        Ok(doc) => doc,
        Err(errors) => {
            for e in &errors {
                eprintln!("{}", e.format(&source, &filename));
            }
            std::process::exit(1);
        }
    };

    let mut collections = match Collections::init(&mut doc, config) {
        Ok(c) => c,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    for click in &cli.clicks {
        let Some(target) = resolve(&doc, &collections, *click) else {
            eprintln!("Error: no control for click {:?}", click);
            std::process::exit(1);
        };
        match collections.click(&mut doc, target) {
            Ok(ClickOutcome::Rejected(reason)) => {
                eprintln!("Warning: click {:?} rejected ({:?})", click, reason);
            }
            Ok(outcome) => info!(?click, ?outcome, "click replayed"),
            Err(e) => {
                report(&e);
                std::process::exit(1);
            }
        }
    }

    println!("{}", doc.to_html());
}

/// Find the control a scripted click refers to
fn resolve(doc: &Document, collections: &Collections, click: Click) -> Option<NodeId> {
    match click {
        Click::Add { collection } => collections
            .collections()
            .get(collection)
            .map(|c| c.add_control()),
        Click::Remove { collection, entry } => {
            let collection = collections.collections().get(collection)?;
            let entry = *collection.entries().get(entry)?;
            collection.remove_control(doc, entry)
        }
    }
}

fn report(error: &CollectionError) {
    match error {
        CollectionError::Prototype { container, source } => {
            eprintln!("Error: invalid prototype on container {}", container);
            eprintln!("{}", source.report());
        }
        other => eprintln!("Error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clicks() {
        assert_eq!("add:0".parse::<Click>(), Ok(Click::Add { collection: 0 }));
        assert_eq!(
            "remove:1:2".parse::<Click>(),
            Ok(Click::Remove {
                collection: 1,
                entry: 2
            })
        );
    }

    #[test]
    fn test_parse_bad_clicks() {
        assert!("add".parse::<Click>().is_err());
        assert!("add:x".parse::<Click>().is_err());
        assert!("remove:0".parse::<Click>().is_err());
        assert!("toggle:0".parse::<Click>().is_err());
    }

    #[test]
    fn test_cli_accepts_repeated_clicks() {
        let cli = Cli::try_parse_from([
            "form-collections",
            "page.html",
            "--click",
            "add:0",
            "-k",
            "remove:0:0",
            "--max-elements",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.clicks.len(), 2);
        assert_eq!(cli.max_elements, Some(2));
    }

    #[test]
    fn test_cli_accepts_every_listed_option() {
        let cli = Cli::try_parse_from([
            "form-collections",
            "-c",
            "collections.toml",
            "-s",
            ".items",
            "-m",
            "3",
            "--no-remove",
            "--add-label",
            "Plus",
            "--remove-label",
            "Minus",
            "-k",
            "add:0",
            "--no-templates",
            "-v",
        ])
        .unwrap();
        assert!(cli.no_remove && cli.no_templates && cli.verbose);
        assert_eq!(cli.add_label.as_deref(), Some("Plus"));
        assert_eq!(cli.remove_label.as_deref(), Some("Minus"));
        assert_eq!(cli.selector.as_deref(), Some(".items"));
    }
}
