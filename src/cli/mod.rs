pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "textmagnet")]
#[command(author = "TextMagnet Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explore precomputed relations between sentences of a medical text corpus", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Sentence table: a .csv, .json or .jsonl file, or an http(s) URL
    #[arg(short, long, global = true, env = "TEXTMAGNET_DATA")]
    pub data: Option<String>,

    /// Hide links whose distance is above this value
    #[arg(short = 'm', long, global = true, env = "TEXTMAGNET_MAX_DISTANCE")]
    pub max_distance: Option<f64>,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// List document titles
    Titles {
        /// Only show titles matching this regular expression
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Render a document as clickable markup
    Read {
        /// Document title
        title: String,

        /// Sentence id to highlight
        #[arg(long)]
        highlight: Option<usize>,

        /// Write the markup to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the related ideas of one sentence
    Graph {
        /// Document id
        document_id: String,

        /// Sentence id within the document
        sentence_id: usize,

        /// Export format; prints a tree when omitted
        #[arg(short, long)]
        format: Option<GraphFormat>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the excerpt behind a graph node
    Excerpt {
        /// Node key: document_id|sentence_id|color|label
        node_key: String,
    },

    /// Write the HTML explorer page for one sentence and open it
    Viz {
        /// Document id
        document_id: String,

        /// Sentence id within the document
        sentence_id: usize,

        /// Output file path (defaults to a temp file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not open the page in the browser
        #[arg(long, default_value = "false")]
        no_open: bool,
    },

    /// Browse the corpus interactively
    Explore {
        /// Mirror every view into this HTML file
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Show corpus statistics
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GraphFormat {
    Json,
    Graphml,
}

impl std::fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphFormat::Json => write!(f, "json"),
            GraphFormat::Graphml => write!(f, "graphml"),
        }
    }
}
