use std::path::PathBuf;

use clap::ValueHint;
use scenery::{Config, IndexBase, SceneSelection, StreamLayout};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Layout {
    Standard,
    NoTexture,
    WithNormals,
}

impl From<Layout> for StreamLayout {
    fn from(value: Layout) -> Self {
        match value {
            Layout::Standard => Self::Standard,
            Layout::NoTexture => Self::NoTexture,
            Layout::WithNormals => Self::WithNormals,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,scenery=info,spawn_report=info",
        env = "SPAWN_REPORT_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Root collection to instantiate into
    #[arg(long, default_value = "/root", env = "SPAWN_REPORT_COLLECTION")]
    pub collection: String,
    /// Factory component used to spawn mesh instances
    #[arg(long, default_value = "#mesh_factory", env = "SPAWN_REPORT_FACTORY")]
    pub factory: String,
    /// Maximum number of spawned instances, across all files
    #[arg(short, long, default_value_t = Config::DEFAULT_CAPACITY, env = "SPAWN_REPORT_CAPACITY")]
    pub capacity: usize,
    /// Vertex stream layout of built geometry
    #[arg(long, value_enum, default_value_t = Layout::Standard)]
    pub layout: Layout,
    /// Report decoded indices counting from zero instead of one
    #[arg(long)]
    pub zero_based: bool,
    /// Walk only this scene (default: the document's default scene, else all scenes)
    #[arg(short, long, conflicts_with = "all_scenes")]
    pub scene: Option<usize>,
    /// Walk every scene, even if the document names a default one
    #[arg(long)]
    pub all_scenes: bool,
    /// Check each document's integrity before processing it
    #[arg(long)]
    pub validate: bool,
    /// Print each document's info record
    #[arg(long)]
    pub info: bool,
    /// Print the decoded indices of every primitive
    #[arg(long)]
    pub indices: bool,
    /// glTF / GLB files to process
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            collection: self.collection.clone(),
            factory: self.factory.clone(),
            capacity: self.capacity,
            layout: self.layout.into(),
            index_base: match self.zero_based {
                true => IndexBase::Zero,
                false => IndexBase::One,
            },
            scenes: match (self.scene, self.all_scenes) {
                (Some(s), _) => SceneSelection::Index(s),
                (None, true) => SceneSelection::All,
                (None, false) => SceneSelection::Default,
            },
        }
    }
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
