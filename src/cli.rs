use clap::{ArgGroup, Parser};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "kingmaker",
    version,
    about = "Find verified YouTube Shorts for a search query",
    after_help = "Requires the YOUTUBE_API_KEY environment variable (a .env file is honoured).",
    group(ArgGroup::new("search").required(true).args(["positional_query", "query"]))
)]
pub struct Cli {
    /// Search query
    #[arg(value_name = "QUERY")]
    pub positional_query: Option<String>,

    /// Search query (alternative to the positional argument)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Maximum number of videos to fetch [default: DEFAULT_MAX_RESULTS or 25]
    #[arg(long = "max", value_name = "N")]
    pub max_results: Option<u32>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Show debug logs and quota usage
    #[arg(short, long)]
    pub verbose: bool,

    /// Return every search hit without Shorts verification
    #[arg(long)]
    pub include_all_videos: bool,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Cli {
    pub fn search_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .or(self.positional_query.as_deref())
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}
