use crate::domain::model::MalformedRowPolicy;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "review-queue")]
#[command(about = "Builds the work-order review queue from the daily maintenance report")]
pub struct CliConfig {
    /// Report to read (defaults to REPORT.csv)
    #[arg(long)]
    pub input: Option<String>,

    /// Review queue to write (defaults to reviewReport.json)
    #[arg(long)]
    pub output: Option<String>,

    /// Scan date as YYYY-MM-DD; skips the interactive question
    #[arg(long)]
    pub since: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// What to do with rows that cannot be transformed
    #[arg(long, value_enum)]
    pub on_malformed: Option<MalformedRowPolicy>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines on stderr")]
    pub log_json: bool,
}
