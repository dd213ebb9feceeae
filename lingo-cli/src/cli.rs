use clap::Parser;
use jiff::civil::Date;

#[derive(Parser)]
#[clap(about = "Compile search queries into filter conditions")]
pub struct Cli {
    /// Search definition to compile against.
    #[clap(long, default_value = "jobs", value_parser = ["jobs", "receipts", "tasks"])]
    pub search: String,
    /// Reference date (YYYY-MM-DD) for dates typed without a year. Defaults to today.
    #[clap(long)]
    pub today: Option<Date>,
    /// Print the compiled conditions as JSON.
    #[clap(long, default_value = "false")]
    pub json: bool,
    /// Log every parser match and fallback.
    #[clap(long, short, default_value = "false")]
    pub verbose: bool,
    /// Query to compile. Reads queries from stdin when omitted.
    pub query: Vec<String>,
}
