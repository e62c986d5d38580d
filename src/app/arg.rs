use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, default_value = "warn")]
    pub log_level: super::logging::Level,

    #[clap(long)]
    pub log_file: Option<PathBuf>,

    #[clap(long)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select the best supported media type for an Accept header value.
    Negotiate(NegotiateCommand),
    /// Parse header lines and print them as JSON lines.
    Header(HeaderCommand),
    /// Fetch a URL over plain HTTP.
    Fetch(FetchCommand),
}

#[derive(Parser, Debug)]
pub struct NegotiateCommand {
    /// Value of the Accept header.
    #[clap(long)]
    pub accept: String,

    /// Media types the server can produce, in order of preference.
    #[clap(long, required = true, num_args = 1..)]
    pub supported: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct HeaderCommand {
    /// Header lines such as "Content-Type: text/html". Lines are read from
    /// the input when none are given.
    pub line: Vec<String>,

    #[clap(long, default_value = "-")]
    pub input: PathBuf,

    #[clap(long, default_value = "-")]
    pub output: PathBuf,

    /// Keep structured headers with malformed values as raw text.
    #[clap(long)]
    pub lenient: bool,
}

#[derive(Parser, Debug)]
pub struct FetchCommand {
    pub url: String,

    /// Additional request header line.
    #[clap(long, short = 'H')]
    pub header: Vec<String>,

    /// Follow Location headers.
    #[clap(long, short = 'L')]
    pub follow: bool,

    #[clap(long, default_value_t = 5)]
    pub max_redirects: u32,

    /// HTTP proxy as host:port.
    #[clap(long)]
    pub proxy: Option<String>,

    /// Read and write timeout in seconds.
    #[clap(long)]
    pub timeout: Option<u64>,

    /// JSON file for loading and saving cookies.
    #[clap(long)]
    pub cookie_jar: Option<PathBuf>,

    #[clap(long, default_value = "-")]
    pub output: PathBuf,

    /// Write the response status line and headers before the body.
    #[clap(long, short)]
    pub include: bool,
}
