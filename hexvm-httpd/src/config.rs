use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use hexvm_control::LoadMode;

/// Default dump buffer size, in hex characters
pub const DEFAULT_DUMP_CAPACITY: usize = 2000;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Address to accept control requests on
    #[arg(short = 'l', long, env = "HEXVMD_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Directory served for any path that is not a control endpoint
    #[arg(short = 'w', long, env = "HEXVMD_WWW", default_value = "www")]
    pub www: PathBuf,

    /// Landing page that `/` redirects to
    #[arg(long, env = "HEXVMD_INDEX", default_value = "/index.html")]
    pub index: String,

    /// Largest dump, in hex characters, a response may carry
    #[arg(long, env = "HEXVMD_DUMP_CAPACITY", default_value_t = DEFAULT_DUMP_CAPACITY)]
    pub dump_capacity: usize,

    /// Whether uploading a program also runs it
    #[arg(long, env = "HEXVMD_LOAD_MODE", value_enum, default_value_t = LoadModeArg::Fused)]
    pub load_mode: LoadModeArg,

    /// Answer CORS preflights permissively, for browser clients on other origins
    #[arg(long)]
    pub cors: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "HEXVMD_LOG", default_value = "info")]
    pub log_filter: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadModeArg {
    /// Upload, execute, dump
    Fused,
    /// Upload, dump; run with /exec
    Split,
}

impl From<LoadModeArg> for LoadMode {
    fn from(arg: LoadModeArg) -> Self {
        match arg {
            LoadModeArg::Fused => LoadMode::Fused,
            LoadModeArg::Split => LoadMode::Split,
        }
    }
}
