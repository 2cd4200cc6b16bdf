use std::time::Duration;

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use sluice_fetch::{
    ClientSetting, DEFAULT_BUFFER_SIZE, FetchOptions, Fetcher, MAX_BUFFER_SIZE, ReqwestClient, Url,
};
use sluice_verify::Sha256Digest;

use super::cat::CatArg;
use super::get::GetArg;

#[derive(Debug, Parser)]
#[command(name = "sluice", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Proxy for outgoing requests, by scheme of the proxy URL
    #[arg(long, value_name = "URL", global = true)]
    pub proxy: Vec<Url>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "g", name = "get", about = "Download a resource to a file")]
    Get(GetArg),
    #[command(alias = "c", name = "cat", about = "Stream a resource to stdout")]
    Cat(CatArg),
}

/// Options shared by every command that fetches a resource.
#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Expected SHA-256 of the response body, in hex
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<Sha256Digest>,

    /// Chunk size in bytes
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_BUFFER_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BUFFER_SIZE as u64),
    )]
    pub buffer_size: usize,

    /// Do not draw a progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl FetchArgs {
    pub fn options(&self) -> FetchOptions {
        FetchOptions::default()
            .checksum(self.sha256)
            .buffer_size(self.buffer_size)
            .show_progress(!self.quiet)
    }
}

impl App {
    pub fn client_setting(&self) -> ClientSetting {
        ClientSetting {
            proxies: (!self.proxy.is_empty()).then(|| self.proxy.clone()),
            timeout: self.timeout.map(Duration::from_secs),
            user_agent: None,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let client = ReqwestClient::with_setting(self.client_setting())
            .context("failed to build http client")?;
        let fetcher = Fetcher::new(client);

        match self.cmd {
            Commands::Get(arg) => arg.run(&fetcher),
            Commands::Cat(arg) => arg.run(&fetcher),
        }
    }
}
