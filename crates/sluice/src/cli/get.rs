use std::path::PathBuf;

use anyhow::Context;
use sluice_fetch::{Fetcher, HttpClient};
use tracing::info;

use super::app::FetchArgs;

#[derive(Debug, clap::Args)]
pub struct GetArg {
    /// URL of the resource
    pub url: String,

    /// Destination file
    pub path: PathBuf,

    /// Skip the download when the destination already exists
    #[arg(long)]
    pub if_needed: bool,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

impl GetArg {
    pub fn run<C: HttpClient>(self, fetcher: &Fetcher<C>) -> anyhow::Result<()> {
        let options = self.fetch.options();

        if self.if_needed {
            let fetched = fetcher
                .download_if_needed(&self.url, &self.path, &options)
                .with_context(|| format!("failed to download {}", self.url))?;
            if !fetched {
                info!(path = %self.path.display(), "already present");
            }
            return Ok(());
        }

        let path = fetcher
            .download(&self.url, &self.path, &options)
            .with_context(|| format!("failed to download {}", self.url))?;
        info!(path = %path.display(), "saved");
        Ok(())
    }
}
