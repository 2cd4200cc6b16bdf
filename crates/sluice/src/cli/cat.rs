use std::io::{self, Write};

use anyhow::Context;
use sluice_fetch::{Fetcher, HttpClient, StreamOptions};
use tracing::debug;

use super::app::FetchArgs;

#[derive(Debug, clap::Args)]
pub struct CatArg {
    /// URL of the resource
    pub url: String,

    /// Decode the body from this encoding and print it as UTF-8
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Print `.gz` resources without decompressing them
    #[arg(long = "skip-gz")]
    pub skip_gzip: bool,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

impl CatArg {
    pub fn options(&self) -> StreamOptions {
        let options = StreamOptions::default().fetch(self.fetch.options()).skip_gzip(self.skip_gzip);
        match self.encoding {
            Some(ref label) => options.encoding(label.as_str()),
            None => options,
        }
    }

    pub fn run<C: HttpClient>(self, fetcher: &Fetcher<C>) -> anyhow::Result<()> {
        let mut stream = fetcher
            .download_stream(&self.url, &self.options())
            .with_context(|| format!("failed to open {}", self.url))?;

        let mut out = io::stdout().lock();
        match io::copy(&mut stream, &mut out).and_then(|n| out.flush().map(|()| n)) {
            Ok(n) => {
                debug!(url = %self.url, bytes = n, "written to stdout");
                Ok(())
            }
            // Downstream closed early, e.g. `sluice cat ... | head`.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", self.url)),
        }
    }
}
