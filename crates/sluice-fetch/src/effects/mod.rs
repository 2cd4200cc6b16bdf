//! Network and filesystem effects of fetching.
//!
//! Everything that blocks on a socket or touches the disk lives here; the
//! byte transforms it composes come from `core` and `transform`.

mod chunks;
mod fetcher;
mod http;

pub use chunks::ChunkFetcher;
pub use fetcher::{DownloadStream, Fetcher};
pub use http::{HttpClient, HttpResponse};
#[cfg(feature = "reqwest")]
pub use http::{ClientSetting, ReqwestClient, Url};
