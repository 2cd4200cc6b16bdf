//! End-to-end tests of the fetch pipeline against in-memory responses.

use std::cell::Cell;
use std::collections::HashMap;
use std::io::{self, BufRead, Cursor, Read, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use sluice_fetch::{
    FetchError, FetchOptions, Fetcher, HttpClient, HttpResponse, Result, Sha256Digest, StreamOptions,
};
use sluice_verify::Sha256Hasher;
use tempfile::tempdir;

const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

enum Resource {
    Body(Vec<u8>),
    /// Serves the bytes, then fails the connection.
    FailAfter(Vec<u8>),
}

struct FailAfter(Cursor<Vec<u8>>);

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionAborted, "connection dropped")),
            n => Ok(n),
        }
    }
}

#[derive(Default)]
struct MemoryClient {
    resources: HashMap<String, Resource>,
    requests:  Cell<usize>,
}

impl MemoryClient {
    fn with(mut self, url: &str, resource: Resource) -> Self {
        self.resources.insert(url.to_string(), resource);
        self
    }

    fn requests(&self) -> usize { self.requests.get() }
}

impl HttpClient for MemoryClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requests.set(self.requests.get() + 1);
        match self.resources.get(url) {
            Some(Resource::Body(data)) => {
                Ok(HttpResponse::new(Some(data.len() as u64), Cursor::new(data.clone())))
            }
            Some(Resource::FailAfter(data)) => Ok(HttpResponse::new(
                Some(data.len() as u64 * 2),
                FailAfter(Cursor::new(data.clone())),
            )),
            None => Err(io::Error::new(io::ErrorKind::NotFound, url.to_string()).into()),
        }
    }
}

fn quiet() -> FetchOptions { FetchOptions::default().show_progress(false) }

fn hello_digest() -> Sha256Digest { HELLO_SHA256.parse().unwrap() }

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn hello_fetcher() -> Fetcher<MemoryClient> {
    Fetcher::new(MemoryClient::default().with("mem://hello.txt", Resource::Body(b"hello world".to_vec())))
}

#[test]
fn test_download_writes_verified_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("hello.txt");

    let path = hello_fetcher()
        .download("mem://hello.txt", &dest, &quiet().checksum(Some(hello_digest())).buffer_size(4))
        .unwrap();

    assert_eq!(path, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
}

#[test]
fn test_download_with_wrong_digest_leaves_nothing_behind() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("hello.txt");
    let wrong = Sha256Digest::from_bytes([0; 32]);

    let err = hello_fetcher()
        .download("mem://hello.txt", &dest, &quiet().checksum(Some(wrong)))
        .unwrap_err();

    match err {
        FetchError::Integrity { url, expected, actual } => {
            assert_eq!(url, "mem://hello.txt");
            assert_eq!(expected, wrong);
            assert_eq!(actual, hello_digest());
        }
        other => panic!("expected integrity error, got {other:?}"),
    }
    assert!(!dest.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_interrupted_download_keeps_existing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("data.bin");
    std::fs::write(&dest, "previous version").unwrap();

    let fetcher = Fetcher::new(
        MemoryClient::default().with("mem://data.bin", Resource::FailAfter(vec![7u8; 10_000])),
    );
    let err = fetcher.download("mem://data.bin", &dest, &quiet().buffer_size(1024)).unwrap_err();

    assert!(matches!(err, FetchError::Io(ref e) if e.kind() == io::ErrorKind::ConnectionAborted));
    assert_eq!(std::fs::read(&dest).unwrap(), b"previous version");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_download_if_needed_fetches_once() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("hello.txt");
    let fetcher = hello_fetcher();

    assert!(fetcher.download_if_needed("mem://hello.txt", &dest, &quiet()).unwrap());
    assert!(!fetcher.download_if_needed("mem://hello.txt", &dest, &quiet()).unwrap());

    assert_eq!(fetcher.client().requests(), 1);
    assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
}

#[test]
fn test_download_into_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let fetcher = hello_fetcher();

    let err = fetcher.download("mem://hello.txt", dir.path(), &quiet()).unwrap_err();
    assert!(matches!(err, FetchError::DestinationIsDirectory(_)));
    assert_eq!(fetcher.client().requests(), 0);
}

#[test]
fn test_missing_resource_propagates_client_error() {
    let dir = tempdir().unwrap();
    let err = hello_fetcher()
        .download("mem://missing", dir.path().join("missing"), &quiet())
        .unwrap_err();
    assert!(matches!(err, FetchError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
}

#[test]
fn test_stream_plain_resource() {
    let mut stream = hello_fetcher()
        .download_stream("mem://hello.txt", &StreamOptions::default().fetch(quiet().buffer_size(2)))
        .unwrap();
    assert!(!stream.is_decompressed());

    let mut body = Vec::new();
    stream.read_to_end(&mut body).unwrap();
    assert_eq!(body, b"hello world");
}

#[test]
fn test_stream_decompresses_gz_urls() {
    let text: String = (0..500).map(|i| format!("{i}\tdocument {i}\n")).collect();
    let compressed = gzip(text.as_bytes());
    let digest = Sha256Hasher::digest(&compressed);

    let fetcher =
        Fetcher::new(MemoryClient::default().with("mem://docs.tsv.gz", Resource::Body(compressed)));
    let options = StreamOptions::default().fetch(quiet().buffer_size(100).checksum(Some(digest)));
    let mut stream = fetcher.download_stream("mem://docs.tsv.gz", &options).unwrap();
    assert!(stream.is_decompressed());

    let mut out = String::new();
    stream.read_to_string(&mut out).unwrap();
    assert_eq!(out, text);
}

#[test]
fn test_stream_skip_gzip_returns_raw_bytes() {
    let compressed = gzip(b"raw please");
    let fetcher = Fetcher::new(
        MemoryClient::default().with("mem://raw.gz", Resource::Body(compressed.clone())),
    );

    let options = StreamOptions::default().fetch(quiet()).skip_gzip(true);
    let mut stream = fetcher.download_stream("mem://raw.gz", &options).unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).unwrap();
    assert_eq!(out, compressed);
}

#[test]
fn test_stream_decodes_text_lines() {
    let fetcher = Fetcher::new(MemoryClient::default().with(
        "mem://names.txt.gz",
        Resource::Body(gzip(b"Ren\xe9e\nJos\xe9\nZo\xeb\n")),
    ));

    let options = StreamOptions::default().fetch(quiet().buffer_size(3)).encoding("latin1");
    let stream = fetcher.download_stream("mem://names.txt.gz", &options).unwrap();
    assert_eq!(stream.encoding(), Some(encoding_rs::WINDOWS_1252));

    let lines: Vec<String> = stream.lines().collect::<io::Result<_>>().unwrap();
    assert_eq!(lines, ["Renée", "José", "Zoë"]);
}

#[test]
fn test_stream_integrity_error_surfaces_after_data() {
    let wrong = Sha256Digest::from_bytes([1; 32]);
    let options = StreamOptions::default().fetch(quiet().buffer_size(4).checksum(Some(wrong)));
    let mut stream = hello_fetcher().download_stream("mem://hello.txt", &options).unwrap();

    let mut body = Vec::new();
    let err = stream.read_to_end(&mut body).unwrap_err();

    assert_eq!(body, b"hello world");
    let fetch_err = FetchError::from_io(&err).expect("fetch error inside io error");
    assert!(fetch_err.is_integrity());
}

#[test]
fn test_unknown_encoding_is_rejected_before_request() {
    let fetcher = hello_fetcher();
    let options = StreamOptions::default().fetch(quiet()).encoding("not-a-charset");

    let err = fetcher.download_stream("mem://hello.txt", &options).unwrap_err();
    assert!(matches!(err, FetchError::UnknownEncoding(_)));
    assert_eq!(fetcher.client().requests(), 0);
}

#[test]
fn test_download_reports_commit_before_completion() {
    use std::sync::{Arc, Mutex};

    use sluice_fetch::{FetchPhase, Progress};

    let dir = tempdir().unwrap();
    let phases = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&phases);
    let options = quiet()
        .buffer_size(6)
        .on_progress(Arc::new(move |p: &Progress| sink.lock().unwrap().push(p.phase)));

    hello_fetcher().download("mem://hello.txt", dir.path().join("hello.txt"), &options).unwrap();

    assert_eq!(
        *phases.lock().unwrap(),
        [
            FetchPhase::Connecting,
            FetchPhase::Downloading,
            FetchPhase::Downloading,
            FetchPhase::Verifying,
            FetchPhase::Committing,
            FetchPhase::Completed,
        ]
    );
}

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

#[test]
fn test_empty_resource_downloads_and_streams() {
    let fetcher = Fetcher::new(MemoryClient::default().with("mem://empty", Resource::Body(Vec::new())));
    let options = quiet().checksum(Some(EMPTY_SHA256.parse().unwrap()));

    let dir = tempdir().unwrap();
    let dest = dir.path().join("empty");
    fetcher.download("mem://empty", &dest, &options).unwrap();
    assert_eq!(std::fs::metadata(&dest).unwrap().len(), 0);

    let mut stream = fetcher.download_stream("mem://empty", &StreamOptions::default().fetch(options)).unwrap();
    let mut body = Vec::new();
    assert_eq!(stream.read_to_end(&mut body).unwrap(), 0);
}

#[test]
fn test_stream_rejects_malformed_text() {
    let fetcher = Fetcher::new(
        MemoryClient::default().with("mem://notes.txt", Resource::Body(b"ok\xff\xfeend".to_vec())),
    );
    let options = StreamOptions::default().fetch(quiet()).encoding("utf-8");
    let mut stream = fetcher.download_stream("mem://notes.txt", &options).unwrap();

    let mut text = String::new();
    let err = stream.read_to_string(&mut text).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(!text.contains('\u{fffd}'));
}

#[test]
fn test_oversized_buffer_is_rejected_before_request() {
    let fetcher = hello_fetcher();
    let options = quiet().buffer_size(usize::MAX);

    let err = fetcher.chunks("mem://hello.txt", &options).err().unwrap();
    assert!(matches!(err, FetchError::InvalidOptions(_)));

    let err = fetcher
        .download_stream("mem://hello.txt", &StreamOptions::default().fetch(options))
        .unwrap_err();
    assert!(matches!(err, FetchError::InvalidOptions(_)));
    assert_eq!(fetcher.client().requests(), 0);
}
