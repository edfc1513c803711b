//! Passive source for the 360 Quake search API.
//!
//! Quake exposes a paginated `POST` search endpoint; this source walks the
//! pages for a `domain:` query and emits every host it finds. API docs:
//! <https://quake.360.cn/quake/#/help>

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use http::header::{HeaderMap, HeaderName, HeaderValue};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, Sender};
use tokio::time::sleep;
use tokio_stream::wrappers::ReceiverStream;

use crate::types::{StatsCell, lock};
use crate::{ErrorKind, KeyPicker, RandomPicker, RunStats, Session, Source, SourceResult};

/// Identifier of this source
pub const SOURCE_NAME: &str = "quake";

/// Number of records requested per page, fixed for a run
pub const PAGE_SIZE: usize = 100;

const API_URL: &str = "https://quake.360.net/api/v3/search/quake_service";
const TOKEN_HEADER: HeaderName = HeaderName::from_static("x-quaketoken");
const HOST_FIELD: &str = "service.http.host";

/// Pause between page fetches to respect the upstream rate limit
const PAGE_DELAY: Duration = Duration::from_secs(3);

/// Marker the upstream puts into a host field it is not willing to reveal.
/// A match (on any of its characters, as the upstream is inconsistent about
/// the full phrase) is normalized to an empty host, never dropped.
const NO_PERMISSION: &str = "暂无权限";

#[derive(Serialize)]
struct QuakeRequest {
    query: String,
    start: usize,
    size: usize,
    ignore_cache: bool,
    include: [&'static str; 1],
}

impl QuakeRequest {
    fn new(domain: &str, page: usize) -> Self {
        Self {
            query: format!("domain: {domain}"),
            start: (page - 1) * PAGE_SIZE,
            size: PAGE_SIZE,
            ignore_cache: false,
            include: [HOST_FIELD],
        }
    }
}

// Absent fields decode to their defaults, matching the lenient decoding the
// upstream clients rely on; wrong types are still a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuakeResponse {
    code: i64,
    message: String,
    data: Vec<QuakeEntry>,
    meta: QuakeMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuakeEntry {
    service: QuakeService,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuakeService {
    http: QuakeHttp,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuakeHttp {
    host: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuakeMeta {
    pagination: QuakePagination,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuakePagination {
    total: usize,
}

/// The Quake passive scraping source.
#[derive(Debug)]
pub struct QuakeSource {
    api_keys: Vec<String>,
    picker: Arc<dyn KeyPicker>,
    api_url: String,
    page_delay: Duration,
    stats: Mutex<StatsCell>,
}

impl Default for QuakeSource {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            picker: Arc::new(RandomPicker),
            api_url: API_URL.to_string(),
            page_delay: PAGE_DELAY,
            stats: Mutex::new(StatsCell::default()),
        }
    }
}

impl QuakeSource {
    /// Create a source with the default key picker and endpoint
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the key selection strategy
    #[must_use]
    pub fn with_picker(mut self, picker: Arc<dyn KeyPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Override the API endpoint, e.g. to point at a mock server in tests
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the inter-page delay
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }
}

impl Source for QuakeSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn is_default(&self) -> bool {
        true
    }

    fn has_recursive_support(&self) -> bool {
        false
    }

    fn needs_keys(&self) -> bool {
        true
    }

    fn add_api_keys(&mut self, keys: Vec<String>) {
        self.api_keys = keys;
    }

    fn run(&self, domain: &str, session: Arc<Session>) -> ReceiverStream<SourceResult> {
        let (tx, rx) = mpsc::channel(1);
        let stats: StatsCell = Arc::default();
        *lock(&self.stats) = Arc::clone(&stats);

        let api_key = self.picker.pick(&self.api_keys, SOURCE_NAME);
        let domain = domain.to_owned();
        let api_url = self.api_url.clone();
        let page_delay = self.page_delay;

        tokio::spawn(async move {
            let start = Instant::now();
            match api_key {
                Some(key) => {
                    scrape(&domain, &key, &api_url, page_delay, &session, &tx, &stats).await;
                }
                None => lock(&stats).skipped = true,
            }
            lock(&stats).time_taken = start.elapsed();
            // tx is dropped here, closing the stream on every exit path
        });

        ReceiverStream::new(rx)
    }

    fn statistics(&self) -> RunStats {
        let cell = Arc::clone(&lock(&self.stats));
        lock(&cell).clone()
    }
}

/// The pagination loop: fetch, decode, emit, pace, until the last page or
/// the first error. Runs on the single producer task per invocation.
async fn scrape(
    domain: &str,
    api_key: &str,
    api_url: &str,
    page_delay: Duration,
    session: &Session,
    tx: &Sender<SourceResult>,
    stats: &Mutex<RunStats>,
) {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(api_key) {
        Ok(token) => {
            headers.insert(TOKEN_HEADER, token);
        }
        Err(e) => return fail(tx, stats, e.into()).await,
    }

    let mut pages = 1;
    let mut current_page = 1;
    while current_page <= pages {
        debug!("querying {SOURCE_NAME} for {domain}, page {current_page}/{pages}");

        let request = QuakeRequest::new(domain, current_page);
        let raw = match session.post_json(api_url, headers.clone(), &request).await {
            Ok(raw) => raw,
            Err(e) => return fail(tx, stats, e).await,
        };

        let response: QuakeResponse = match serde_json::from_slice(&raw) {
            Ok(response) => response,
            Err(e) => return fail(tx, stats, e.into()).await,
        };
        if response.code != 0 {
            let error = ErrorKind::Upstream {
                code: response.code,
                message: response.message,
            };
            return fail(tx, stats, error).await;
        }

        let total = response.meta.pagination.total;
        if total > 0 {
            for entry in response.data {
                let host = normalize_host(entry.service.http.host);
                if tx
                    .send(SourceResult::subdomain(SOURCE_NAME, host))
                    .await
                    .is_err()
                {
                    // consumer dropped the stream; the run is cancelled
                    return;
                }
                lock(stats).results += 1;
            }
            pages = page_count(total);
        }

        sleep(page_delay).await;
        current_page += 1;
    }
}

/// Emit the single terminal error item and count it
async fn fail(tx: &Sender<SourceResult>, stats: &Mutex<RunStats>, error: ErrorKind) {
    let _ = tx.send(SourceResult::error(SOURCE_NAME, error)).await;
    lock(stats).errors += 1;
}

/// Total page count for a reported match total, never below 1
const fn page_count(total: usize) -> usize {
    total / PAGE_SIZE + 1
}

fn normalize_host(host: String) -> String {
    if host.chars().any(|c| NO_PERMISSION.contains(c)) {
        String::new()
    } else {
        host
    }
}
