//! A [`ScriptHost`] that fetches scripts over HTTP.

use crate::loader::{LoadCompletion, LoadFailure, ScriptHost};
use log::{debug, info};
use std::cell::RefCell;
use std::collections::BTreeMap;

// ----------------------------------------------------------------------------
// Http Host
// ----------------------------------------------------------------------------

/// A [`ScriptHost`] backed by [`reqwest`].
///
/// [`attach`](ScriptHost::attach) only queues the load. Loads run when the
/// host is driven with [`settle`](HttpHost::settle), which fires each
/// completion on the calling task. A successfully fetched script is kept by
/// the host and can be read back with [`script`](HttpHost::script).
///
/// A load fails on a transport error, a non-success status code, or an empty
/// body.
#[derive(Debug, Default)]
pub struct HttpHost {
    client: reqwest::Client,
    pending: RefCell<Vec<LoadCompletion>>,
    scripts: RefCell<BTreeMap<String, String>>,
}

impl HttpHost {
    /// Returns a host with a default [`reqwest::Client`].
    pub fn new() -> Self {
        HttpHost::default()
    }

    /// Returns a host that fetches with a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpHost { client, ..Default::default() }
    }

    /// Returns the number of queued loads.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Returns the source of a successfully loaded script.
    pub fn script(&self, locator: &str) -> Option<String> {
        self.scripts.borrow().get(locator).cloned()
    }

    /// Run every queued load to completion.
    ///
    /// Loads attached by observers while settling are run as well.
    ///
    /// ## Returns
    ///
    /// The number of loads settled.
    pub async fn settle(&self) -> usize {
        let mut settled = 0;
        loop {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for completion in batch {
                match fetch(&self.client, completion.locator()).await {
                    Ok(source) => {
                        info!("Fetched script {:?} ({} bytes)", completion.locator(), source.len());
                        self.scripts.borrow_mut().insert(completion.locator().to_string(), source);
                        completion.succeed();
                    }
                    Err(failure) => completion.fail(failure),
                }
                settled += 1;
            }
        }
        settled
    }
}

impl ScriptHost for HttpHost {
    fn attach(&self, locator: &str, completion: LoadCompletion) {
        debug!("Queueing script fetch: {locator:?}");
        self.pending.borrow_mut().push(completion);
    }
}

/// Fetch the source of a script.
async fn fetch(client: &reqwest::Client, locator: &str) -> Result<String, LoadFailure> {
    let failure = |reason: String| LoadFailure::new(locator, reason);

    let response = client.get(locator).send().await.map_err(|e| failure(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(failure(format!("Status code: {status}")));
    }

    let source = response.text().await.map_err(|e| failure(e.to_string()))?;
    if source.trim().is_empty() {
        return Err(failure("Empty script body".to_string()));
    }

    Ok(source)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::HttpHost;
    use crate::{LoadStatus, Registry, ScriptLoader};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::rc::Rc;
    use tokio_test::block_on;

    /// Serve `body` with `status` to the next `requests` connections, returns the script URL.
    pub(crate) fn serve(status: &'static str, body: &'static str, requests: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let url = format!("http://{}/lib.js", listener.local_addr().expect("test server addr"));
        std::thread::spawn(move || {
            for stream in listener.incoming().take(requests).flatten() {
                let mut reader = BufReader::new(&stream);
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) && line != "\r\n" {
                    line.clear();
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/javascript\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = (&stream).write_all(response.as_bytes());
            }
        });
        url
    }

    /// A host whose client never goes through a system proxy.
    pub(crate) fn local_host() -> Rc<HttpHost> {
        let client = reqwest::Client::builder().no_proxy().build().expect("build test client");
        Rc::new(HttpHost::with_client(client))
    }

    /// A URL nothing listens on.
    pub(crate) fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("test server addr");
        drop(listener);
        format!("http://{addr}/lib.js")
    }

    #[test]
    fn fetch_succeeds() {
        let url = serve("200 OK", "function Browser() {}", 1);
        let registry = Registry::new();
        let host = local_host();
        let mut first = ScriptLoader::new(&registry, host.clone());
        let mut second = ScriptLoader::new(&registry, host.clone());

        first.observe(Some(url.as_str()));
        second.observe(Some(url.as_str()));
        assert_eq!(host.pending(), 1);

        assert_eq!(block_on(host.settle()), 1);
        assert_eq!(first.status(), LoadStatus::Ready);
        assert_eq!(second.status(), LoadStatus::Ready);
        assert_eq!(host.script(&url).as_deref(), Some("function Browser() {}"));
    }

    #[test]
    fn fetch_fails_on_status() {
        let url = serve("404 Not Found", "missing", 1);
        let registry = Registry::new();
        let host = local_host();
        let mut loader = ScriptLoader::new(&registry, host.clone());

        loader.observe(Some(url.as_str()));
        block_on(host.settle());
        assert_eq!(loader.status(), LoadStatus::Error);
        assert!(host.script(&url).is_none());
        let reason = registry.failure(&url).map(|f| f.reason).unwrap_or_default();
        assert!(reason.contains("404"), "{reason}");
    }

    #[test]
    fn fetch_fails_on_empty_body() {
        let url = serve("200 OK", "", 1);
        let registry = Registry::new();
        let host = local_host();
        let mut loader = ScriptLoader::new(&registry, host.clone());

        loader.observe(Some(url.as_str()));
        block_on(host.settle());
        assert_eq!(loader.status(), LoadStatus::Error);
    }

    #[test]
    fn fetch_fails_on_connection() {
        let url = closed_url();
        let registry = Registry::new();
        let host = local_host();
        let mut loader = ScriptLoader::new(&registry, host.clone());

        loader.observe(Some(url.as_str()));
        assert_eq!(block_on(host.settle()), 1);
        assert_eq!(loader.status(), LoadStatus::Error);
        assert_eq!(host.pending(), 0);
    }
}
