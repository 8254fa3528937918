use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::DashboardError;

/// Retrieve a resource. `http(s)` URLs go through a blocking HTTP client;
/// anything else is read as a local path (a `file://` prefix is accepted).
pub fn fetch_bytes(source: &str) -> Result<Vec<u8>, DashboardError> {
    let fetch_err = |message: String| DashboardError::Fetch {
        url: source.to_string(),
        message,
    };

    if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::blocking::get(source)
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_err(e.to_string()))?;
        let bytes = response.bytes().map_err(|e| fetch_err(e.to_string()))?;
        Ok(bytes.to_vec())
    } else {
        let path = source.strip_prefix("file://").unwrap_or(source);
        std::fs::read(path).map_err(|e| fetch_err(e.to_string()))
    }
}

/// Fetch `source` and run `parse` over the body.
pub fn fetch_with<T, F>(source: &str, parse: F) -> Result<T, DashboardError>
where
    F: FnOnce(&[u8]) -> anyhow::Result<T>,
{
    let bytes = fetch_bytes(source)?;
    parse(&bytes).map_err(|e| DashboardError::Parse {
        url: source.to_string(),
        message: format!("{e:#}"),
    })
}

// ---------------------------------------------------------------------------
// Background fetch
// ---------------------------------------------------------------------------

/// One fetch running on a worker thread. Poll it from the UI thread with
/// [`PendingFetch::try_take`].
pub struct PendingFetch<T> {
    pub source: String,
    rx: Receiver<Result<T, DashboardError>>,
}

impl<T: Send + 'static> PendingFetch<T> {
    pub fn spawn<F>(source: &str, parse: F) -> Self
    where
        F: FnOnce(&[u8]) -> anyhow::Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let url = source.to_string();
        log::info!("Fetching {url}");
        thread::spawn(move || {
            let result = fetch_with(&url, parse);
            // The receiver is gone if the app shut down meanwhile.
            let _ = tx.send(result);
        });
        PendingFetch {
            source: source.to_string(),
            rx,
        }
    }

    /// `None` while the worker is still running.
    pub fn try_take(&self) -> Option<Result<T, DashboardError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(DashboardError::Fetch {
                url: self.source.clone(),
                message: "fetch worker exited without a result".into(),
            })),
        }
    }
}
