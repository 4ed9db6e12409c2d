use std::collections::VecDeque;
use std::time::Duration;

use crate::{
    foundation::core::{Frame, Generation},
    foundation::error::{SignplayError, SignplayResult},
    parse::frames::decode_landmark_document,
};

/// Host-side boundary for remote landmark documents.
///
/// The sequencer emits [`crate::Effect::FetchLandmarks`]; the host routes it
/// to `begin_fetch`, executes pending work on its own loop, and feeds each
/// completion from `poll` back into
/// [`crate::SignSequencer::on_landmarks`]. Implementations decide the
/// data-source mode (live HTTP, canned fixtures, offline refusal).
pub trait LandmarkFetcher {
    /// Register a fetch for `uri` under `token`.
    fn begin_fetch(&mut self, uri: &str, token: Generation);
    /// Produce at most one completed fetch.
    fn poll(&mut self) -> Option<(Generation, SignplayResult<Vec<Frame>>)>;
}

/// Blocking-HTTP fetcher over `reqwest`. Requests queue at `begin_fetch` and
/// execute one per `poll` on the host's loop; the engine core itself never
/// performs IO.
pub struct HttpLandmarkFetcher {
    client: reqwest::blocking::Client,
    pending: VecDeque<(Generation, String)>,
}

impl HttpLandmarkFetcher {
    pub fn new(timeout: Duration) -> SignplayResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SignplayError::fetch(format!("building http client: {e}")))?;
        Ok(Self {
            client,
            pending: VecDeque::new(),
        })
    }

    fn fetch(&self, uri: &str) -> SignplayResult<Vec<Frame>> {
        let response = self
            .client
            .get(uri)
            .send()
            .map_err(|e| SignplayError::fetch(format!("GET {uri}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SignplayError::fetch(format!("GET {uri}: status {status}")));
        }
        let body = response
            .text()
            .map_err(|e| SignplayError::fetch(format!("reading body of {uri}: {e}")))?;
        decode_landmark_document(&body)
    }
}

impl LandmarkFetcher for HttpLandmarkFetcher {
    fn begin_fetch(&mut self, uri: &str, token: Generation) {
        tracing::debug!(%uri, ?token, "queueing landmark fetch");
        self.pending.push_back((token, uri.to_string()));
    }

    fn poll(&mut self) -> Option<(Generation, SignplayResult<Vec<Frame>>)> {
        let (token, uri) = self.pending.pop_front()?;
        let result = self.fetch(&uri);
        if let Err(e) = &result {
            tracing::warn!(%uri, error = %e, "landmark fetch failed");
        }
        Some((token, result))
    }
}
