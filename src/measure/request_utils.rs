use reqwest::{
    RequestBuilder, Url,
    header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
};
use uuid::Uuid;

const CACHE_BUSTER_PARAM: &str = "cb";

pub(super) trait RequestBuilderExt {
    fn with_no_cache(self) -> Self;
    fn with_upload_headers(self, content_length: u64) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn with_no_cache(self) -> Self {
        self.header(CACHE_CONTROL, "no-cache")
    }

    fn with_upload_headers(self, content_length: u64) -> Self {
        self.header(CONTENT_TYPE, "text/plain")
            .header(CONTENT_LENGTH, content_length)
    }
}

/// Appends a nonce unique to this session and connection so intermediaries
/// never serve a cached body.
pub(super) fn cache_busted_url(url: &Url, session_nonce: &Uuid, index: usize) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut().append_pair(
        CACHE_BUSTER_PARAM,
        &format!("{}_{}", session_nonce.simple(), index),
    );
    url
}
