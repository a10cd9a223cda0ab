//! Offset-cursor pagination over a COtrip listing endpoint.

use anyhow::{Context, Result};
use reqwest::{Method, Request, Url};
use tracing::info;

use crate::fetch::HttpClient;
use crate::types::{RawPage, RawRecord};

/// Response header carrying the cursor for the next page.
pub const NEXT_OFFSET: &str = "next-offset";

/// Cursor value the API sends on the last page instead of omitting the header.
pub const END_OF_PAGES: &str = "None";

/// Fetches every page of `path` under `base` and returns all records in
/// order.
///
/// The first request carries no `offset`; each later one passes the
/// `next-offset` value from the previous response. Paging stops once that
/// header is missing or equals [`END_OF_PAGES`]. Credentials are the
/// client's concern (see [`crate::fetch::auth::UrlParam`]).
///
/// # Errors
///
/// Any transport failure, non-success status, unreadable cursor header or
/// malformed body aborts the whole fetch.
#[tracing::instrument(skip(client, base), fields(base = %base))]
pub async fn fetch_all<C: HttpClient>(client: &C, base: &Url, path: &str) -> Result<Vec<RawRecord>> {
    let endpoint = base
        .join(path)
        .with_context(|| format!("invalid endpoint path '{path}'"))?;

    let mut records = Vec::new();
    let mut offset: Option<String> = None;
    let mut batch = 0usize;

    loop {
        info!(batch, "Fetching page");

        let mut url = endpoint.clone();
        if let Some(offset) = &offset {
            url.query_pairs_mut().append_pair("offset", offset);
        }

        let resp = client
            .execute(Request::new(Method::GET, url))
            .await
            .with_context(|| format!("request for page {batch} failed"))?
            .error_for_status()
            .with_context(|| format!("page {batch} returned an error status"))?;

        let next = resp
            .headers()
            .get(NEXT_OFFSET)
            .map(|v| v.to_str().map(str::to_owned))
            .transpose()
            .context("next-offset header is not valid UTF-8")?;

        let page: RawPage = resp
            .json()
            .await
            .with_context(|| format!("failed to parse page {batch}"))?;
        records.extend(page.features);

        match next {
            Some(cursor) if cursor != END_OF_PAGES => offset = Some(cursor),
            _ => break,
        }
        batch += 1;
    }

    info!(pages = batch + 1, total = records.len(), "Fetched all pages");
    Ok(records)
}
