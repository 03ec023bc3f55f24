//! Retrieval of the service description.
//!
//! The core only ever sees bytes. This module turns the `DESCRIPTION` argument into them, either
//! by fetching an `http(s)://` URL or by reading a local file.
use anyhow::Context;

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub async fn load(source: &str) -> anyhow::Result<Vec<u8>> {
    if !is_url(source) {
        tracing::debug!(path = source, "reading description from file");
        return tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read '{source}'"));
    }

    tracing::debug!(url = source, "fetching description");

    let response = reqwest::get(source)
        .await
        .with_context(|| format!("Failed to fetch '{source}'"))?
        .error_for_status()
        .with_context(|| format!("Failed to fetch '{source}'"))?;

    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read the response from '{source}'"))?;

    Ok(bytes.to_vec())
}
