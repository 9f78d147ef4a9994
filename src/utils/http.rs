// file: src/utils/http.rs
// description: shared helpers for the blob storage and search rest clients
// reference: https://docs.rs/reqwest

use crate::error::{LoaderError, Result};
use crate::utils::Validator;
use reqwest::{Response, Url};

const MAX_ERROR_BODY_CHARS: usize = 500;

pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| LoaderError::Config(format!("Invalid endpoint {}: {}", endpoint, e)))?;

    if url.cannot_be_a_base() {
        return Err(LoaderError::Config(format!(
            "Endpoint cannot be used as a base URL: {}",
            endpoint
        )));
    }

    Ok(url)
}

/// Appends percent-encoded path segments to `base`.
pub fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| LoaderError::Config(format!("Endpoint cannot be a base URL: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turns a non-2xx response into a `Service` error carrying the body.
pub async fn ensure_success(service: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_string()
    } else {
        Validator::truncate_text(body.trim(), MAX_ERROR_BODY_CHARS)
    };

    Err(LoaderError::service(service, status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_segments_encodes() {
        let base = parse_endpoint("http://127.0.0.1:10000/devstoreaccount1").unwrap();
        let url = join_segments(&base, &["csv", "my file.csv"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:10000/devstoreaccount1/csv/my%20file.csv"
        );
    }

    #[test]
    fn test_join_segments_on_bare_host() {
        let base = parse_endpoint("https://mysearch.search.windows.net").unwrap();
        let url = join_segments(&base, &["indexes", "csv-index"]).unwrap();
        assert_eq!(url.as_str(), "https://mysearch.search.windows.net/indexes/csv-index");
    }

    #[test]
    fn test_parse_endpoint_rejects_garbage() {
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(LoaderError::Config(_))
        ));
        assert!(matches!(
            parse_endpoint("mailto:someone@example.com"),
            Err(LoaderError::Config(_))
        ));
    }
}
