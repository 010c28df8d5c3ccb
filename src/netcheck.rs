//! Network classification and public-IP lookup.
//!
//! Hosts behind restricted networks cannot reach the default installer
//! endpoints, so one best-effort geolocation query up front decides which
//! mirror set every later download step uses. The query runs once per
//! invocation; any failure (network error, HTTP error, unparseable body)
//! is inconclusive and conservatively selects the restricted set, which
//! works from everywhere.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Production geolocation endpoint.
pub const GEO_ENDPOINT: &str = "http://ip-api.com/json/";

/// Production public-IP endpoint; replies with the bare address.
pub const IP_ENDPOINT: &str = "https://api.ipify.org";

/// Which download endpoints later steps should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorSet {
    /// In-region mirrors reachable from restricted networks.
    Restricted,
    /// Default upstream endpoints.
    Global,
}

#[derive(Debug, Deserialize)]
struct GeoReply {
    #[serde(rename = "countryCode")]
    country_code: String,
}

fn client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .context("building HTTP client")
}

/// Query the geolocation endpoint and return the country code.
///
/// Callers fold the result through [`mirror_set_for`]; an `Err` here is
/// expected operation, not a fatal condition.
pub fn classify(endpoint: &str) -> Result<String> {
    let reply: GeoReply = client()?
        .get(endpoint)
        .send()
        .context("querying geolocation endpoint")?
        .error_for_status()
        .context("geolocation endpoint returned an error status")?
        .json()
        .context("decoding geolocation reply")?;

    Ok(reply.country_code)
}

/// Fold a classification outcome into a mirror choice. Inconclusive
/// results select the restricted set.
pub fn mirror_set_for(country: Result<String>) -> MirrorSet {
    match country {
        Ok(code) if code == "CN" => MirrorSet::Restricted,
        Ok(_) => MirrorSet::Global,
        Err(_) => MirrorSet::Restricted,
    }
}

/// Best-effort lookup of this host's public IP address.
pub fn public_ip(endpoint: &str) -> Result<String> {
    let body = client()?
        .get(endpoint)
        .send()
        .context("querying public-IP endpoint")?
        .error_for_status()
        .context("public-IP endpoint returned an error status")?
        .text()
        .context("reading public-IP reply")?;

    Ok(body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cn_code_selects_restricted_mirrors() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success","countryCode":"CN","query":"1.2.3.4"}"#)
            .create();

        let url = format!("{}/json/", server.url());
        let country = classify(&url);
        assert_eq!(country.as_deref().unwrap(), "CN");
        assert_eq!(mirror_set_for(country), MirrorSet::Restricted);
        mock.assert();
    }

    #[test]
    fn other_codes_select_global_mirrors() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/json/")
            .with_status(200)
            .with_body(r#"{"status":"success","countryCode":"DE"}"#)
            .create();

        let url = format!("{}/json/", server.url());
        assert_eq!(mirror_set_for(classify(&url)), MirrorSet::Global);
    }

    #[test]
    fn http_error_selects_restricted_mirrors() {
        let mut server = mockito::Server::new();
        server.mock("GET", "/json/").with_status(500).create();

        let url = format!("{}/json/", server.url());
        let country = classify(&url);
        assert!(country.is_err());
        assert_eq!(mirror_set_for(country), MirrorSet::Restricted);
    }

    #[test]
    fn unparseable_body_selects_restricted_mirrors() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/json/")
            .with_status(200)
            .with_body("not json at all")
            .create();

        let url = format!("{}/json/", server.url());
        assert_eq!(mirror_set_for(classify(&url)), MirrorSet::Restricted);
    }

    #[test]
    fn missing_country_code_selects_restricted_mirrors() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/json/")
            .with_status(200)
            .with_body(r#"{"status":"fail","message":"private range"}"#)
            .create();

        let url = format!("{}/json/", server.url());
        assert_eq!(mirror_set_for(classify(&url)), MirrorSet::Restricted);
    }

    #[test]
    fn unreachable_endpoint_selects_restricted_mirrors() {
        // Reserved TEST-NET address; connection refused or timed out either way.
        let country = classify("http://192.0.2.1:9/json/");
        assert_eq!(mirror_set_for(country), MirrorSet::Restricted);
    }

    #[test]
    fn public_ip_trims_reply() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body("203.0.113.7\n")
            .create();

        let ip = public_ip(&server.url()).unwrap();
        assert_eq!(ip, "203.0.113.7");
    }
}
