//! Blocking HTTP plumbing shared by the archive clients.

use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::error::ArchiveError;

/// Agent with a global timeout for every request it makes
pub fn agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Run a TAP synchronous query and decode the JSON body.
///
/// `params` are sent as URL query pairs and must include the ADQL text under
/// whatever key the service expects.
pub fn tap_query<T: DeserializeOwned>(
    agent: &Agent,
    url: &str,
    params: &[(&str, &str)],
) -> Result<T, ArchiveError> {
    debug!("TAP query to {url}: {params:?}");

    let mut request = agent.get(url);
    for (key, value) in params {
        request = request.query(*key, *value);
    }

    let response = request
        .call()
        .map_err(|e: ureq::Error| ArchiveError::network(url, e))?;

    if response.status() != 200 {
        return Err(ArchiveError::invalid(
            url,
            format!("HTTP status {}", response.status()),
        ));
    }

    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| ArchiveError::network(url, e))?;

    serde_json::from_str(&body).map_err(|e| ArchiveError::invalid(url, e.to_string()))
}

/// Quote a string literal for ADQL, doubling embedded single quotes
pub fn adql_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adql_string_escapes_quotes() {
        assert_eq!(adql_string("Kepler-22 b"), "'Kepler-22 b'");
        assert_eq!(adql_string("Barnard's b"), "'Barnard''s b'");
        assert_eq!(adql_string("''"), "''''''");
    }
}
