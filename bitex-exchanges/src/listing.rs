//! Raw JSON reads for calls that have no canonical record, such as pair
//! listings.

use bitex_core::client::ApiClient;
use bitex_core::signed_request::SigningStrategy;
use bitex_core::error::ContextExt;
use bitex_core::{Error, Result};
use serde_json::Value;

/// Sends an unauthenticated GET to `endpoint` and decodes the body, applying
/// the exchange's repair hook if the body does not decode as received.
pub(crate) async fn fetch_json<S: SigningStrategy>(
    client: &ApiClient<S>,
    endpoint: &str,
) -> Result<Value> {
    let descriptor = client.descriptor(endpoint).build(&client.rules())?;
    let response = client
        .request(&descriptor)
        .await
        .with_context(|| format!("fetching {} {endpoint}", client.strategy().exchange()))?;
    if !response.is_success() {
        return Err(Error::public_data_fetch(response.status, response.reason));
    }

    match serde_json::from_slice(&response.body) {
        Ok(value) => Ok(value),
        Err(err) => {
            let repaired = client
                .strategy()
                .response_repair()
                .and_then(|repair| repair(&response.body))
                .ok_or_else(|| Error::malformed_response(err.to_string(), &response.body))?;
            serde_json::from_slice(&repaired)
                .map_err(|e| Error::malformed_response(e.to_string(), &response.body))
        }
    }
}
