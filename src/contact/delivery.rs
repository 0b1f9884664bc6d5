//! Primary delivery path: POST the form to its backend endpoint.
//!
//! Client-side (hydrate): real HTTP via `gloo-net` with a multipart body.
//! Native builds: `HttpDelivery` reports a transport error so callers take the
//! fallback path; tests substitute their own [`Delivery`] implementation.
//!
//! ERROR HANDLING
//! ==============
//! Every failure collapses into [`DeliveryError`]. The controller absorbs it
//! into the `mailto:` fallback and never shows it to the user.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "delivery_test.rs"]
mod delivery_test;

/// Content negotiation header sent with every delivery.
pub const ACCEPT_JSON: (&str, &str) = ("Accept", "application/json");

/// Errors produced by the primary delivery path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The request never produced a response.
    #[error("delivery transport failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("delivery rejected: status {status}")]
    Rejected { status: u16 },
}

/// One outbound form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub endpoint: String,
    /// Field name/value pairs in form order.
    pub fields: Vec<(String, String)>,
}

impl DeliveryRequest {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Maps an HTTP status onto the delivery result. Any 2xx is success.
///
/// # Errors
///
/// Returns [`DeliveryError::Rejected`] for every status outside `200..=299`.
pub fn check_status(status: u16) -> Result<(), DeliveryError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(DeliveryError::Rejected { status })
    }
}

/// Async seam over the network. Enables mocking in tests.
#[async_trait::async_trait(?Send)]
pub trait Delivery {
    /// Send the request once. No retries.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] on transport failure or non-2xx status.
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), DeliveryError>;
}

/// Browser `fetch` delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDelivery;

#[async_trait::async_trait(?Send)]
impl Delivery for HttpDelivery {
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        #[cfg(feature = "hydrate")]
        {
            let body = web_sys::FormData::new().map_err(|e| DeliveryError::Transport(format!("{e:?}")))?;
            for (name, value) in &request.fields {
                body.append_with_str(name, value)
                    .map_err(|e| DeliveryError::Transport(format!("{e:?}")))?;
            }
            let resp = gloo_net::http::Request::post(&request.endpoint)
                .header(ACCEPT_JSON.0, ACCEPT_JSON.1)
                .body(body)
                .map_err(|e| DeliveryError::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;
            check_status(resp.status())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(DeliveryError::Transport("not available outside the browser".to_owned()))
        }
    }
}
