//! Response checks shared by every operation

use intake_core::{RemoteCallError, RemoteOperation};
use serde::de::DeserializeOwned;

/// Pass 2xx responses through; map anything else to [`RemoteCallError::Status`]
pub(crate) async fn check_response(
    operation: RemoteOperation,
    resp: reqwest::Response,
) -> Result<reqwest::Response, RemoteCallError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(%operation, status = status.as_u16(), "remote call rejected");
    Err(RemoteCallError::status(operation, status.as_u16(), body))
}

/// Map a client error, separating timeouts from other transport failures
pub(crate) fn transport_error(
    operation: RemoteOperation,
    timeout_ms: u64,
    err: &reqwest::Error,
) -> RemoteCallError {
    if err.is_timeout() {
        tracing::warn!(%operation, timeout_ms, "remote call timed out");
        RemoteCallError::Timeout {
            operation,
            after_ms: timeout_ms,
        }
    } else {
        tracing::warn!(%operation, error = %err, "remote call failed");
        RemoteCallError::transport(operation, err.to_string())
    }
}

/// Decode a JSON body
pub(crate) fn decode<T: DeserializeOwned>(
    operation: RemoteOperation,
    bytes: &[u8],
) -> Result<T, RemoteCallError> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::warn!(%operation, error = %e, "undecodable reply");
        RemoteCallError::Decode {
            operation,
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failure_is_typed() {
        let err = decode::<serde_json::Value>(RemoteOperation::SendOffer, b"{not json").unwrap_err();
        assert!(matches!(
            err,
            RemoteCallError::Decode {
                operation: RemoteOperation::SendOffer,
                ..
            }
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn decode_success() {
        let value: Vec<i64> = decode(RemoteOperation::SendOffer, b"[1,2]").unwrap();
        assert_eq!(value, vec![1, 2]);
    }
}
