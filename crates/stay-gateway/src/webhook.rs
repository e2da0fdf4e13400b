//! # Capture Callback Verification
//!
//! Signature verification and parsing for NovaPay capture callbacks.
//!
//! The gateway signs `"{timestamp}.{payload}"` with HMAC-SHA256 and sends
//! the result in a `NovaPay-Signature` header of the form
//! `t=<unix>,v1=<hex>[,v1=<hex>...]`. A callback whose signature or payload
//! fails verification is rejected with an error and must cause no state
//! mutation downstream.

use chrono::Utc;
use serde::Deserialize;
use stay_core::{BookingError, BookingResult, CaptureNotice};
use tracing::debug;

/// Maximum accepted age of a signed callback, in seconds
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Verify a callback signature and parse the capture notice
pub fn verify_and_parse(
    webhook_secret: &str,
    payload: &[u8],
    signature: &str,
) -> BookingResult<CaptureNotice> {
    let sig_parts = parse_signature_header(signature)?;

    // Reject replays outside the tolerance window
    let now = Utc::now().timestamp();
    if (now - sig_parts.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(BookingError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!("{}.{}", sig_parts.timestamp, String::from_utf8_lossy(payload));
    let expected_sig = compute_hmac_sha256(webhook_secret, &signed_payload);

    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(BookingError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    parse_capture_payload(payload)
}

/// Parse a verified payload into a capture notice
pub fn parse_capture_payload(payload: &[u8]) -> BookingResult<CaptureNotice> {
    let event: CallbackEnvelope = serde_json::from_slice(payload).map_err(|e| {
        BookingError::WebhookParseError(format!("Failed to parse callback: {}", e))
    })?;

    debug!(event_id = %event.id, event_type = %event.event_type, "verified gateway callback");

    if event.event_type != "transaction.captured" {
        return Err(BookingError::WebhookParseError(format!(
            "Unsupported event type: {}",
            event.event_type
        )));
    }

    Ok(event.data)
}

#[derive(Debug, Deserialize)]
struct CallbackEnvelope {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: CaptureNotice,
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> BookingResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let kv: Vec<&str> = part.split('=').collect();
        if kv.len() != 2 {
            continue;
        }
        match kv[0] {
            "t" => {
                timestamp = kv[1].parse().ok();
            }
            "v1" => {
                signatures.push(kv[1].to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        BookingError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(BookingError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

pub(crate) fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stay_core::CaptureStatus;

    const SECRET: &str = "nwh_test_secret";

    fn capture_body(tx: &str) -> String {
        format!(
            r#"{{"id":"evt_1","type":"transaction.captured","data":{{"transaction_id":"{}","captured_amount":"300.00","status":"completed"}}}}"#,
            tx
        )
    }

    fn sign(body: &str, timestamp: i64) -> String {
        let sig = compute_hmac_sha256(SECRET, &format!("{}.{}", timestamp, body));
        format!("t={},v1={}", timestamp, sig)
    }

    #[test]
    fn test_valid_signature_parses_notice() {
        let body = capture_body("TX-1");
        let header = sign(&body, Utc::now().timestamp());

        let notice = verify_and_parse(SECRET, body.as_bytes(), &header).unwrap();
        assert_eq!(notice.transaction_id, "TX-1");
        assert_eq!(notice.captured_amount, dec!(300.00));
        assert_eq!(notice.status, CaptureStatus::Completed);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let body = capture_body("TX-1");
        let header = sign(&body, Utc::now().timestamp());
        let tampered = capture_body("TX-2");

        let err = verify_and_parse(SECRET, tampered.as_bytes(), &header);
        assert!(matches!(
            err,
            Err(BookingError::WebhookVerificationFailed(_))
        ));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let body = capture_body("TX-1");
        let header = sign(&body, Utc::now().timestamp() - SIGNATURE_TOLERANCE_SECS - 10);

        let err = verify_and_parse(SECRET, body.as_bytes(), &header);
        assert!(matches!(
            err,
            Err(BookingError::WebhookVerificationFailed(_))
        ));
    }

    #[test]
    fn test_missing_signature_parts() {
        let body = capture_body("TX-1");
        assert!(verify_and_parse(SECRET, body.as_bytes(), "v1=deadbeef").is_err());
        assert!(verify_and_parse(SECRET, body.as_bytes(), "t=12345").is_err());
    }

    #[test]
    fn test_second_v1_candidate_accepted() {
        // key-rotation style header: stale candidate first, valid one second
        let body = capture_body("TX-1");
        let ts = Utc::now().timestamp();
        let good = compute_hmac_sha256(SECRET, &format!("{}.{}", ts, body));
        let header = format!("t={},v1={},v1={}", ts, "0".repeat(64), good);

        assert!(verify_and_parse(SECRET, body.as_bytes(), &header).is_ok());
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        let body = r#"{"id":"evt_2","type":"transaction.refunded","data":{"transaction_id":"TX-1","captured_amount":"0","status":"completed"}}"#;
        let header = sign(body, Utc::now().timestamp());

        let err = verify_and_parse(SECRET, body.as_bytes(), &header);
        assert!(matches!(err, Err(BookingError::WebhookParseError(_))));
    }

    #[test]
    fn test_unknown_capture_status_maps_to_unknown() {
        let body = r#"{"id":"evt_3","type":"transaction.captured","data":{"transaction_id":"TX-1","captured_amount":"300.00","status":"on_hold"}}"#;
        let notice = parse_capture_payload(body.as_bytes()).unwrap();
        assert_eq!(notice.status, CaptureStatus::Unknown);
        assert!(!notice.is_success());
    }
}
