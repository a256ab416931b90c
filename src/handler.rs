//! Invocation handler module
//!
//! Takes the first record's request out of an edge event, rewrites its URI
//! and hands back a new request value. The input event is never modified.

use std::io::{Read, Write};

use crate::event::{CloudFrontEvent, CloudFrontRequest, EventError};
use crate::rewrite;

/// Outcome of a single invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// URI as received from the platform
    pub original_uri: String,
    /// Request to forward
    pub request: CloudFrontRequest,
}

impl Invocation {
    /// Whether the URI was changed
    pub fn rewritten(&self) -> bool {
        self.original_uri != self.request.uri()
    }
}

/// Copy of `request` with its URI normalized
pub fn rewrite_request(request: &CloudFrontRequest, default_document: &str) -> CloudFrontRequest {
    request.with_uri(rewrite::normalize_with(request.uri(), default_document))
}

/// Rewrite the first record's request of `event`
///
/// Every URI is accepted; the only failure is an event with no records.
pub fn handle_event(
    event: &CloudFrontEvent,
    default_document: &str,
) -> Result<CloudFrontRequest, EventError> {
    let request = event.first_request()?;
    Ok(rewrite_request(request, default_document))
}

/// Like [`handle_event`], keeping the original URI alongside the result
pub fn invoke(event: &CloudFrontEvent, default_document: &str) -> Result<Invocation, EventError> {
    let request = event.first_request()?;
    Ok(Invocation {
        original_uri: request.uri().to_string(),
        request: rewrite_request(request, default_document),
    })
}

/// Read one event from `reader` and write the request to forward to `writer`
///
/// The request is written as a single JSON line. Nothing is written on error.
pub fn invoke_stream<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    default_document: &str,
) -> Result<Invocation, EventError> {
    let event = CloudFrontEvent::from_reader(reader)?;
    let invocation = invoke(&event, default_document)?;

    serde_json::to_writer(&mut writer, &invocation.request).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(invocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::DEFAULT_DOCUMENT;
    use serde_json::json;

    fn event_with_uri(uri: &str) -> CloudFrontEvent {
        serde_json::from_value(json!({
            "Records": [{
                "cf": {
                    "request": {
                        "clientIp": "198.51.100.7",
                        "method": "GET",
                        "querystring": "",
                        "uri": uri,
                        "headers": {
                            "user-agent": [{"key": "User-Agent", "value": "curl/8.0"}]
                        }
                    }
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_directory_request_rewritten() {
        let event = event_with_uri("/docs/");
        let request = handle_event(&event, DEFAULT_DOCUMENT).unwrap();

        assert_eq!(request.uri(), "/docs/index.html");
        let original = event.first_request().unwrap();
        for (key, value) in original.fields() {
            if key != "uri" {
                assert_eq!(&request.fields()[key], value, "field {key} changed");
            }
        }
        assert_eq!(request.fields().len(), original.fields().len());
    }

    #[test]
    fn test_input_event_untouched() {
        let event = event_with_uri("/docs/");
        let before = event.clone();
        let _ = handle_event(&event, DEFAULT_DOCUMENT).unwrap();
        assert_eq!(event, before);
    }

    #[test]
    fn test_file_request_passes_through() {
        let event = event_with_uri("/docs/guide.pdf");
        let request = handle_event(&event, DEFAULT_DOCUMENT).unwrap();
        assert_eq!(&request, event.first_request().unwrap());
    }

    #[test]
    fn test_empty_uri_passes_through() {
        let event = event_with_uri("");
        let request = handle_event(&event, DEFAULT_DOCUMENT).unwrap();
        assert_eq!(request.uri(), "");
    }

    #[test]
    fn test_only_first_record_used() {
        let event: CloudFrontEvent = serde_json::from_value(json!({
            "Records": [
                {"cf": {"request": {"uri": "/first/"}}},
                {"cf": {"request": {"uri": "/second/"}}}
            ]
        }))
        .unwrap();
        let request = handle_event(&event, DEFAULT_DOCUMENT).unwrap();
        assert_eq!(request.uri(), "/first/index.html");
    }

    #[test]
    fn test_no_records() {
        let event = CloudFrontEvent { record: None };
        assert!(matches!(
            handle_event(&event, DEFAULT_DOCUMENT),
            Err(EventError::NoRecords)
        ));
    }

    #[test]
    fn test_invocation_tracks_original() {
        let invocation = invoke(&event_with_uri("/"), DEFAULT_DOCUMENT).unwrap();
        assert_eq!(invocation.original_uri, "/");
        assert_eq!(invocation.request.uri(), "/index.html");
        assert!(invocation.rewritten());

        let invocation = invoke(&event_with_uri("/a.css"), DEFAULT_DOCUMENT).unwrap();
        assert!(!invocation.rewritten());
    }

    #[test]
    fn test_invoke_stream_writes_request() {
        let input = r#"{"Records":[{"cf":{"request":{"method":"GET","uri":"/docs/","querystring":"a=1"}}}]}"#;
        let mut output = Vec::new();

        let invocation = invoke_stream(input.as_bytes(), &mut output, DEFAULT_DOCUMENT).unwrap();
        assert!(invocation.rewritten());
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"method\":\"GET\",\"uri\":\"/docs/index.html\",\"querystring\":\"a=1\"}\n"
        );
    }

    #[test]
    fn test_invoke_stream_errors_write_nothing() {
        let mut output = Vec::new();
        let err = invoke_stream(&br#"{"Records":[]}"#[..], &mut output, DEFAULT_DOCUMENT)
            .unwrap_err();
        assert!(matches!(err, EventError::NoRecords));

        let err = invoke_stream(&b"{"[..], &mut output, DEFAULT_DOCUMENT).unwrap_err();
        assert_eq!(err.kind(), "InvalidEvent");
        assert!(output.is_empty());
    }
}
