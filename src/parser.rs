/// The quoted fields of an access-log line that the classifier needs
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFields<'a> {
    pub request_line: &'a str,
    pub user_agent: &'a str,
}

/// Index of the request line among the `"`-delimited segments
const REQUEST_SEGMENT: usize = 1;
/// Index of the user agent among the `"`-delimited segments
const USER_AGENT_SEGMENT: usize = 5;

/// Extract the request line and user agent from a combined-format log line.
///
/// Expected format (quoted fields at fixed positions):
///   IP - - [TIMESTAMP] "REQUEST" STATUS BYTES "REFERER" "USER_AGENT"
///
/// Example:
///   10.0.0.1 - - [10/Oct/2024:13:55:36 +0000] "GET /admin HTTP/1.1" 200 512 "-" "curl/7.68.0"
///
/// Returns `None` if splitting on `"` yields five or fewer segments.
pub fn extract_fields(line: &str) -> Option<RequestFields<'_>> {
    let segments: Vec<&str> = line.split('"').collect();
    if segments.len() <= USER_AGENT_SEGMENT {
        return None;
    }
    Some(RequestFields {
        request_line: segments[REQUEST_SEGMENT],
        user_agent: segments[USER_AGENT_SEGMENT],
    })
}

// ─── Unit Tests ──────────────────────────────────────────────────────────────
