use crate::config::DetectionConfig;
use serde::Serialize;
use std::fmt;

/// Why a request was considered suspicious
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionReason {
    SuspiciousKeywordInUrl,
    LongParametersInUrl,
    SuspiciousHttpMethod,
    SuspiciousUserAgent,
}

impl SuspicionReason {
    /// The snake_case name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            SuspicionReason::SuspiciousKeywordInUrl => "suspicious_keyword_in_url",
            SuspicionReason::LongParametersInUrl => "long_parameters_in_url",
            SuspicionReason::SuspiciousHttpMethod => "suspicious_http_method",
            SuspicionReason::SuspiciousUserAgent => "suspicious_user_agent",
        }
    }
}

impl fmt::Display for SuspicionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three parts of an HTTP request line plus the client's user agent
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub protocol: &'a str,
    pub user_agent: &'a str,
}

impl<'a> ParsedRequest<'a> {
    /// Split a request line such as `GET /index.html HTTP/1.1`.
    ///
    /// Returns `None` unless the line holds exactly three whitespace-separated tokens.
    pub fn parse(request_line: &'a str, user_agent: &'a str) -> Option<Self> {
        let mut tokens = request_line.split_whitespace();
        let method = tokens.next()?;
        let url = tokens.next()?;
        let protocol = tokens.next()?;
        if tokens.next().is_some() {
            return None;
        }
        Some(ParsedRequest {
            method,
            url,
            protocol,
            user_agent,
        })
    }
}

/// Classify a request and return every reason that applies, in a fixed order:
/// keyword, long parameter, method, user agent.
///
/// Malformed request lines never produce reasons.
pub fn classify(
    request_line: &str,
    user_agent: &str,
    config: &DetectionConfig,
) -> Vec<SuspicionReason> {
    match ParsedRequest::parse(request_line, user_agent) {
        Some(request) => classify_request(&request, config),
        None => Vec::new(),
    }
}

fn classify_request(
    request: &ParsedRequest<'_>,
    config: &DetectionConfig,
) -> Vec<SuspicionReason> {
    let mut reasons = Vec::new();

    if contains_any(request.url, &config.keywords) {
        reasons.push(SuspicionReason::SuspiciousKeywordInUrl);
    }
    if has_long_parameter(request.url, config.long_param_threshold) {
        reasons.push(SuspicionReason::LongParametersInUrl);
    }
    if config.methods.iter().any(|m| m == request.method) {
        reasons.push(SuspicionReason::SuspiciousHttpMethod);
    }
    if contains_any(request.user_agent, &config.user_agents) {
        reasons.push(SuspicionReason::SuspiciousUserAgent);
    }

    reasons
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| haystack.contains(needle.as_str()))
}

// Everything after the first '?' is the query; segments are split on '&'
// and measured in characters, not bytes.
fn has_long_parameter(url: &str, threshold: usize) -> bool {
    match url.split_once('?') {
        Some((_, query)) => query
            .split('&')
            .any(|param| param.chars().count() > threshold),
        None => false,
    }
}
