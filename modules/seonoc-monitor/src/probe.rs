use std::time::Duration;

use seonoc_common::types::{PingStatus, SoftBlockType};

const USER_AGENT: &str = "seonoc-monitor/0.1 (+https://seonoc.local)";
const BODY_CAP_BYTES: usize = 5 * 1024;
const ERROR_REASON_CAP: usize = 120;

/// Classified result of one HTTPS probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub status: PingStatus,
    pub http_code: Option<u16>,
    pub soft_block: Option<SoftBlockType>,
    pub reason: Option<String>,
}

impl ProbeOutcome {
    fn up(code: u16) -> Self {
        Self {
            status: PingStatus::Up,
            http_code: Some(code),
            soft_block: None,
            reason: None,
        }
    }

    fn down(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            status: PingStatus::Down,
            http_code: code,
            soft_block: None,
            reason: Some(reason.into()),
        }
    }

    fn soft_blocked(code: u16, block: SoftBlockType) -> Self {
        Self {
            status: PingStatus::SoftBlocked,
            http_code: Some(code),
            soft_block: Some(block),
            reason: Some(format!("Soft block: {}", block.as_str())),
        }
    }
}

/// Substring scan for challenge/captcha/geo/bot walls. Case-insensitive;
/// first family wins.
pub fn scan_soft_block(body: &str) -> Option<SoftBlockType> {
    let lower = body.to_lowercase();
    const CLOUDFLARE: [&str; 3] = ["cf-ray", "checking your browser", "challenge-platform"];
    const CAPTCHA: [&str; 3] = ["captcha", "recaptcha", "hcaptcha"];
    const GEO: [&str; 3] = ["access denied", "not available in your country", "region blocked"];
    const BOT: [&str; 3] = ["bot detected", "automated access", "please verify"];

    if CLOUDFLARE.iter().any(|m| lower.contains(m)) {
        return Some(SoftBlockType::CloudflareChallenge);
    }
    if CAPTCHA.iter().any(|m| lower.contains(m)) {
        return Some(SoftBlockType::Captcha);
    }
    if GEO.iter().any(|m| lower.contains(m)) {
        return Some(SoftBlockType::GeoBlocked);
    }
    if BOT.iter().any(|m| lower.contains(m)) {
        return Some(SoftBlockType::BotProtection);
    }
    None
}

/// Classify an HTTP response (status code + up to 5 KB of body).
pub fn classify_response(code: u16, body: &str) -> ProbeOutcome {
    match code {
        200..=399 => match scan_soft_block(body) {
            Some(block) => ProbeOutcome::soft_blocked(code, block),
            None => ProbeOutcome::up(code),
        },
        403 | 451 => match scan_soft_block(body) {
            Some(block) => ProbeOutcome::soft_blocked(code, block),
            None => ProbeOutcome::down(Some(code), format!("HTTP {code}")),
        },
        _ => ProbeOutcome::down(Some(code), format!("HTTP {code}")),
    }
}

/// Classify a transport-level failure.
pub fn classify_failure(is_timeout: bool, is_connect: bool, error_text: &str) -> ProbeOutcome {
    if is_timeout {
        return ProbeOutcome::down(None, "Connection Timeout");
    }
    let lower = error_text.to_lowercase();
    if lower.contains("dns") || lower.contains("getaddrinfo") {
        return ProbeOutcome::down(None, "DNS Error");
    }
    if is_connect {
        return ProbeOutcome::down(None, "Connection Failed");
    }
    let mut reason = error_text.to_string();
    reason.truncate(ERROR_REASON_CAP);
    ProbeOutcome::down(None, reason)
}

/// HTTPS prober: GET https://{domain} with redirect following, a hard
/// deadline, and a capped body read.
pub struct HttpProber {
    http: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { http }
    }

    pub async fn probe(&self, domain_name: &str) -> ProbeOutcome {
        let url = format!("https://{domain_name}");
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                return classify_failure(e.is_timeout(), e.is_connect(), &e.to_string());
            }
        };
        let code = response.status().as_u16();

        // Body only matters for the soft-block scan; read at most 5 KB.
        let mut body: Vec<u8> = Vec::with_capacity(BODY_CAP_BYTES);
        let mut stream = response;
        while body.len() < BODY_CAP_BYTES {
            match stream.chunk().await {
                Ok(Some(chunk)) => {
                    let remaining = BODY_CAP_BYTES - body.len();
                    body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
                }
                Ok(None) => break,
                Err(e) => {
                    if e.is_timeout() {
                        return classify_failure(true, false, &e.to_string());
                    }
                    break;
                }
            }
        }
        classify_response(code, &String::from_utf8_lossy(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_is_up() {
        let outcome = classify_response(200, "<html>welcome</html>");
        assert_eq!(outcome.status, PingStatus::Up);
        assert_eq!(outcome.http_code, Some(200));
        assert!(outcome.soft_block.is_none());
    }

    #[test]
    fn redirect_codes_are_up() {
        assert_eq!(classify_response(301, "").status, PingStatus::Up);
        assert_eq!(classify_response(302, "").status, PingStatus::Up);
    }

    #[test]
    fn cloudflare_challenge_detected() {
        let outcome = classify_response(200, "Checking your browser before accessing");
        assert_eq!(outcome.status, PingStatus::SoftBlocked);
        assert_eq!(outcome.soft_block, Some(SoftBlockType::CloudflareChallenge));
    }

    #[test]
    fn cf_ray_header_text_detected() {
        let outcome = classify_response(200, "<!-- cf-ray: 8abc -->");
        assert_eq!(outcome.soft_block, Some(SoftBlockType::CloudflareChallenge));
    }

    #[test]
    fn captcha_detected() {
        let outcome = classify_response(200, "please solve this reCAPTCHA");
        assert_eq!(outcome.status, PingStatus::SoftBlocked);
        assert_eq!(outcome.soft_block, Some(SoftBlockType::Captcha));
    }

    #[test]
    fn geo_block_detected() {
        let outcome = classify_response(451, "not available in your country");
        assert_eq!(outcome.status, PingStatus::SoftBlocked);
        assert_eq!(outcome.soft_block, Some(SoftBlockType::GeoBlocked));
    }

    #[test]
    fn bot_protection_detected() {
        let outcome = classify_response(403, "Automated access detected");
        assert_eq!(outcome.status, PingStatus::SoftBlocked);
        assert_eq!(outcome.soft_block, Some(SoftBlockType::BotProtection));
    }

    #[test]
    fn plain_403_is_down() {
        let outcome = classify_response(403, "forbidden");
        assert_eq!(outcome.status, PingStatus::Down);
        assert_eq!(outcome.reason.as_deref(), Some("HTTP 403"));
    }

    #[test]
    fn server_errors_are_down() {
        assert_eq!(classify_response(500, "oops").status, PingStatus::Down);
        assert_eq!(classify_response(503, "").status, PingStatus::Down);
    }

    #[test]
    fn timeout_reason() {
        let outcome = classify_failure(true, false, "operation timed out");
        assert_eq!(outcome.status, PingStatus::Down);
        assert_eq!(outcome.reason.as_deref(), Some("Connection Timeout"));
    }

    #[test]
    fn dns_reason() {
        let outcome = classify_failure(false, true, "dns error: failed to lookup");
        assert_eq!(outcome.reason.as_deref(), Some("DNS Error"));
        let outcome = classify_failure(false, false, "getaddrinfo ENOTFOUND");
        assert_eq!(outcome.reason.as_deref(), Some("DNS Error"));
    }

    #[test]
    fn connect_failure_reason() {
        let outcome = classify_failure(false, true, "connection refused");
        assert_eq!(outcome.reason.as_deref(), Some("Connection Failed"));
    }

    #[test]
    fn other_failures_truncate_message() {
        let long = "x".repeat(500);
        let outcome = classify_failure(false, false, &long);
        assert_eq!(outcome.reason.as_ref().map(String::len), Some(120));
    }

    #[test]
    fn soft_block_scan_is_case_insensitive() {
        assert_eq!(
            scan_soft_block("CHALLENGE-PLATFORM script"),
            Some(SoftBlockType::CloudflareChallenge)
        );
        assert_eq!(scan_soft_block("clean page"), None);
    }
}
