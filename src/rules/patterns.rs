//! Safe-pattern whitelist and attack-keyword signature sets. Plain
//! substrings, matched case-insensitively against the classification text.
//! The whitelist exists to kill false positives on operational chatter;
//! the keyword set only carries unambiguous attack indicators.

use serde::{Deserialize, Serialize};

/// Substrings guaranteed to indicate benign content. A match is an absolute
/// override to NORMAL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafePatternSet {
    patterns: Vec<String>,
}

impl SafePatternSet {
    pub fn builtin() -> Self {
        Self::new(
            [
                // Health check endpoints
                "/health",
                "/healthz",
                "/ready",
                "/readiness",
                "/liveness",
                "/api/v1/health",
                "/actuator/health",
                "/status",
                "/ping",
                // Normal OCPP heartbeats and operations
                "heartbeat",
                "boot",
                "bootnotification",
                "statusnotification",
                "metervalues response",
                "datatransfer",
                "authorize response",
                // Normal HTTP responses
                "200 ok",
                "201 created",
                "204 no content",
                "302 redirect",
                // Normal charging operations
                "login success",
                "success",
                "completed",
                "connection established",
                "transaction id",
                "clock synced",
                // System lifecycle
                "service started",
                "configuration loaded",
                "scheduled task",
                "backup completed",
                "log rotation",
                // Successful authentication
                "authentication successful",
                "session created",
                "token refreshed",
                // Benign warnings, not attacks
                "low battery",
                "maintenance mode",
                "rate limit",
            ]
            .into_iter(),
        )
    }

    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(|p| p.into().to_lowercase()).collect(),
        }
    }

    /// First safe pattern contained in `text` (already lower-cased), if any.
    pub fn first_match<'a>(&'a self, text: &str) -> Option<&'a str> {
        self.patterns
            .iter()
            .find(|p| text.contains(p.as_str()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Substrings indicating a high-confidence attack signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackKeywordSet {
    keywords: Vec<String>,
}

impl AttackKeywordSet {
    pub fn builtin() -> Self {
        Self::new(
            [
                "flood",
                "flooding",
                "ddos",
                "dos_attack",
                "brute_force",
                "bruteforce",
                "injection",
                "sql_injection",
                "xss",
                "malware",
                "trojan",
                "backdoor",
                "exploit",
                "payload",
                "shellcode",
                "rootkit",
                "keylogger",
                "unauthorized_access",
                "privilege_escalation",
                "lateral_movement",
                "data_exfiltration",
                "ransomware",
                "cryptominer",
                // Compound phrases, not single operational words
                "intrusion detected",
                "attack detected",
                "threat detected",
                "security breach",
                "malicious activity",
                "suspicious behavior",
            ]
            .into_iter(),
        )
    }

    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        }
    }

    /// First attack keyword contained in `text` (already lower-cased), if any.
    pub fn first_match<'a>(&'a self, text: &str) -> Option<&'a str> {
        self.keywords
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
