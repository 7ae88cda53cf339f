//! Ordered attack taxonomy for the charging ecosystem. First matching rule
//! wins, by rule order then keyword order within the rule; unmatched text
//! falls back to a per-source default category.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackRule {
    pub keywords: Vec<String>,
    pub category: String,
}

impl AttackRule {
    fn new(keywords: &[&str], category: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackRuleTable {
    rules: Vec<AttackRule>,
    /// Category used when no rule matches, per source identifier
    defaults: BTreeMap<String, String>,
    /// Category for unmatched text from sources without a default entry
    fallback: String,
}

impl AttackRuleTable {
    pub fn builtin() -> Self {
        let rules = vec![
            // OCPP protocol attacks
            AttackRule::new(&["injection", "ocpp_injection"], "OCPP Message Injection"),
            AttackRule::new(
                &["remotestop", "remotestart", "unauthorized"],
                "OCPP Unauthorized Command",
            ),
            AttackRule::new(
                &["transaction", "starttransaction", "stoptransaction"],
                "OCPP Transaction Manipulation",
            ),
            AttackRule::new(&["metervalues", "meter"], "Meter Value Fraud"),
            // Transport security
            AttackRule::new(&["tls", "ssl", "downgrade"], "TLS Downgrade Attack"),
            AttackRule::new(
                &["mitm", "man-in-the-middle", "intercept"],
                "Man-in-the-Middle Attack",
            ),
            AttackRule::new(&["certificate", "cert", "ssl_strip"], "Certificate Attack"),
            // Firmware and software
            AttackRule::new(&["firmware", "update", "flash"], "Firmware Injection"),
            AttackRule::new(&["malware", "trojan", "backdoor"], "Malware Deployment"),
            // Power and energy manipulation
            AttackRule::new(
                &["load_manipulation", "load", "kw", "power"],
                "Power Load Manipulation",
            ),
            AttackRule::new(
                &["energy", "wh", "kwh", "consumption"],
                "Energy Consumption Fraud",
            ),
            // Tariff and billing
            AttackRule::new(&["tariff", "billing", "price"], "Tariff Manipulation"),
            AttackRule::new(&["fraud"], "Billing Fraud"),
            // Authentication
            AttackRule::new(&["plate", "rfid", "card"], "Identity Spoofing"),
            AttackRule::new(
                &["brute", "force", "failed", "attempt"],
                "Brute Force Attack",
            ),
            AttackRule::new(&["credential", "password", "auth"], "Credential Theft"),
            // Network and infrastructure
            AttackRule::new(
                &["scan", "lateral", "lateral_movement", "recon"],
                "Network Reconnaissance",
            ),
            AttackRule::new(&["ddos", "flood", "dos", "syn"], "Denial of Service"),
            // In-vehicle bus
            AttackRule::new(
                &["can_bus", "can_id", "obd", "vehicle_bus", "0x"],
                "CAN Bus Attack",
            ),
            // Central system
            AttackRule::new(&["csms", "central", "backend", "api"], "CSMS Backend Attack"),
            AttackRule::new(&["rbac", "privilege", "admin"], "Privilege Escalation"),
            AttackRule::new(&["bypass"], "Security Bypass"),
            AttackRule::new(&["intrusion", "penetration"], "Intrusion Attempt"),
            AttackRule::new(&["attack"], "Direct Attack"),
            AttackRule::new(&["security", "alert"], "Security Alert"),
            AttackRule::new(&["alarm", "emergency"], "Emergency Alarm"),
            AttackRule::new(&["time_anomaly", "timestamp"], "Timing Anomaly"),
            AttackRule::new(&["cmd_rejected", "rejected"], "Command Rejected"),
            AttackRule::new(&["validation_fail", "validate"], "Validation Failure"),
            // Generic anomalies
            AttackRule::new(&["anomaly", "unusual", "abnormal"], "Charging Station Anomaly"),
        ];

        let defaults = [
            ("ocpp_gateway", "OCPP Protocol Anomaly"),
            ("ids_sensor", "IDS Security Anomaly"),
            ("backend_api", "Backend Security Anomaly"),
            ("grid_load", "Power Load Anomaly"),
            ("csms", "CSMS Communication Anomaly"),
            ("energy_meter", "Charging Station Anomaly"),
            ("can_bus", "CAN Bus Anomaly"),
            ("charge_kiosk", "Authentication Anomaly"),
            ("tariff_billing", "Tariff Anomaly"),
            ("charge_point", "OCPP Protocol Anomaly"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            rules,
            defaults,
            fallback: "Charging Station Anomaly".to_string(),
        }
    }

    /// Category of the first rule with a keyword contained in `text`
    /// (already lower-cased); the source default, then the generic fallback,
    /// when nothing matches.
    pub fn classify(&self, text: &str, source_id: &str) -> &str {
        for rule in &self.rules {
            if rule.keywords.iter().any(|k| text.contains(k.as_str())) {
                return &rule.category;
            }
        }
        self.defaults
            .get(source_id)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn rules(&self) -> &[AttackRule] {
        &self.rules
    }
}
