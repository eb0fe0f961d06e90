// src/models/registry.rs
//! Read-only registry records served to the dashboard.
//!
//! None of these are consulted by the workflow itself; they are display
//! fixtures for the statistics, institution, fraud-alert and chart panels.

use serde::{Deserialize, Serialize};

/// Aggregate counters for the statistics panel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_verifications: u64,
    pub institutions_connected: u32,
    pub fraud_detected: u32,
    /// Percentage, e.g. 98.7
    pub success_rate: f64,
}

/// A certificate known to the demo, with its issuing details.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SampleCertificate {
    /// Example: "JH/2024/BCA/001234"
    pub id: String,
    pub student_name: String,
    pub institution: String,
    pub degree: String,
    pub year: u16,
    pub grade: String,
    pub status: CertificateStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateStatus {
    Verified,
    Pending,
}

/// Row of the institution portal's issued-certificates table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    pub id: String,
    pub name: String,
    /// Short degree name, e.g. "BCA"
    pub degree: String,
    pub year: String,
    pub status: CertificateStatus,
}

/// A connected (or connecting) issuing institution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    pub name: String,
    /// Registry code, e.g. "RU001"
    pub code: String,
    pub location: String,
    pub certificates_issued: u64,
    pub integration_status: IntegrationStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationStatus {
    Active,
    Pending,
}

/// A previously detected fraud case.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FraudAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub institution: String,
    /// ISO date, e.g. "2025-09-05"
    pub detected_date: String,
    pub severity: Severity,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    Pie,
}

/// One named data series of a chart, aligned with the chart's labels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<u64>,
}

/// A fixed dashboard chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    /// Stable identifier, e.g. "verification-trend"
    pub id: String,
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}
