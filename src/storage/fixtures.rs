// src/storage/fixtures.rs
//! In-memory fixture registries.
//!
//! The demo has no database: statistics, institutions, fraud alerts, the
//! issued-certificate table and the dashboard charts are fixed at compile
//! time and built lazily on first access. Everything is exposed read-only,
//! in source order.

use crate::models::registry::{
    CertificateStatus, Chart, ChartKind, ChartSeries, FraudAlert, Institution, IntegrationStatus,
    IssuedCertificate, SampleCertificate, Severity, Statistics,
};
use crate::models::verification::ExtractedFields;
use once_cell::sync::Lazy;

static STATISTICS: Statistics = Statistics {
    total_verifications: 45_678,
    institutions_connected: 127,
    fraud_detected: 89,
    success_rate: 98.7,
};

static SAMPLE_CERTIFICATES: Lazy<Vec<SampleCertificate>> = Lazy::new(|| {
    vec![
        SampleCertificate {
            id: "JH/2024/BCA/001234".to_string(),
            student_name: "Rahul Kumar Singh".to_string(),
            institution: "Ranchi University".to_string(),
            degree: "Bachelor of Computer Applications".to_string(),
            year: 2024,
            grade: "First Division".to_string(),
            status: CertificateStatus::Verified,
        },
        SampleCertificate {
            id: "JH/2023/MBA/005678".to_string(),
            student_name: "Priya Sharma".to_string(),
            institution: "Birsa Agricultural University".to_string(),
            degree: "Master of Business Administration".to_string(),
            year: 2023,
            grade: "First Division with Distinction".to_string(),
            status: CertificateStatus::Verified,
        },
    ]
});

static INSTITUTIONS: Lazy<Vec<Institution>> = Lazy::new(|| {
    vec![
        Institution {
            name: "Ranchi University".to_string(),
            code: "RU001".to_string(),
            location: "Ranchi".to_string(),
            certificates_issued: 15_234,
            integration_status: IntegrationStatus::Active,
        },
        Institution {
            name: "Birsa Agricultural University".to_string(),
            code: "BAU002".to_string(),
            location: "Ranchi".to_string(),
            certificates_issued: 8_967,
            integration_status: IntegrationStatus::Active,
        },
        Institution {
            name: "National Institute of Technology Jamshedpur".to_string(),
            code: "NITJ003".to_string(),
            location: "Jamshedpur".to_string(),
            certificates_issued: 12_456,
            integration_status: IntegrationStatus::Pending,
        },
    ]
});

static FRAUD_ALERTS: Lazy<Vec<FraudAlert>> = Lazy::new(|| {
    vec![
        FraudAlert {
            id: "FA001".to_string(),
            kind: "Tampered Grade".to_string(),
            institution: "Unknown".to_string(),
            detected_date: "2025-09-05".to_string(),
            severity: Severity::High,
            description: "Grade modification detected in MBA certificate".to_string(),
        },
        FraudAlert {
            id: "FA002".to_string(),
            kind: "Forged Signature".to_string(),
            institution: "Fake University XYZ".to_string(),
            detected_date: "2025-09-04".to_string(),
            severity: Severity::Critical,
            description: "Invalid institutional signature detected".to_string(),
        },
    ]
});

static ISSUED_CERTIFICATES: Lazy<Vec<IssuedCertificate>> = Lazy::new(|| {
    let row = |id: &str, name: &str, degree: &str, year: &str, status| IssuedCertificate {
        id: id.to_string(),
        name: name.to_string(),
        degree: degree.to_string(),
        year: year.to_string(),
        status,
    };
    vec![
        row("JH/2024/BCA/001234", "Rahul Kumar Singh", "BCA", "2024", CertificateStatus::Verified),
        row("JH/2024/MBA/001235", "Priya Sharma", "MBA", "2024", CertificateStatus::Pending),
        row("JH/2023/BTech/001236", "Amit Kumar", "B.Tech", "2023", CertificateStatus::Verified),
    ]
});

static CHARTS: Lazy<Vec<Chart>> = Lazy::new(|| {
    let chart = |id: &str, kind, title: &str, labels: &[&str], series: Vec<ChartSeries>| Chart {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        labels: labels.iter().map(|label| label.to_string()).collect(),
        series,
    };
    let series = |label: &str, data: &[u64]| ChartSeries {
        label: label.to_string(),
        data: data.to_vec(),
    };
    vec![
        chart(
            "verification-trend",
            ChartKind::Line,
            "Verification Trends",
            &["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep"],
            vec![series(
                "Verifications",
                &[1200, 1900, 3000, 2500, 3200, 4100, 3800, 4200, 4500],
            )],
        ),
        chart(
            "institution-distribution",
            ChartKind::Doughnut,
            "Institution Distribution",
            &["Ranchi University", "BAU", "NIT Jamshedpur", "Others"],
            vec![series("Certificates", &[15_234, 8_967, 12_456, 8_341])],
        ),
        chart(
            "institution-monthly",
            ChartKind::Bar,
            "Monthly Verifications",
            &["Jan", "Feb", "Mar", "Apr", "May", "Jun"],
            vec![series("Verifications", &[450, 620, 780, 590, 720, 850])],
        ),
        chart(
            "department-split",
            ChartKind::Pie,
            "Department Distribution",
            &["Engineering", "Arts", "Science", "Commerce", "Management"],
            vec![series("Share", &[35, 20, 25, 10, 10])],
        ),
        chart(
            "state-weekly",
            ChartKind::Line,
            "State-wide Activity",
            &["Week 1", "Week 2", "Week 3", "Week 4"],
            vec![
                series("Verified", &[850, 920, 1100, 1200]),
                series("Fraud Detected", &[5, 8, 12, 15]),
            ],
        ),
    ]
});

pub fn statistics() -> &'static Statistics {
    &STATISTICS
}

pub fn sample_certificates() -> &'static [SampleCertificate] {
    &SAMPLE_CERTIFICATES
}

pub fn institutions() -> &'static [Institution] {
    &INSTITUTIONS
}

pub fn fraud_alerts() -> &'static [FraudAlert] {
    &FRAUD_ALERTS
}

pub fn issued_certificates() -> &'static [IssuedCertificate] {
    &ISSUED_CERTIFICATES
}

pub fn charts() -> &'static [Chart] {
    &CHARTS
}

/// Fields the simulated scan "reads" from every upload.
///
/// Always the first sample certificate, whatever was uploaded.
pub fn scanned_fields() -> ExtractedFields {
    let cert = &SAMPLE_CERTIFICATES[0];
    let year = cert.year.to_string();
    ExtractedFields::from_values([
        cert.student_name.as_str(),
        cert.institution.as_str(),
        cert.degree.as_str(),
        year.as_str(),
        cert.grade.as_str(),
        cert.id.as_str(),
    ])
}
