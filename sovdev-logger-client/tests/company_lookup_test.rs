//! Company lookup scenario test
//!
//! Drives the façade through the reference batch flow: a job starts, four
//! organization numbers are processed with per-item progress and a
//! transaction log each, one lookup fails with an exception, and the job
//! completes. Asserts the record counts and per-type breakdown the
//! external consistency checkers expect from this scenario.

mod common;

use common::{configure_file_sink, env_lock, read_records};
use sovdev_logger_client as sovdev;
use sovdev_logger_client::LogOptions;
use sovdev_logger_core::LogLevel;
use std::fmt;
use tempfile::tempdir;

#[derive(Debug)]
struct HttpError(String);

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HttpError {}

#[test]
fn test_company_lookup_scenario_counts() {
    let _guard = env_lock();
    let dir = tempdir().unwrap();
    configure_file_sink(dir.path());

    sovdev::initialize(
        "company-lookup",
        Some("1.0.0"),
        Some(std::collections::HashMap::from([(
            "BRREG".to_string(),
            "SYS1234567".to_string(),
        )])),
    )
    .unwrap();

    let organizations = ["971277882", "915933149", "974760673", "000000000"];
    let trace_id = sovdev::generate_trace_id();

    sovdev::log_job_status(
        LogLevel::Info,
        "main",
        "CompanyLookupBatch",
        "Started",
        "INTERNAL",
        Some(serde_json::json!({"total": organizations.len()})),
        Some(&trace_id),
    )
    .unwrap();

    for (index, org) in organizations.iter().enumerate() {
        sovdev::log_job_progress(
            LogLevel::Info,
            "lookup_company",
            org,
            (index + 1) as u64,
            organizations.len() as u64,
            "BRREG",
            None,
            Some(&trace_id),
        )
        .unwrap();

        if *org == "000000000" {
            let err = HttpError("404 Not Found".to_string());
            sovdev::log_with(
                LogLevel::Error,
                "lookup_company",
                &format!("Lookup failed for {org}"),
                "BRREG",
                LogOptions::new()
                    .with_input(serde_json::json!({"organisasjonsnummer": org}))
                    .with_exception(&err)
                    .with_trace_id(&trace_id),
            )
            .unwrap();
        } else {
            sovdev::log_with(
                LogLevel::Info,
                "lookup_company",
                &format!("Looking up company {org}"),
                "BRREG",
                LogOptions::new()
                    .with_input(serde_json::json!({"organisasjonsnummer": org}))
                    .with_response(serde_json::json!({"status": "ok"}))
                    .with_trace_id(&trace_id),
            )
            .unwrap();
        }
    }

    sovdev::log_job_status(
        LogLevel::Info,
        "main",
        "CompanyLookupBatch",
        "Completed",
        "INTERNAL",
        Some(serde_json::json!({"processed": organizations.len(), "failed": 1})),
        Some(&trace_id),
    )
    .unwrap();

    let records = read_records(&dir.path().join("dev.log"));
    assert_eq!(records.len(), 10);

    let count_of = |log_type: &str| {
        records
            .iter()
            .filter(|r| r["log_type"] == log_type)
            .count()
    };
    assert_eq!(count_of("job.status"), 2);
    assert_eq!(count_of("job.progress"), 4);
    assert_eq!(count_of("transaction"), 4);

    // One failed lookup lands in the error log
    let errors = read_records(&dir.path().join("error.log"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["exception_type"], "Error");
    assert_eq!(errors[0]["peer_service"], "SYS1234567");

    // All records correlate on the shared trace id and one session
    assert!(records
        .iter()
        .all(|r| r["trace_id"].as_str().unwrap() == trace_id));
    let session = records[0]["session_id"].as_str().unwrap();
    assert!(records.iter().all(|r| r["session_id"] == session));

    sovdev::flush();
}
