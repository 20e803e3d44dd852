//! CLI probe for the Nug core.
//!
//! # Responsibility
//! - Verify `nug_core` linkage (`ping`, `version`).
//! - Decode a saved admin response file and print the boundary mappings.
//!
//! Logging is enabled when `NUG_LOG_DIR` is set; `NUG_LOG_LEVEL` overrides
//! the build-mode default.

use nug_core::{
    default_log_level, init_logging, parse_records, prepare_domain, Account, Cos, Domain,
    Mapping, RawRecord, Resource, ResourceKind, SubresourceLinks,
};
use serde_json::Value;
use std::process::ExitCode;

const USAGE: &str = "usage: nug_cli ping | version | decode <domain|cos|account> <response.xml>";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("NUG_LOG_DIR") {
        let level = std::env::var("NUG_LOG_LEVEL").unwrap_or_else(|_| default_log_level().into());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["ping"] => Ok(nug_core::ping().to_string()),
        ["version"] => Ok(nug_core::core_version().to_string()),
        ["decode", kind, path] => decode_file(kind, path),
        _ => Err(USAGE.to_string()),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn decode_file(kind: &str, path: &str) -> Result<String, String> {
    let kind = ResourceKind::parse(kind).ok_or_else(|| format!("unknown kind `{kind}`\n{USAGE}"))?;
    let xml = std::fs::read_to_string(path).map_err(|err| format!("cannot read `{path}`: {err}"))?;
    let records = parse_records(&xml, kind.as_str()).map_err(|err| err.to_string())?;
    log::info!(
        "event=cli_decode module=cli kind={kind} count={}",
        records.len()
    );

    let links = SubresourceLinks::default();
    let mappings = records
        .iter()
        .map(|record| flatten(kind, record, &links))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| err.to_string())?;

    serde_json::to_string_pretty(&Value::Array(
        mappings.into_iter().map(Value::Object).collect(),
    ))
    .map_err(|err| err.to_string())
}

fn flatten(
    kind: ResourceKind,
    record: &RawRecord,
    links: &SubresourceLinks,
) -> Result<Mapping, nug_core::DecodeError> {
    Ok(match kind {
        ResourceKind::Domain => prepare_domain(&Domain::decode(record)?, links),
        ResourceKind::Cos => Cos::decode(record)?.entity().to_mapping(),
        ResourceKind::Account => Account::decode(record)?.entity().to_mapping(),
    })
}
