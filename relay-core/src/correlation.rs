//! Correlation of a submission with queue and history records
//!
//! Everything here is pure: the client fetches and decodes listings, then
//! hands the typed records to these functions.

use crate::domain::build::{BuildRecord, QueueItem};
use crate::domain::outcome::{BuildResult, Outcome};
use crate::domain::submission::Submission;
use crate::token::Token;

/// Result of scanning a build history for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMatch<'a> {
    None,
    One(&'a BuildRecord),
    /// The token matched this many records, which breaks token uniqueness
    Many(usize),
}

/// Finds the build carrying `token`
pub fn find_by_token<'a>(records: &'a [BuildRecord], token: &Token) -> TokenMatch<'a> {
    let mut matches = records
        .iter()
        .filter(|record| record.parameters.carries_token(token));

    match (matches.next(), matches.count()) {
        (None, _) => TokenMatch::None,
        (Some(record), 0) => TokenMatch::One(record),
        (Some(_), rest) => TokenMatch::Many(rest + 1),
    }
}

/// True iff some queued item carries `token`
pub fn queue_contains(items: &[QueueItem], token: &Token) -> bool {
    items.iter().any(|item| item.parameters.carries_token(token))
}

/// Log viewer URL: `<base>/<request_id>/<job_name>/<build_number>/`
pub fn result_url(base: &str, request_id: u64, job_name: &str, build_number: u64) -> String {
    format!(
        "{}/{}/{}/{}/",
        base.trim_end_matches('/'),
        request_id,
        job_name,
        build_number
    )
}

/// Turns the build matched for `submission` into an outcome
pub fn resolve_outcome(
    record: &BuildRecord,
    submission: &Submission,
    result_base: &str,
) -> Outcome {
    match &record.result {
        None => Outcome::Running {
            build_number: record.number,
        },
        Some(raw) => Outcome::Finished {
            build_number: Some(record.number),
            result: BuildResult::from(raw.as_str()),
            result_url: Some(result_url(
                result_base,
                submission.request_id(),
                submission.job_name(),
                record.number,
            )),
        },
    }
}
