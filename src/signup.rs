//! Runner signup: read the races document, add a name, commit it back.

use crate::errors::AppError;
use crate::models::{RacesDocument, SignupRequest, SignupResponse};
use crate::storage::ContentStore;
use feruca::Collator;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const MIN_NAME_CHARS: usize = 2;
const CONFLICT_BACKOFF: Duration = Duration::from_millis(200);

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub race_id: String,
    pub name: String,
}

/// Parses a raw request body. An empty body reads as `{}`.
pub fn parse_request(body: &[u8]) -> Result<Signup, AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        SignupRequest::default()
    } else {
        serde_json::from_slice::<SignupRequest>(body).map_err(|_| missing_fields())?
    };
    validate(request)
}

pub fn validate(request: SignupRequest) -> Result<Signup, AppError> {
    let race_id = request.race_id.unwrap_or_default();
    let name = request.name.unwrap_or_default().trim().to_string();

    if race_id.is_empty() || name.chars().count() < MIN_NAME_CHARS {
        return Err(missing_fields());
    }
    Ok(Signup { race_id, name })
}

fn missing_fields() -> AppError {
    AppError::bad_request("Missing raceId or name")
}

/// Adds `name` to the race's runners unless a case-insensitive match exists,
/// then re-sorts the list. Only the matched race is touched. Returns the
/// race's runners after the change.
pub fn add_runner(
    doc: &mut RacesDocument,
    race_id: &str,
    name: &str,
) -> Result<Vec<String>, AppError> {
    let race = doc
        .races
        .iter_mut()
        .find(|race| race.id() == Some(race_id))
        .ok_or_else(|| AppError::not_found("Race not found"))?;

    let mut runners = race.runners().map_err(AppError::unexpected)?;
    let folded = name.to_lowercase();
    if !runners.iter().any(|runner| runner.to_lowercase() == folded) {
        runners.push(name.to_string());
    }
    sort_runners(&mut runners);
    race.set_runners(&runners);

    Ok(runners)
}

/// Unicode collation (CLDR root order), so accented names sit next to their
/// base letters and lowercase sorts before uppercase on ties.
pub fn sort_runners(runners: &mut [String]) {
    let mut collator = Collator::default();
    runners.sort_by(|a, b| collator.collate(a, b));
}

/// Runs the read-modify-write against the store. A stale-sha rejection is
/// retried up to `conflict_retries` times with a fresh read.
pub async fn run_signup(
    store: &dyn ContentStore,
    signup: &Signup,
    conflict_retries: u32,
) -> Result<SignupResponse, AppError> {
    let mut attempt = 0;
    loop {
        let file = store
            .read()
            .await
            .map_err(|err| AppError::upstream(format!("Failed to read {}", store.path()), err))?;

        let mut doc: RacesDocument = serde_json::from_str(&file.content)?;
        let runners = add_runner(&mut doc, &signup.race_id, &signup.name)?;

        let updated = serde_json::to_string_pretty(&doc)?;
        let message = format!("Add runner {} to {}", signup.name, signup.race_id);

        match store.write(&updated, &file.sha, &message).await {
            Ok(()) => {
                info!(race_id = %signup.race_id, runners = runners.len(), "runner signup committed");
                return Ok(SignupResponse {
                    ok: true,
                    race_id: signup.race_id.clone(),
                    name: signup.name.clone(),
                    runners,
                });
            }
            Err(err) if err.is_conflict() && attempt < conflict_retries => {
                attempt += 1;
                warn!(
                    race_id = %signup.race_id,
                    "stale sha on commit (attempt {}/{}), re-reading",
                    attempt,
                    conflict_retries + 1
                );
                sleep(CONFLICT_BACKOFF * attempt).await;
            }
            Err(err) => return Err(AppError::upstream("Failed to commit update", err)),
        }
    }
}
