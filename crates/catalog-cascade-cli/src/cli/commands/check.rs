use catalog_cascade::{Consistency, FetchParams};
use serde_json::json;

use super::{build_resolver, print_json};
use crate::cli::args::{ApiArgs, CheckArgs};
use crate::exit_codes;

pub async fn run(api: &ApiArgs, args: CheckArgs) -> anyhow::Result<i32> {
    let resolver = build_resolver(api, false)?;

    let report = resolver.load_all(&FetchParams::new()).await;
    if !report.is_ok() {
        let state = resolver.state().await;
        print_json(&json!({ "report": report, "error": state.error }))?;
        return Ok(exit_codes::FETCH_FAILED);
    }

    let result = resolver
        .validate_consistency(Some(&args.subject), Some(&args.class))
        .await;
    print_json(&result)?;

    Ok(match result {
        Consistency::Valid => exit_codes::SUCCESS,
        Consistency::Invalid { .. } => exit_codes::INCONSISTENT,
    })
}
