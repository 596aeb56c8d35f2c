use catalog_cascade::{EntityKind, FetchParams};
use serde_json::json;
use tracing::warn;

use super::{build_resolver, print_json};
use crate::cli::args::{ApiArgs, LoadArgs};
use crate::exit_codes;

pub async fn run(api: &ApiArgs, args: LoadArgs) -> anyhow::Result<i32> {
    let resolver = build_resolver(api, args.learning_units)?;

    let params = args
        .filters
        .into_iter()
        .fold(FetchParams::new(), |p, (k, v)| p.with_filter(k, v));

    let report = resolver.load_all(&params).await;
    let state = resolver.state().await;

    let counts: serde_json::Map<String, serde_json::Value> = EntityKind::ALL
        .iter()
        .filter(|kind| report.get(**kind).is_some())
        .map(|kind| (kind.as_str().to_string(), json!(state.collection_len(*kind))))
        .collect();

    print_json(&json!({
        "counts": counts,
        "report": report,
        "error": state.error,
    }))?;

    if report.is_ok() {
        Ok(exit_codes::SUCCESS)
    } else {
        if let Some(error) = &state.error {
            warn!(%error, "catalog load incomplete");
        }
        Ok(exit_codes::FETCH_FAILED)
    }
}
