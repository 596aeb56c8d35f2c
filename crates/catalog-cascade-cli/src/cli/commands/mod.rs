use super::args::*;

pub mod check;
pub mod load;
pub mod options;

use anyhow::Context;
use catalog_cascade::{CascadeResolver, HttpGateway};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Load(args) => load::run(&cli.api, args).await,
        Command::Options(args) => options::run(&cli.api, args).await,
        Command::Check(args) => check::run(&cli.api, args).await,
    }
}

pub(crate) fn build_resolver(
    api: &ApiArgs,
    learning_units: bool,
) -> anyhow::Result<CascadeResolver<HttpGateway>> {
    let gateway_config = api.gateway_config();
    let gateway = HttpGateway::new(gateway_config.clone())
        .with_context(|| format!("failed to set up gateway for {}", gateway_config.url))?;
    Ok(CascadeResolver::new(gateway, api.resolver_config(learning_units)))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
