//! Command dispatch: bridges CLI args -> `GraphClient` calls -> output formatting.

pub mod config_cmd;
pub mod image;
pub mod insights;
pub mod read;
pub mod util;
pub mod write;

use serde_json::json;

use fbgraph_api::GraphClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch a Graph-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &GraphClient, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Object(args) => read::object(client, args, global).await,
        Command::Connection(args) => read::connection(client, args, global).await,
        Command::Feed(args) => read::feed(client, args, global).await,
        Command::Publish(args) => write::publish(client, args, global).await,
        Command::Post(args) => write::post(client, args, global).await,
        Command::Delete(args) => write::delete(client, args, global).await,
        Command::Image(args) => image::handle(client, args, global).await,
        Command::Insights(args) => insights::handle(client, args, global).await,
        Command::Proof => proof(client, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

fn proof(client: &GraphClient, global: &GlobalOpts) -> Result<(), CliError> {
    let proof = client.app_secret_proof().ok_or_else(|| CliError::NoCredentials {
        profile: global.profile.clone().unwrap_or_else(|| "default".into()),
    })?;
    let out = output::render_single(
        global.output,
        &json!({ "appsecret_proof": proof.as_str() }),
        |_| proof.as_str().to_owned(),
        |_| proof.as_str().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
