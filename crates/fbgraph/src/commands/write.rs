//! Publishing, raw POSTs, and deletes.

use std::path::Path;

use serde_json::{Value, json};

use fbgraph_api::{FormData, GraphClient};

use crate::cli::{DeleteArgs, GlobalOpts, PostArgs, PublishArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn form_from(fields: Vec<(String, String)>) -> FormData {
    fields
        .into_iter()
        .fold(FormData::new(), |form, (key, value)| form.text(key, value))
}

pub async fn publish(client: &GraphClient, args: PublishArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut form = form_from(args.fields);
    for (field, path) in args.files {
        let path = Path::new(&path);
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.clone());
        tracing::debug!(%field, %file_name, size = bytes.len(), "attaching file");
        form = form.attachment(field, file_name, args.content_type.clone(), bytes);
    }

    let id = client.publish(&args.id, &args.connection, form).await?;
    let out = output::render_single(
        global.output,
        &json!({ "id": id }),
        output::value_detail,
        output::value_id,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn post(client: &GraphClient, args: PostArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let value: Value = client
        .post(&args.id, args.connection.as_deref(), form_from(args.fields))
        .await?;
    let out = output::render_single(global.output, &value, output::value_detail, output::value_id)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn delete(client: &GraphClient, args: DeleteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = match args.connection {
        Some(ref conn) => format!("{}/{conn}", args.id),
        None => args.id.clone(),
    };
    if !util::confirm(&format!("Delete {target}?"), "delete", global.yes)? {
        return Ok(());
    }
    client
        .delete(&args.id, args.connection.as_deref(), &util::params_from(args.params))
        .await?;
    if !global.quiet {
        eprintln!("Deleted {target}");
    }
    Ok(())
}
