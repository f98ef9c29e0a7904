//! Object, connection, and feed reads.

use serde_json::Value;
use tabled::Tabled;

use fbgraph_api::models::Post;
use fbgraph_api::{GraphClient, PagedResult, PagingCursor};

use crate::cli::{ConnectionArgs, FeedArgs, GlobalOpts, ObjectArgs, OutputFormat, PageArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PostRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&Post> for PostRow {
    fn from(p: &Post) -> Self {
        Self {
            id: p.id.clone(),
            kind: p.post_type().unwrap_or("-").to_owned(),
            created: p
                .created_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            from: p
                .from
                .as_ref()
                .and_then(|r| r.name.clone())
                .unwrap_or_default(),
            message: output::truncate(
                p.message.as_deref().or(p.story.as_deref()).unwrap_or_default(),
                60,
            ),
        }
    }
}

pub async fn object(client: &GraphClient, args: ObjectArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let fields = util::field_selector(args.fields.as_deref());
    let params = util::params_from(args.params);
    let value: Value = client.fetch_object_with(&args.id, &fields, &params).await?;
    let out = output::render_single(global.output, &value, output::value_detail, output::value_id)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn connection(
    client: &GraphClient,
    args: ConnectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let page: PagedResult<Value> = match util::cursor_from(&args.page)? {
        Some(cursor) if cursor.full_url().is_some() => client.fetch_page(&cursor).await?,
        cursor => {
            let fields = util::field_selector(args.fields.as_deref());
            let params = util::params_from(args.params);
            client
                .fetch_connections(&args.id, &args.name, &fields, &params, cursor.as_ref())
                .await?
        }
    };
    let out = render_page(global.output, &page, |v| output::ValueRow::from(v), output::value_id)?;
    output::print_output(&out, global.quiet);
    hint_next_page(page.next_page(), global);
    Ok(())
}

pub async fn feed(client: &GraphClient, args: FeedArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let page = fetch_posts(client, &args.id, &args.connection, args.fields.as_deref(), &args.page).await?;
    let out = render_page(global.output, &page, |p| PostRow::from(p), |p| p.id.clone())?;
    output::print_output(&out, global.quiet);
    hint_next_page(page.next_page(), global);
    Ok(())
}

async fn fetch_posts(
    client: &GraphClient,
    id: &str,
    connection: &str,
    fields: Option<&str>,
    page: &PageArgs,
) -> Result<PagedResult<Post>, CliError> {
    let page = match util::cursor_from(page)? {
        Some(cursor) if cursor.full_url().is_some() => client.fetch_page(&cursor).await?,
        cursor => {
            client
                .fetch_connections(
                    id,
                    connection,
                    &util::field_selector(fields),
                    &fbgraph_api::Params::new(),
                    cursor.as_ref(),
                )
                .await?
        }
    };
    Ok(page)
}

/// Structured formats get the whole page (items plus cursors); table and
/// plain show the items only.
fn render_page<T, R>(
    format: OutputFormat,
    page: &PagedResult<T>,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table | OutputFormat::Plain => {
            output::render_list(format, page.items(), to_row, id_fn)
        }
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_single(format, page, |_| String::new(), |_| String::new())
        }
    }
}

fn hint_next_page(next: Option<&PagingCursor>, global: &GlobalOpts) {
    if global.quiet || !matches!(global.output, OutputFormat::Table) {
        return;
    }
    if let Some(url) = next.and_then(PagingCursor::full_url) {
        eprintln!("next page: --page-url '{url}'");
    }
}
