//! Shared helpers for command handlers.

use std::io::IsTerminal;

use fbgraph_api::{FieldSelector, Params, PagingCursor};

use crate::cli::PageArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

pub fn field_selector(raw: Option<&str>) -> FieldSelector {
    raw.map(FieldSelector::parse).unwrap_or_default()
}

pub fn params_from(pairs: Vec<(String, String)>) -> Params {
    let mut params = Params::new();
    for (key, value) in pairs {
        params.insert(key, value);
    }
    params
}

/// The paging window requested on the command line, if any.
pub fn cursor_from(page: &PageArgs) -> Result<Option<PagingCursor>, CliError> {
    if let Some(ref url) = page.page_url {
        return PagingCursor::from_url(url)
            .map(Some)
            .ok_or_else(|| CliError::Validation {
                field: "page-url".into(),
                reason: format!("not an absolute URL: {url}"),
            });
    }
    let mut cursor = PagingCursor::new();
    let mut set = false;
    if let Some(limit) = page.limit {
        cursor = cursor.with_limit(limit);
        set = true;
    }
    if let Some(offset) = page.offset {
        cursor = cursor.with_offset(offset);
        set = true;
    }
    if let Some(since) = page.since {
        cursor = cursor.with_since(since);
        set = true;
    }
    if let Some(until) = page.until {
        cursor = cursor.with_until(until);
        set = true;
    }
    if let Some(ref after) = page.after {
        cursor = cursor.with_after(after.clone());
        set = true;
    }
    if let Some(ref before) = page.before {
        cursor = cursor.with_before(before.clone());
        set = true;
    }
    Ok(set.then_some(cursor))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page() -> PageArgs {
        PageArgs {
            limit: None,
            after: None,
            before: None,
            since: None,
            until: None,
            offset: None,
            page_url: None,
        }
    }

    #[test]
    fn no_window_means_no_cursor() {
        assert!(cursor_from(&page()).unwrap().is_none());
    }

    #[test]
    fn window_flags_build_a_cursor() {
        let cursor = cursor_from(&PageArgs {
            limit: Some(5),
            after: Some("XYZ".into()),
            ..page()
        })
        .unwrap()
        .unwrap();
        assert_eq!(cursor.limit(), Some(5));
        assert_eq!(cursor.after(), Some("XYZ"));
        assert!(cursor.full_url().is_none());
    }

    #[test]
    fn page_url_keeps_the_full_url() {
        let url = "https://graph.facebook.com/v19.0/me/feed?limit=5&after=QVFI";
        let cursor = cursor_from(&PageArgs {
            page_url: Some(url.into()),
            ..page()
        })
        .unwrap()
        .unwrap();
        assert_eq!(cursor.full_url(), Some(url));
        assert_eq!(cursor.after(), Some("QVFI"));
    }

    #[test]
    fn relative_page_url_is_rejected() {
        let err = cursor_from(&PageArgs {
            page_url: Some("/me/feed?after=x".into()),
            ..page()
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn confirm_short_circuits_on_yes() {
        assert!(confirm("delete?", "delete", true).unwrap());
    }
}
