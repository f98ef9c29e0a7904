use fbgraph_api::{GraphClient, ImageSpec, ImageType};

use crate::cli::{GlobalOpts, ImageArgs};
use crate::error::CliError;

fn image_spec(args: &ImageArgs) -> Result<ImageSpec, CliError> {
    match (args.image_type.as_deref(), args.width, args.height) {
        (Some(raw), _, _) => raw.parse::<ImageType>().map(ImageSpec::Type).map_err(|_| {
            CliError::Validation {
                field: "type".into(),
                reason: format!("expected square, small, normal, large, or album, got '{raw}'"),
            }
        }),
        (None, Some(width), Some(height)) => Ok(ImageSpec::Size { width, height }),
        _ => Ok(ImageSpec::Type(ImageType::Normal)),
    }
}

pub async fn handle(client: &GraphClient, args: ImageArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let spec = image_spec(&args)?;
    let bytes = client.fetch_image(&args.id, &args.connection, spec).await?;
    tokio::fs::write(&args.out, &bytes).await?;
    if !global.quiet {
        eprintln!("Wrote {} bytes to {}", bytes.len(), args.out.display());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(image_type: Option<&str>, size: Option<(u32, u32)>) -> ImageArgs {
        ImageArgs {
            id: "me".into(),
            connection: "picture".into(),
            image_type: image_type.map(str::to_owned),
            width: size.map(|s| s.0),
            height: size.map(|s| s.1),
            out: PathBuf::from("pic.jpg"),
        }
    }

    #[test]
    fn type_is_case_insensitive() {
        assert_eq!(
            image_spec(&args(Some("LARGE"), None)).unwrap(),
            ImageSpec::Type(ImageType::Large)
        );
    }

    #[test]
    fn explicit_size_wins_over_default() {
        assert_eq!(
            image_spec(&args(None, Some((200, 100)))).unwrap(),
            ImageSpec::Size { width: 200, height: 100 }
        );
        assert_eq!(image_spec(&args(None, None)).unwrap(), ImageSpec::Type(ImageType::Normal));
    }

    #[test]
    fn unknown_type_is_a_usage_error() {
        assert!(matches!(
            image_spec(&args(Some("huge"), None)),
            Err(CliError::Validation { .. })
        ));
    }
}
