//! Shared helpers for command handlers.

use std::path::Path;

use estatelist_core::{ImageUpload, ListingId};

use crate::error::CliError;

/// Parse a listing id argument.
pub fn parse_listing_id(raw: &str) -> Result<ListingId, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "listing id".into(),
        reason: format!("'{raw}' is not a valid id"),
    })
}

/// Read an image file into an upload payload, inferring the content
/// type from the extension.
pub fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = std::fs::read(path).map_err(|e| CliError::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.bin".into());

    let content_type = match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };

    Ok(ImageUpload {
        file_name,
        content_type: content_type.into(),
        bytes,
    })
}

/// Prompt for a password without echo.
pub fn prompt_password(prompt: &str) -> Result<String, CliError> {
    rpassword::prompt_password(format!("{prompt}: ")).map_err(|e| CliError::Validation {
        field: "password".into(),
        reason: e.to_string(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Validation {
            field: "confirmation".into(),
            reason: e.to_string(),
        })
}
