//! Clipboard support for copying calculator results.

use arboard::Clipboard;

/// Copy a display value to the system clipboard.
///
/// Error sentinels are refused so a failed computation never lands on the
/// clipboard in place of a number.
pub fn copy_to_clipboard(value: &str) -> anyhow::Result<()> {
    if super::parse_leading_number(value).is_none() {
        anyhow::bail!("'{}' is not a number", value);
    }

    let mut clipboard = Clipboard::new()
        .map_err(|e| anyhow::anyhow!("Failed to access clipboard: {}", e))?;
    clipboard
        .set_text(value.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to copy to clipboard: {}", e))?;

    tracing::debug!(%value, "copied to clipboard");
    Ok(())
}
