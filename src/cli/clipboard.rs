//! System clipboard access for `show --copy`.

use std::thread;
use std::time::Duration;

use arboard::Clipboard;
use zeroize::Zeroizing;

use crate::errors::{PwVaultError, Result};

/// Copy `text` to the clipboard and, if `clear_after` is non-zero,
/// block for that long and then clear it.
///
/// The clipboard is only cleared if it still holds `text`, so anything
/// the user copied in the meantime is left alone.
pub fn copy_then_clear(text: &str, clear_after: Duration) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(|e| PwVaultError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| PwVaultError::ClipboardError(e.to_string()))?;

    if clear_after.is_zero() {
        return Ok(());
    }

    thread::sleep(clear_after);

    let current = clipboard.get_text().map(Zeroizing::new);
    if matches!(&current, Ok(c) if c.as_str() == text) {
        clipboard
            .clear()
            .map_err(|e| PwVaultError::ClipboardError(e.to_string()))?;
        tracing::debug!("clipboard cleared");
    }
    Ok(())
}
