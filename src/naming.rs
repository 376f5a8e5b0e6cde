//! Canonical filename templates: `Prefix` + zero-padded index + `.ext`.
//!
//! Every file the later workflow steps recognize follows one template:
//!
//! - `Lot001.jpg` → lot sticker images (`prefix = "Lot"`, `width = 3`)
//! - `Auction001.jpg` → auction photos (`prefix = "Auction"`, `width = 3`)
//!
//! Indices are 1-based. Downstream consumers depend on the exact prefix and
//! padding width, so both are fixed per template rather than inferred.

use serde::{Deserialize, Serialize};

/// Naming template producing `prefix + zeroPad(index, width) + "." + extension`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingTemplate {
    pub prefix: String,
    /// Minimum number of digits; indices needing more digits are not truncated.
    pub width: usize,
    /// Extension without the leading dot, e.g. `"jpg"`.
    pub extension: String,
}

impl NamingTemplate {
    pub fn new(prefix: impl Into<String>, width: usize, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            prefix: prefix.into(),
            width: width.max(1),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// `Lot###.jpg`
    pub fn lot() -> Self {
        Self::new("Lot", 3, "jpg")
    }

    /// `Auction###.jpg`
    pub fn auction() -> Self {
        Self::new("Auction", 3, "jpg")
    }

    /// Render the filename for a 1-based index.
    ///
    /// - `Lot`, 3, `jpg`, index 7 → `"Lot007.jpg"`
    /// - `Lot`, 3, `jpg`, index 1234 → `"Lot1234.jpg"`
    pub fn render(&self, index: usize) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            index,
            self.extension,
            width = self.width
        )
    }

    /// Parse a filename back into its index if it is canonical for this template.
    ///
    /// The prefix must match exactly, followed by at least `width` ASCII digits
    /// and the template extension (compared case-insensitively). Returns
    /// `None` for anything else, including `Lot1.jpg` under a width of 3.
    pub fn parse(&self, file_name: &str) -> Option<usize> {
        let rest = file_name.strip_prefix(self.prefix.as_str())?;
        let (digits, ext) = rest.rsplit_once('.')?;
        if !ext.eq_ignore_ascii_case(&self.extension) {
            return None;
        }
        if digits.len() < self.width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn is_canonical(&self, file_name: &str) -> bool {
        self.parse(file_name).is_some()
    }
}
