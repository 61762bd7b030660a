//! Document type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad category of a document's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// PDF document.
    Pdf,
    /// Raster or vector image.
    Image,
    /// Word-processing document.
    Doc,
    /// Anything else.
    Other,
}

impl DocumentType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Doc => "doc",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "image" => Ok(Self::Image),
            "doc" => Ok(Self::Doc),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown document type: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PDF".parse::<DocumentType>(), Ok(DocumentType::Pdf));
        assert_eq!("image".parse::<DocumentType>(), Ok(DocumentType::Image));
        assert!("spreadsheet".parse::<DocumentType>().is_err());
    }
}
