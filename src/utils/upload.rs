// src/utils/upload.rs

use std::path::Path;

use serde::Serialize;

/// What an uploaded study file is, judged by its extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Pdf,
    Image,
    PlainText,
}

impl MaterialKind {
    /// Returns `None` for missing or unsupported extensions.
    pub fn sniff(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();

        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp" => Some(Self::Image),
            "txt" | "md" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// A file received in a generation request.
#[derive(Debug, Clone)]
pub struct MaterialUpload {
    pub file_name: String,
    pub kind: MaterialKind,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_known_extensions() {
        assert_eq!(MaterialKind::sniff("notes.pdf"), Some(MaterialKind::Pdf));
        assert_eq!(MaterialKind::sniff("scan.JPG"), Some(MaterialKind::Image));
        assert_eq!(MaterialKind::sniff("chapter.tar.txt"), Some(MaterialKind::PlainText));
    }

    #[test]
    fn test_sniff_rejects_unknown() {
        assert_eq!(MaterialKind::sniff("slides.pptx"), None);
        assert_eq!(MaterialKind::sniff("README"), None);
        assert_eq!(MaterialKind::sniff(".pdf"), None);
    }
}
