//! Image type sniffing for decoded provider output.

/// Image formats the provider is known to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
}

impl ImageKind {
    /// Identifies `bytes` by magic number; unknown data is treated as PNG.
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => ImageKind::Png,
            [0xFF, 0xD8, 0xFF, ..] => ImageKind::Jpeg,
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => ImageKind::Webp,
            _ => {
                tracing::warn!(
                    "Unknown image signature {:02X?}, saving as PNG",
                    &bytes[..bytes.len().min(4)]
                );
                ImageKind::Png
            }
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::Webp => "webp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flux_output_is_png() {
        let header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let kind = ImageKind::sniff(&header);
        assert_eq!(kind, ImageKind::Png);
        assert_eq!(kind.extension(), "png");
    }

    #[test]
    fn test_jpeg_and_webp_signatures() {
        assert_eq!(ImageKind::sniff(&[0xFF, 0xD8, 0xFF, 0xDB]), ImageKind::Jpeg);
        assert_eq!(ImageKind::sniff(b"RIFF\x24\x00\x00\x00WEBPVP8 "), ImageKind::Webp);
        assert_eq!(ImageKind::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageKind::Webp.extension(), "webp");
    }

    #[test]
    fn test_short_or_unknown_input_saves_as_png() {
        for bytes in [&b""[..], &b"GIF89a"[..], &[0xFF, 0xD8][..]] {
            assert_eq!(ImageKind::sniff(bytes), ImageKind::Png);
        }
    }

    #[test]
    fn test_riff_without_webp_tag_is_not_webp() {
        assert_eq!(ImageKind::sniff(b"RIFF\x24\x00\x00\x00WAVEfmt "), ImageKind::Png);
    }
}
