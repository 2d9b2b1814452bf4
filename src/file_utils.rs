/// MIME type the file picker is restricted to, and the type given to the
/// downloaded blob.
pub const PDF_MIME: &str = "application/pdf";

/// Checks the `%PDF` header at the start of a document.
///
/// Some producers emit a few bytes of junk before the header, so the first
/// 1024 bytes are searched, as PDF readers tolerate.
pub fn has_pdf_magic(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024)];
    window.windows(4).any(|w| w == b"%PDF")
}

/// Returns true when the filename carries a `.pdf` extension (case-insensitive).
pub fn has_pdf_extension(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Formats a byte count as a human-readable string.
///
/// # Example
///
/// ```ignore
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
