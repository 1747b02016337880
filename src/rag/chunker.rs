//! Text preparation for ingestion: markup stripping and fixed-size
//! overlapping windows.

use std::sync::LazyLock;

use regex::Regex;

/// Window size in characters.
pub const CHUNK_SIZE: usize = 1200;
/// Overlap between consecutive windows, so no content boundary is lost
/// mid-window for downstream similarity search.
pub const CHUNK_OVERLAP: usize = 150;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").expect("script pattern must compile"));
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").expect("style pattern must compile"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("tag pattern must compile"));

/// Strips script/style blocks and tags, then collapses all whitespace
/// runs to single spaces.
pub fn strip_html(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, " ");
    let without_tags = TAG.replace_all(&without_styles, " ");

    without_tags
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits text into overlapping character windows. The step between
/// window starts is `size - overlap`; blank windows are skipped.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        if !window.trim().is_empty() {
            chunks.push(window);
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_styles_and_tags() {
        let html = r#"
            <html>
            <head><script>var x = 1;</script><style>body { color: red }</style></head>
            <body>
                <h1>Hallo</h1>
                <p>Welt</p>
            </body>
            </html>
        "#;

        let text = strip_html(html);
        assert_eq!(text, "Hallo Welt");
        assert!(!text.contains("var x"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn multiline_script_blocks_are_removed() {
        let html = "<script>\nlet a = 1;\nlet b = 2;\n</script>Inhalt";
        assert_eq!(strip_html(html), "Inhalt");
    }

    #[test]
    fn windows_overlap_by_the_configured_amount() {
        let text = "abcdefghij";
        let chunks = chunk_text(text, 4, 2);

        assert_eq!(chunks[0], "abcd");
        assert_eq!(chunks[1], "cdef");
        assert_eq!(chunks[2], "efgh");
        // every window starts `size - overlap` characters after the last
        assert_eq!(chunks.len(), 5);
    }

    #[test]
    fn short_text_yields_a_single_window() {
        let chunks = chunk_text("kurz", CHUNK_SIZE, CHUNK_OVERLAP);
        assert_eq!(chunks, vec!["kurz".to_string()]);
    }

    #[test]
    fn empty_and_blank_text_yield_no_windows() {
        assert!(chunk_text("", CHUNK_SIZE, CHUNK_OVERLAP).is_empty());
        assert!(chunk_text("   ", 2, 1).is_empty());
    }
}
