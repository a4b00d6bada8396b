//! Stateless display helpers: extension icons, human sizes, timestamps.

use chrono::{DateTime, Utc};
use humansize::BINARY;

/// Glyph used for extensions missing from the icon table.
pub const DEFAULT_ICON: &str = "📎";

/// Timestamp layout used in reports and in the relational `modified`/`created`
/// columns. Lexical order of this layout equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Map a lowercased, dot-prefixed extension to its display icon.
pub fn icon_for(extension: &str) -> &'static str {
    match extension {
        ".pdf" => "📄",
        ".doc" | ".docx" | ".txt" | ".rtf" | ".md" | ".odt" => "📝",
        ".xls" | ".xlsx" | ".csv" | ".ods" => "📊",
        ".ppt" | ".pptx" | ".key" | ".odp" => "📊",
        ".jpg" | ".jpeg" | ".png" | ".gif" | ".bmp" | ".svg" | ".webp" | ".ico" | ".heic"
        | ".raw" | ".tiff" | ".tif" => "🖼️",
        ".mp4" | ".avi" | ".mov" | ".mkv" | ".wmv" | ".flv" | ".webm" | ".m4v" | ".mxf"
        | ".r3d" => "🎬",
        ".mp3" | ".wav" | ".flac" | ".aac" | ".ogg" | ".m4a" | ".wma" => "🎵",
        ".zip" | ".rar" | ".7z" | ".tar" | ".gz" | ".bz2" | ".xz" => "📦",
        ".py" | ".js" | ".html" | ".css" | ".java" | ".cpp" | ".c" | ".h" | ".php" | ".rb"
        | ".go" | ".rs" | ".swift" | ".kt" | ".ts" | ".jsx" | ".tsx" | ".vue" | ".json"
        | ".xml" | ".yaml" | ".yml" | ".sh" | ".bat" => "💻",
        ".exe" | ".app" | ".dmg" | ".pkg" | ".deb" | ".rpm" => "⚙️",
        ".db" | ".sqlite" | ".sql" => "🗄️",
        ".ttf" | ".otf" | ".woff" | ".woff2" => "🔤",
        _ => DEFAULT_ICON,
    }
}

pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, BINARY)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_icon_for_known_and_unknown() {
        assert_eq!(icon_for(".txt"), "📝");
        assert_eq!(icon_for(".rs"), "💻");
        assert_eq!(icon_for(".mkv"), "🎬");
        assert_eq!(icon_for(".nope"), DEFAULT_ICON);
        assert_eq!(icon_for("(none)"), DEFAULT_ICON);
    }

    #[test]
    fn test_format_size_uses_binary_units() {
        assert!(format_size(10).ends_with('B'));
        assert!(format_size(1536).contains("KiB"));
        assert!(format_size(3 * 1024 * 1024).contains("MiB"));
    }

    #[test]
    fn test_format_timestamp_is_sortable_text() {
        let early = Utc.with_ymd_and_hms(2023, 9, 30, 23, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&early), "2023-09-30 23:59:59");
        assert!(format_timestamp(&early) < format_timestamp(&late));
    }
}
