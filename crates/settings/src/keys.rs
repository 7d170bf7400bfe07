//! Preference keys shared across BibShelf crates.

/// Prefix of the indexed custom export format entries (`customExportFormat0`, ...).
pub const CUSTOM_EXPORT_FORMAT: &str = "customExportFormat";

pub const NAME_FORMATTER_NAMES: &str = "nameFormatterNames";
pub const NAME_FORMATTER_FORMATS: &str = "nameFormatterFormats";
pub const FILE_DIRECTORY: &str = "fileDirectory";

pub const DEFAULT_ENCODING: &str = "defaultEncoding";
pub const EXPORT_IN_ORIGINAL_ORDER: &str = "exportInOriginalOrder";
pub const EXPORT_PRIMARY_SORT_FIELD: &str = "exportPrimarySortField";
pub const EXPORT_PRIMARY_SORT_DESCENDING: &str = "exportPrimarySortDescending";
pub const EXPORT_SECONDARY_SORT_FIELD: &str = "exportSecondarySortField";
pub const EXPORT_SECONDARY_SORT_DESCENDING: &str = "exportSecondarySortDescending";
pub const EXPORT_TERTIARY_SORT_FIELD: &str = "exportTertiarySortField";
pub const EXPORT_TERTIARY_SORT_DESCENDING: &str = "exportTertiarySortDescending";

/// 組合索引式鍵名。 / Builds an indexed key such as `customExportFormat3`.
pub fn indexed(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}
