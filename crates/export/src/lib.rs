//! Custom export formats for BibShelf.
//!
//! [`CustomExportList`] keeps the user's export format descriptors sorted and in
//! sync with a [`bibshelf_settings::PreferenceStore`]; [`build_format`] turns a
//! descriptor into a runnable [`ExportFormat`].

mod custom;
mod error;
mod format;
mod journals;
mod preferences;

pub use custom::{compare_by_name, CustomExportList, DescriptorComparator};
pub use error::ExportError;
pub use format::{build_format, ExportFormat, FormatDescriptor};
pub use journals::JournalAbbreviationLoader;
pub use preferences::{LayoutFormatterPreferences, SavePreferences, SortCriterion};
