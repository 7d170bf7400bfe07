use std::collections::BTreeMap;
use std::sync::Arc;

use bibshelf_settings::keys;
use bibshelf_settings::PreferenceStore;

use crate::JournalAbbreviationLoader;

const DEFAULT_ENCODING: &str = "UTF-8";

/// 版面格式化器所需的設定。 / Settings consumed by layout formatters during an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutFormatterPreferences {
    /// Custom name formatters, keyed by formatter name.
    pub name_formatters: BTreeMap<String, String>,
    pub main_file_directory: Option<String>,
    pub journal_abbreviations: Arc<JournalAbbreviationLoader>,
}

impl LayoutFormatterPreferences {
    pub fn from_preferences(
        prefs: &impl PreferenceStore,
        loader: Arc<JournalAbbreviationLoader>,
    ) -> Self {
        let names = prefs.get_string_list(keys::NAME_FORMATTER_NAMES);
        let formats = prefs.get_string_list(keys::NAME_FORMATTER_FORMATS);
        if names.len() != formats.len() {
            tracing::warn!(
                names = names.len(),
                formats = formats.len(),
                "name formatter lists differ in length; extra entries ignored"
            );
        }
        let name_formatters = names.into_iter().zip(formats).collect();
        let main_file_directory = prefs
            .get(keys::FILE_DIRECTORY)
            .filter(|dir| !dir.trim().is_empty());

        Self {
            name_formatters,
            main_file_directory,
            journal_abbreviations: loader,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    pub field: String,
    pub descending: bool,
}

/// 匯出時的儲存設定。 / Save settings applied to export output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePreferences {
    pub encoding: String,
    pub save_in_original_order: bool,
    pub save_order: Vec<SortCriterion>,
    pub make_backup: bool,
}

impl Default for SavePreferences {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            save_in_original_order: false,
            save_order: Vec::new(),
            make_backup: false,
        }
    }
}

impl SavePreferences {
    pub fn load_for_export(prefs: &impl PreferenceStore) -> Self {
        let encoding = prefs
            .get(keys::DEFAULT_ENCODING)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENCODING.to_string());

        let save_order = [
            (keys::EXPORT_PRIMARY_SORT_FIELD, keys::EXPORT_PRIMARY_SORT_DESCENDING),
            (keys::EXPORT_SECONDARY_SORT_FIELD, keys::EXPORT_SECONDARY_SORT_DESCENDING),
            (keys::EXPORT_TERTIARY_SORT_FIELD, keys::EXPORT_TERTIARY_SORT_DESCENDING),
        ]
        .into_iter()
        .filter_map(|(field_key, descending_key)| {
            let field = prefs.get(field_key)?;
            if field.trim().is_empty() {
                return None;
            }
            Some(SortCriterion {
                field,
                descending: prefs.get_bool(descending_key, false),
            })
        })
        .collect();

        Self {
            encoding,
            save_in_original_order: prefs.get_bool(keys::EXPORT_IN_ORIGINAL_ORDER, false),
            save_order,
            make_backup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibshelf_settings::MemoryPreferences;

    #[test]
    fn save_preferences_defaults() {
        let prefs = MemoryPreferences::new();
        assert_eq!(SavePreferences::load_for_export(&prefs), SavePreferences::default());
    }

    #[test]
    fn save_order_skips_blank_fields() {
        let prefs: MemoryPreferences = [
            (keys::DEFAULT_ENCODING, "ISO-8859-1"),
            (keys::EXPORT_IN_ORIGINAL_ORDER, "true"),
            (keys::EXPORT_PRIMARY_SORT_FIELD, "author"),
            (keys::EXPORT_PRIMARY_SORT_DESCENDING, "true"),
            (keys::EXPORT_SECONDARY_SORT_FIELD, " "),
            (keys::EXPORT_TERTIARY_SORT_FIELD, "year"),
        ]
        .into_iter()
        .collect();

        let save = SavePreferences::load_for_export(&prefs);
        assert_eq!(save.encoding, "ISO-8859-1");
        assert!(save.save_in_original_order);
        assert_eq!(
            save.save_order,
            vec![
                SortCriterion {
                    field: "author".into(),
                    descending: true
                },
                SortCriterion {
                    field: "year".into(),
                    descending: false
                },
            ]
        );
    }

    #[test]
    fn layout_preferences_zip_name_formatters() {
        let mut prefs = MemoryPreferences::new();
        prefs.put_string_list(
            keys::NAME_FORMATTER_NAMES,
            &["short".to_string(), "orphan".to_string()],
        );
        prefs.put_string_list(keys::NAME_FORMATTER_FORMATS, &["<l>".to_string()]);
        prefs.put(keys::FILE_DIRECTORY, "/papers".to_string());

        let loader = Arc::new(JournalAbbreviationLoader::with_builtin());
        let layout = LayoutFormatterPreferences::from_preferences(&prefs, loader.clone());
        assert_eq!(layout.name_formatters.len(), 1);
        assert_eq!(layout.name_formatters.get("short").map(String::as_str), Some("<l>"));
        assert_eq!(layout.main_file_directory.as_deref(), Some("/papers"));
        assert!(Arc::ptr_eq(&layout.journal_abbreviations, &loader));
    }
}
