//! User-defined export formats, mirrored to the preference store.
//!
//! Formats are read from `customExportFormat0`, `customExportFormat1`, ... and kept
//! sorted by the list's comparator. [`CustomExportList::store`] writes them back
//! positionally and purges any stale entries beyond the new length.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bibshelf_settings::keys::{self, CUSTOM_EXPORT_FORMAT};
use bibshelf_settings::PreferenceStore;

use crate::{
    build_format, ExportError, ExportFormat, FormatDescriptor, JournalAbbreviationLoader,
    LayoutFormatterPreferences, SavePreferences,
};

pub type DescriptorComparator = fn(&FormatDescriptor, &FormatDescriptor) -> Ordering;

/// 依顯示名稱排序。 / Orders descriptors by display name.
pub fn compare_by_name(a: &FormatDescriptor, b: &FormatDescriptor) -> Ordering {
    a.display_name().cmp(&b.display_name())
}

#[derive(Clone)]
pub struct CustomExportList {
    descriptors: Vec<FormatDescriptor>,
    formats: BTreeMap<String, ExportFormat>,
    comparator: DescriptorComparator,
}

impl fmt::Debug for CustomExportList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomExportList")
            .field("descriptors", &self.descriptors)
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for CustomExportList {
    fn default() -> Self {
        Self::new(compare_by_name)
    }
}

impl CustomExportList {
    pub fn new(comparator: DescriptorComparator) -> Self {
        Self {
            descriptors: Vec::new(),
            formats: BTreeMap::new(),
            comparator,
        }
    }

    /// 從偏好設定重新載入全部格式。 / Discards current state and reloads every stored format.
    ///
    /// Malformed entries are logged and skipped; they never abort the load.
    pub fn load(
        &mut self,
        prefs: &impl PreferenceStore,
        loader: Arc<JournalAbbreviationLoader>,
    ) -> &BTreeMap<String, ExportFormat> {
        self.formats.clear();
        self.descriptors.clear();

        let layout_preferences = LayoutFormatterPreferences::from_preferences(prefs, loader);
        let save_preferences = SavePreferences::load_for_export(prefs);

        let mut index = 0;
        loop {
            let key = keys::indexed(CUSTOM_EXPORT_FORMAT, index);
            let fields = prefs.get_string_list(&key);
            if fields.is_empty() {
                break;
            }
            let descriptor = FormatDescriptor::from(fields);
            match build_format(&descriptor, &layout_preferences, &save_preferences) {
                Ok(format) => self.insert(descriptor, format),
                Err(err) => {
                    let raw = prefs.get(&key).unwrap_or_default();
                    tracing::error!(
                        key = %key,
                        raw = %raw,
                        "error initializing custom export format from string: {err}"
                    );
                }
            }
            index += 1;
        }

        tracing::debug!(
            read = index,
            loaded = self.formats.len(),
            "loaded custom export formats"
        );
        &self.formats
    }

    /// 新增格式；同名時覆寫對照表但保留重複描述。 / Adds a format. A colliding console name
    /// replaces the mapped format, while the descriptor list keeps both entries.
    pub fn add(
        &mut self,
        descriptor: FormatDescriptor,
        layout_preferences: &LayoutFormatterPreferences,
        save_preferences: &SavePreferences,
    ) -> Result<(), ExportError> {
        let format = build_format(&descriptor, layout_preferences, save_preferences)?;
        self.insert(descriptor, format);
        Ok(())
    }

    /// Removes the format named by `descriptor` and the first descriptor equal to it.
    pub fn remove(
        &mut self,
        descriptor: &FormatDescriptor,
        layout_preferences: &LayoutFormatterPreferences,
        save_preferences: &SavePreferences,
    ) -> Result<(), ExportError> {
        let format = build_format(descriptor, layout_preferences, save_preferences)?;
        self.formats.remove(format.console_name());
        if let Some(position) = self.descriptors.iter().position(|d| d == descriptor) {
            self.descriptors.remove(position);
        }
        Ok(())
    }

    /// 將目前清單寫回偏好設定。 / Writes the list back positionally, then purges leftovers.
    pub fn store(&self, prefs: &mut impl PreferenceStore) {
        for (index, descriptor) in self.descriptors.iter().enumerate() {
            prefs.put_string_list(
                &keys::indexed(CUSTOM_EXPORT_FORMAT, index),
                descriptor.fields(),
            );
        }
        let purged = purge(self.descriptors.len(), prefs);
        tracing::debug!(
            stored = self.descriptors.len(),
            purged,
            "stored custom export formats"
        );
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in comparator order.
    pub fn sorted(&self) -> &[FormatDescriptor] {
        &self.descriptors
    }

    pub fn formats(&self) -> &BTreeMap<String, ExportFormat> {
        &self.formats
    }

    pub fn get(&self, console_name: &str) -> Option<&ExportFormat> {
        self.formats.get(console_name)
    }

    fn insert(&mut self, descriptor: FormatDescriptor, format: ExportFormat) {
        self.formats
            .insert(format.console_name().to_string(), format);
        let cmp = self.comparator;
        let position = self
            .descriptors
            .partition_point(|existing| cmp(existing, &descriptor) != Ordering::Greater);
        self.descriptors.insert(position, descriptor);
    }
}

/// Removes indexed entries from `from` until the first empty read. Returns the count removed.
fn purge(from: usize, prefs: &mut impl PreferenceStore) -> usize {
    let mut index = from;
    loop {
        let key = keys::indexed(CUSTOM_EXPORT_FORMAT, index);
        if prefs.get_string_list(&key).is_empty() {
            break;
        }
        prefs.remove(&key);
        index += 1;
    }
    index - from
}
