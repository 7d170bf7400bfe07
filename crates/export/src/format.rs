use std::fmt;
use std::path::{Path, PathBuf};

use crate::{ExportError, LayoutFormatterPreferences, SavePreferences};

const LAYOUT_SUFFIX: &str = ".layout";
const REQUIRED_FIELDS: usize = 3;

/// 使用者自訂匯出格式的原始欄位：`[名稱, 版面檔, 副檔名, ...]`。 /
/// Raw fields of a user-defined export format: `[display name, layout file, extension, ...]`.
///
/// Equality covers every field, including any beyond the third.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatDescriptor(Vec<String>);

impl FormatDescriptor {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_well_formed(&self) -> bool {
        self.0.len() >= REQUIRED_FIELDS
    }

    /// First field, used for sorting and as the console name.
    pub fn display_name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl From<Vec<String>> for FormatDescriptor {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// A runnable export format derived from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFormat {
    display_name: String,
    console_name: String,
    layout_base: String,
    directory: Option<PathBuf>,
    extension: String,
    layout_preferences: LayoutFormatterPreferences,
    save_preferences: SavePreferences,
    custom: bool,
}

impl ExportFormat {
    pub fn new(
        display_name: impl Into<String>,
        console_name: impl Into<String>,
        layout_base: impl Into<String>,
        directory: Option<PathBuf>,
        extension: impl Into<String>,
        layout_preferences: LayoutFormatterPreferences,
        save_preferences: SavePreferences,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            console_name: console_name.into(),
            layout_base: layout_base.into(),
            directory,
            extension: extension.into(),
            layout_preferences,
            save_preferences,
            custom: false,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn console_name(&self) -> &str {
        &self.console_name
    }

    /// Layout file reference without the `.layout` suffix.
    pub fn layout_base(&self) -> &str {
        &self.layout_base
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn layout_preferences(&self) -> &LayoutFormatterPreferences {
        &self.layout_preferences
    }

    pub fn save_preferences(&self) -> &SavePreferences {
        &self.save_preferences
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    pub fn set_custom(&mut self, custom: bool) {
        self.custom = custom;
    }

    pub fn layout_file_name(&self) -> String {
        format!("{}{LAYOUT_SUFFIX}", self.layout_base)
    }

    /// 版面檔的完整路徑。 / Layout file resolved against the format's directory, if any.
    pub fn layout_path(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.join(self.layout_file_name()),
            None => PathBuf::from(self.layout_file_name()),
        }
    }

    /// `report` + `txt` → `report.txt`; an extension stored as `.txt` works too.
    pub fn output_file_name(&self, stem: &str) -> String {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            format!("{stem}{}", self.extension)
        } else {
            format!("{stem}.{}", self.extension)
        }
    }
}

/// 由描述建立自訂匯出格式。 / Builds a custom export format from its descriptor.
///
/// Fails only when the descriptor has fewer than three fields. Field contents
/// are not validated further.
pub fn build_format(
    descriptor: &FormatDescriptor,
    layout_preferences: &LayoutFormatterPreferences,
    save_preferences: &SavePreferences,
) -> Result<ExportFormat, ExportError> {
    let fields = descriptor.fields();
    if !descriptor.is_well_formed() {
        return Err(ExportError::MalformedDescriptor {
            fields: fields.len(),
            raw: fields.to_vec(),
        });
    }

    let name = &fields[0];
    let layout_base = fields[1]
        .strip_suffix(LAYOUT_SUFFIX)
        .unwrap_or(fields[1].as_str());
    let mut format = ExportFormat::new(
        name.as_str(),
        name.as_str(),
        layout_base,
        None,
        fields[2].as_str(),
        layout_preferences.clone(),
        save_preferences.clone(),
    );
    format.set_custom(true);
    Ok(format)
}
