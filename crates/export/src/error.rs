use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Descriptor with fewer than the three required fields.
    #[error("malformed export format descriptor with {fields} field(s): {raw:?}")]
    MalformedDescriptor { fields: usize, raw: Vec<String> },
}
