pub mod keys;
pub mod preferences;
pub mod string_list;

pub use preferences::{MemoryPreferences, PreferenceStore, PreferencesError, PreferencesFile};
