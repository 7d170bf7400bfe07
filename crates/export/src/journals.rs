use std::collections::BTreeMap;

const BUILTIN_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Journal of the ACM", "J. ACM"),
    ("Communications of the ACM", "Commun. ACM"),
    ("Physical Review Letters", "Phys. Rev. Lett."),
    ("Journal of Applied Physics", "J. Appl. Phys."),
    ("Nature Communications", "Nat. Commun."),
];

/// 期刊全名與縮寫對照。 / Journal full-name to abbreviation lookup handed to layout formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalAbbreviationLoader {
    by_name: BTreeMap<String, String>,
}

impl JournalAbbreviationLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 內建的常用期刊清單。 / Loader seeded with the built-in journal list.
    pub fn with_builtin() -> Self {
        let mut loader = Self::new();
        for (name, abbreviation) in BUILTIN_ABBREVIATIONS {
            loader.add(*name, *abbreviation);
        }
        loader
    }

    /// Adds or replaces a user abbreviation. Lookup ignores case.
    pub fn add(&mut self, name: impl AsRef<str>, abbreviation: impl Into<String>) {
        self.by_name
            .insert(normalize(name.as_ref()), abbreviation.into());
    }

    pub fn abbreviate(&self, name: &str) -> Option<&str> {
        self.by_name.get(&normalize(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
