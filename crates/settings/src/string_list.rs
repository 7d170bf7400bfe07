//! `;` 分隔的字串清單編碼。 / Flat `;`-separated encoding for string lists.

const SEPARATOR: char = ';';
const ESCAPE: char = '\\';

/// 將清單編碼為單一字串。 / Encodes a list into a single preference value.
///
/// Separators and backslashes inside an element are escaped with a backslash,
/// so every element survives a later [`decode`] unchanged.
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
    let mut buf = String::new();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            buf.push(SEPARATOR);
        }
        for ch in item.as_ref().chars() {
            if ch == SEPARATOR || ch == ESCAPE {
                buf.push(ESCAPE);
            }
            buf.push(ch);
        }
    }
    buf
}

/// 將字串解碼為清單；空字串代表不存在。 / Decodes a stored value; the empty string means "no list".
pub fn decode(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some(escaped) => current.push(escaped),
                // A dangling escape at the end is kept literally.
                None => current.push(ESCAPE),
            },
            SEPARATOR => items.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    items.push(current);
    items
}
