use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Strip everything but digits and cap at the ten characters the intake
/// forms accept.
pub fn sanitize_phone(input: &str) -> String {
    let non_digits = Regex::new(r"[^0-9]").unwrap();
    let digits = non_digits.replace_all(input, "").into_owned();

    digits.chars().take(10).collect()
}

/// Split comma-separated keyword text into a trimmed, non-empty set.
/// Input without a comma still becomes a set of size one.
pub fn split_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Accepts a JSON array, a legacy comma-separated string, or null, always
/// producing a set. Older blog rows stored keywords as a raw string when the
/// input had no comma.
pub fn keyword_set<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<String>),
        One(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Many(set)) => set,
        Some(Raw::One(text)) => split_keywords(&text),
        None => Vec::new(),
    })
}

/// Null-tolerant list deserializer for columns that predate their default.
pub fn empty_if_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{sanitize_phone, split_keywords};

    #[test]
    fn test_phone_strips_formatting() {
        assert_eq!(sanitize_phone("98765-43210"), "9876543210");
        assert_eq!(sanitize_phone("+91 98765 43210"), "9198765432");
        assert_eq!(sanitize_phone("(987) 654-3210"), "9876543210");
    }

    #[test]
    fn test_phone_caps_at_ten() {
        assert_eq!(sanitize_phone("987654321098"), "9876543210");
    }

    #[test]
    fn test_phone_empty() {
        assert_eq!(sanitize_phone(""), "");
        assert_eq!(sanitize_phone("abc"), "");
    }

    #[test]
    fn test_keywords_basic() {
        assert_eq!(
            split_keywords("hire plumber, daily wage , jobs"),
            vec!["hire plumber", "daily wage", "jobs"]
        );
    }

    #[test]
    fn test_keywords_single_value() {
        assert_eq!(split_keywords("worker safety"), vec!["worker safety"]);
    }

    #[test]
    fn test_keywords_drops_empties() {
        assert_eq!(split_keywords(" , a,, b ,"), vec!["a", "b"]);
        assert!(split_keywords("  ").is_empty());
    }
}
