//! JSON output formatting

use serde::Serialize;

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct TestItem {
        id: String,
        name: String,
    }

    #[test]
    fn test_format_json_is_unwrapped() {
        let items = vec![TestItem {
            id: "1".to_string(),
            name: "Test".to_string(),
        }];

        let result = format_json(&items).unwrap();

        assert!(result.starts_with('['));
        assert!(result.contains("\"id\": \"1\""));
        assert!(result.contains("\"name\": \"Test\""));
    }

    #[test]
    fn test_format_json_empty_vec() {
        let items: Vec<TestItem> = vec![];
        assert_eq!(format_json(&items).unwrap(), "[]");
    }
}
