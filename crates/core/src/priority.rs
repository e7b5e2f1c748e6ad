//! Priority scale shared by projects and tasks.

define_str_enum! {
    /// How urgent a project or task is.
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn parses_stored_values() {
        assert_eq!(Priority::from_str_value("urgent").unwrap(), Priority::Urgent);
        assert!(Priority::from_str_value("critical").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
