/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Remove duplicate ids while keeping first-seen order.
pub fn dedupe_ids(ids: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_seen_order() {
        assert_eq!(dedupe_ids([3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(dedupe_ids(Vec::new()).is_empty());
    }
}
