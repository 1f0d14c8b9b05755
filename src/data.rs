use chrono::NaiveDate;

/// A member's persisted score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub display_name: String,
    pub points: i64,
}

impl UserRecord {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            points: 0,
        }
    }
}

/// One day's arrivals, ordered by rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub arrivals: Vec<(String, u32)>,
}

impl DailyLog {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            arrivals: Vec::new(),
        }
    }

    pub fn rank_of(&self, user_id: &str) -> Option<u32> {
        self.arrivals
            .iter()
            .find(|(id, _)| id == user_id)
            .map(|(_, rank)| *rank)
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}

/// Key format shared by both store backends.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_is_iso_8601() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(day_key(date), "2024-03-07");
    }

    #[test]
    fn rank_lookup() {
        let mut log = DailyLog::empty(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert!(log.is_empty());
        log.arrivals.push(("a".to_string(), 1));
        log.arrivals.push(("b".to_string(), 2));
        assert_eq!(log.rank_of("b"), Some(2));
        assert_eq!(log.rank_of("c"), None);
        assert_eq!(log.len(), 2);
    }
}
