use modzy_api::PagingInput;
use strum::Display;

use crate::jobs::schemas::JobDetails;
use crate::time::ModzyDate;

/// Which jobs a history query returns, by lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum HistoryStatus {
    All,
    Pending,
    Terminated,
}

/// Page of the job history, with its filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListJobsHistoryInput {
    pub paging: PagingInput,
}

impl ListJobsHistoryInput {
    pub fn new(per_page: u32, page: u32) -> Self {
        Self {
            paging: PagingInput::new(per_page, page),
        }
    }

    pub fn with_start_date(self, date: ModzyDate) -> Self {
        self.filter("startDate", &date.to_string())
    }

    pub fn with_end_date(self, date: ModzyDate) -> Self {
        self.filter("endDate", &date.to_string())
    }

    pub fn with_user(self, user: &str) -> Self {
        self.filter("user", user)
    }

    pub fn with_access_key(self, access_key: &str) -> Self {
        self.filter("accessKey", access_key)
    }

    pub fn with_status(self, status: HistoryStatus) -> Self {
        self.filter("status", &status.to_string())
    }

    /// Jobs of any of the given models.
    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.paging = self.paging.with_filter_or("model", models);
        self
    }

    fn filter(mut self, field: &str, value: &str) -> Self {
        self.paging = self.paging.with_filter_and(field, &[value]);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListJobsHistoryOutput {
    pub jobs: Vec<JobDetails>,
    /// Input of the following page, `None` once the history is exhausted.
    pub next_page: Option<ListJobsHistoryInput>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn filters_become_query_pairs() {
        let date = ModzyDate::new(NaiveDate::from_ymd_opt(2021, 4, 5).unwrap());
        let input = ListJobsHistoryInput::new(10, 2)
            .with_start_date(date)
            .with_status(HistoryStatus::Terminated)
            .with_models(&["a", "b"]);

        assert_eq!(
            input.paging.query_pairs(),
            vec![
                ("per-page".to_string(), "10".to_string()),
                ("page".to_string(), "2".to_string()),
                ("startDate".to_string(), "2021-04-05".to_string()),
                ("status".to_string(), "terminated".to_string()),
                ("model".to_string(), "a,b".to_string()),
            ]
        );
    }
}
