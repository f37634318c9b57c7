pub mod lead_assignment_histories;
pub mod lead_feedbacks;
pub mod leads;
pub mod owners;
pub mod projects;
pub mod units;
pub mod users;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}
