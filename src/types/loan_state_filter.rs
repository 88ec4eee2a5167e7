use serde::Deserialize;

/// Optional filters of `/loan_states`; timestamps are unix seconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanStateFilter {
    pub protocol: Option<String>,
    pub user: Option<String>,
    pub start_block: Option<i64>,
    pub end_block: Option<i64>,
    pub start_datetime: Option<i64>,
    pub end_datetime: Option<i64>,
}
