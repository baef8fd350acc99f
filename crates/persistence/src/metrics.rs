//! Query timing instrumentation.

use metrics::histogram;
use std::time::Instant;

/// Times a single repository query for the
/// `database_query_duration_seconds` histogram, labeled by query name.
///
/// Only an explicit [`record`](QueryTimer::record) reports a sample, so
/// queries that bail out early stay out of the histogram.
///
/// ```ignore
/// let timer = QueryTimer::new("find_employee_by_id");
/// let result = sqlx::query_as::<_, EmployeeEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    name: &'static str,
    started: Instant,
}

impl QueryTimer {
    /// Starts timing the named query.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
        }
    }

    /// Reports the elapsed time as a histogram sample.
    pub fn record(self) {
        histogram!("database_query_duration_seconds", "query" => self.name)
            .record(self.started.elapsed().as_secs_f64());
    }
}
