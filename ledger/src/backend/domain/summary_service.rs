//! Period totals over stored days.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate};
use log::{debug, warn};

use crate::backend::domain::commands::summary::{SummaryPeriod, SummaryQuery, SummaryResult};
use crate::backend::domain::models::draft::parse_date;
use crate::backend::storage::DayStorage;

/// First day of the period that contains `until`. `None` means unbounded.
pub fn period_start(period: SummaryPeriod, until: NaiveDate) -> Option<NaiveDate> {
    match period {
        SummaryPeriod::Week => {
            Some(until - Duration::days(until.weekday().num_days_from_monday() as i64))
        }
        SummaryPeriod::Month => until.with_day(1),
        SummaryPeriod::Year => NaiveDate::from_ymd_opt(until.year(), 1, 1),
        SummaryPeriod::All => None,
    }
}

#[derive(Clone)]
pub struct SummaryService {
    store: Arc<dyn DayStorage>,
}

impl SummaryService {
    pub fn new(store: Arc<dyn DayStorage>) -> Self {
        Self { store }
    }

    pub async fn summarize(&self, query: SummaryQuery) -> Result<SummaryResult> {
        let until = query.until.unwrap_or_else(|| Local::now().date_naive());
        let start = period_start(query.period, until);

        let mut result = SummaryResult {
            period: query.period,
            start,
            until,
            count: 0,
            revenue: 0.0,
            tip1: 0.0,
            tip2: 0.0,
            expenses_total: 0.0,
            gross: 0.0,
            net: 0.0,
        };

        for day in self.store.get_all().await? {
            let date = match parse_date(&day.date) {
                Ok(date) => date,
                Err(_) => {
                    warn!("Skipping day with unreadable date '{}'", day.date);
                    continue;
                }
            };
            if date > until || start.map_or(false, |s| date < s) {
                continue;
            }

            // Totals are recomputed rather than trusted from storage
            let day = day.with_recomputed_totals();
            result.count += 1;
            result.revenue += day.revenue;
            result.tip1 += day.tip1;
            result.tip2 += day.tip2;
            result.expenses_total += day.expenses_total;
            result.gross += day.gross;
            result.net += day.net;
        }

        debug!(
            "Summary {:?} {:?}..={}: {} days, net {:.2}",
            result.period, result.start, result.until, result.count, result.net
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::day::{DayRecord, Expense};
    use crate::backend::storage::InMemoryDayRepository;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_period_starts() {
        // 2024-03-14 is a Thursday
        let until = date("2024-03-14");
        assert_eq!(period_start(SummaryPeriod::Week, until), Some(date("2024-03-11")));
        assert_eq!(period_start(SummaryPeriod::Month, until), Some(date("2024-03-01")));
        assert_eq!(period_start(SummaryPeriod::Year, until), Some(date("2024-01-01")));
        assert_eq!(period_start(SummaryPeriod::All, until), None);

        // A Monday starts its own week
        let monday = date("2024-03-11");
        assert_eq!(period_start(SummaryPeriod::Week, monday), Some(monday));
    }

    #[tokio::test]
    async fn test_summarize_ranges() {
        let repo = InMemoryDayRepository::new();
        for (d, revenue) in [
            ("2023-12-31", 1.0),
            ("2024-03-01", 10.0),
            ("2024-03-11", 100.0),
            ("2024-03-14", 1000.0),
            ("2024-03-15", 10000.0),
        ] {
            repo.put(&DayRecord::new(d, revenue, 0.0, 0.0, vec![], "", 1)).await.unwrap();
        }
        let service = SummaryService::new(Arc::new(repo));

        let query = |period| SummaryQuery {
            period,
            until: Some(date("2024-03-14")),
        };

        let week = service.summarize(query(SummaryPeriod::Week)).await.unwrap();
        assert_eq!(week.count, 2);
        assert_eq!(week.revenue, 1100.0);

        let month = service.summarize(query(SummaryPeriod::Month)).await.unwrap();
        assert_eq!(month.count, 3);
        assert_eq!(month.revenue, 1110.0);

        let year = service.summarize(query(SummaryPeriod::Year)).await.unwrap();
        assert_eq!(year.count, 3);

        let all = service.summarize(query(SummaryPeriod::All)).await.unwrap();
        assert_eq!(all.count, 4);
        assert_eq!(all.revenue, 1111.0);
        assert_eq!(all.start, None);
    }

    #[tokio::test]
    async fn test_summarize_sums_all_fields() {
        let repo = InMemoryDayRepository::new();
        repo.put(&DayRecord::new(
            "2024-01-02",
            100.0,
            10.0,
            5.0,
            vec![Expense::new("fuel", 20.0), Expense::new("wash", 5.0)],
            "",
            1,
        ))
        .await
        .unwrap();
        repo.put(&DayRecord::new("2024-01-03", 50.0, 0.0, 1.0, vec![], "", 1))
            .await
            .unwrap();
        let service = SummaryService::new(Arc::new(repo));

        let result = service
            .summarize(SummaryQuery {
                period: SummaryPeriod::Month,
                until: Some(date("2024-01-31")),
            })
            .await
            .unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.tip1, 10.0);
        assert_eq!(result.tip2, 6.0);
        assert_eq!(result.expenses_total, 25.0);
        assert_eq!(result.gross, 166.0);
        assert_eq!(result.net, 141.0);
    }
}
