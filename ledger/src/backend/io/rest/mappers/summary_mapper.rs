use shared::{SummaryPeriod as SummaryPeriodDto, SummaryResponse};

use crate::backend::domain::commands::summary::{SummaryPeriod, SummaryResult};
use crate::backend::domain::models::draft::DATE_FORMAT;

pub struct SummaryMapper;

impl SummaryMapper {
    pub fn period_to_domain(dto: SummaryPeriodDto) -> SummaryPeriod {
        match dto {
            SummaryPeriodDto::Week => SummaryPeriod::Week,
            SummaryPeriodDto::Month => SummaryPeriod::Month,
            SummaryPeriodDto::Year => SummaryPeriod::Year,
            SummaryPeriodDto::All => SummaryPeriod::All,
        }
    }

    pub fn period_to_dto(domain: SummaryPeriod) -> SummaryPeriodDto {
        match domain {
            SummaryPeriod::Week => SummaryPeriodDto::Week,
            SummaryPeriod::Month => SummaryPeriodDto::Month,
            SummaryPeriod::Year => SummaryPeriodDto::Year,
            SummaryPeriod::All => SummaryPeriodDto::All,
        }
    }

    pub fn to_response(result: SummaryResult) -> SummaryResponse {
        SummaryResponse {
            period: Self::period_to_dto(result.period),
            start: result.start.map(|d| d.format(DATE_FORMAT).to_string()),
            until: result.until.format(DATE_FORMAT).to_string(),
            count: result.count,
            revenue: result.revenue,
            tip1: result.tip1,
            tip2: result.tip2,
            expenses_total: result.expenses_total,
            gross: result.gross,
            net: result.net,
        }
    }
}
