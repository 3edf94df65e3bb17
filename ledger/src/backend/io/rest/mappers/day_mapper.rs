use shared::{AmountInput, DayDraft as DayDraftDto, DayRecord as DayRecordDto, Expense as ExpenseDto, ExpenseInput};
use uuid::Uuid;

use crate::backend::domain::models::day::{DayRecord, Expense};
use crate::backend::domain::models::draft::{DayDraft, ExpenseLine};

pub struct DayMapper;

impl DayMapper {
    /// Convert domain DayRecord to shared DayRecord DTO
    pub fn to_dto(domain: DayRecord) -> DayRecordDto {
        DayRecordDto {
            date: domain.date,
            revenue: domain.revenue,
            tip1: domain.tip1,
            tip2: domain.tip2,
            expenses: domain.expenses.into_iter().map(Self::expense_to_dto).collect(),
            expenses_total: domain.expenses_total,
            gross: domain.gross,
            net: domain.net,
            note: domain.note,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(days: Vec<DayRecord>) -> Vec<DayRecordDto> {
        days.into_iter().map(Self::to_dto).collect()
    }

    fn expense_to_dto(expense: Expense) -> ExpenseDto {
        ExpenseDto {
            id: expense.id,
            label: expense.label,
            amount: expense.amount,
        }
    }

    /// Raw form values keep their text so the domain does the coercion
    pub fn draft_to_domain(dto: DayDraftDto) -> DayDraft {
        DayDraft {
            date: dto.date,
            revenue: dto.revenue.to_string(),
            tip1: dto.tip1.to_string(),
            tip2: dto.tip2.to_string(),
            note: dto.note,
            expenses: dto
                .expenses
                .into_iter()
                .map(|line| ExpenseLine {
                    id: line.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                    label: line.label,
                    amount: line.amount.to_string(),
                })
                .collect(),
        }
    }

    pub fn draft_to_dto(domain: DayDraft) -> DayDraftDto {
        DayDraftDto {
            date: domain.date,
            revenue: AmountInput::Text(domain.revenue),
            tip1: AmountInput::Text(domain.tip1),
            tip2: AmountInput::Text(domain.tip2),
            note: domain.note,
            expenses: domain
                .expenses
                .into_iter()
                .map(|line| ExpenseInput {
                    id: Some(line.id),
                    label: line.label,
                    amount: AmountInput::Text(line.amount),
                })
                .collect(),
        }
    }
}
