use shared::{RestoreResponse, SyncReportResponse, SyncStateResponse};

use crate::backend::domain::models::sync::{RestoreReport, SyncReport, SyncState};

pub struct SyncMapper;

impl SyncMapper {
    pub fn to_state_response(state: SyncState) -> SyncStateResponse {
        SyncStateResponse {
            enabled: state.enabled,
            signed_in: state.signed_in,
            online: state.online,
            syncing: state.syncing,
            last_sync_at: state.last_sync_at,
        }
    }

    pub fn to_report_response(report: SyncReport) -> SyncReportResponse {
        SyncReportResponse {
            reason: report.reason,
            local_count: report.local_count,
            remote_count: report.remote_count,
            merged_count: report.merged_count,
            pulled_count: report.pulled_count,
            last_sync_at: report.last_sync_at,
        }
    }

    pub fn to_restore_response(report: RestoreReport) -> RestoreResponse {
        RestoreResponse {
            remote_count: report.remote_count,
            merged_count: report.merged_count,
            last_sync_at: report.last_sync_at,
        }
    }
}
