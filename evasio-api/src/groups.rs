use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use evasio_core::repository::StoreError;
use evasio_core::trip::{can_modify_shared_form, FormStatus};

use crate::{error::AppError, state::AppState, state::Repositories};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatus {
    pub trip_id: Option<String>,
    pub participants: Vec<GroupMember>,
    pub can_modify_form: bool,
}

/// Co-participant view. Access codes are not echoed for the others.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub first_name: String,
    pub last_name: String,
    pub form_status: FormStatus,
    pub is_self: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/groups/{code}", get(group_status))
}

/// GET /api/groups/{code}
async fn group_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<GroupStatus>, AppError> {
    let repos = state.repos()?;
    let status = resolve_group_status(repos, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown participant code".into()))?;
    Ok(Json(status))
}

pub async fn resolve_group_status(
    repos: &Repositories,
    code: &str,
) -> Result<Option<GroupStatus>, StoreError> {
    let Some(participant) = repos.participants.find_by_code(code).await? else {
        return Ok(None);
    };

    let Some(trip_record_id) = &participant.trip_record_id else {
        // No trip, no group to conflict with.
        return Ok(Some(GroupStatus {
            trip_id: None,
            participants: vec![GroupMember {
                first_name: participant.first_name,
                last_name: participant.last_name,
                form_status: participant.form_status,
                is_self: true,
            }],
            can_modify_form: true,
        }));
    };

    let trip = repos.trips.get(trip_record_id).await?;
    let group = repos.participants.list_by_trip(trip_record_id).await?;
    let can_modify = can_modify_shared_form(&participant.code, &group);

    let members = group
        .into_iter()
        .map(|member| GroupMember {
            is_self: member.code == participant.code,
            first_name: member.first_name,
            last_name: member.last_name,
            form_status: member.form_status,
        })
        .collect();

    Ok(Some(GroupStatus {
        trip_id: Some(trip.trip_id),
        participants: members,
        can_modify_form: can_modify,
    }))
}
