//! Group membership endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::member::{MemberNew, MemberView, MembersResponse};
use engine::{GroupId, MemberId};

use crate::{LedgerStore, ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<MembersResponse>, ServerError> {
    let members = state
        .store
        .list_members(&GroupId::from(group_id))
        .await?
        .into_iter()
        .map(|member| MemberView {
            id: member.id.to_string(),
            name: member.name,
        })
        .collect();

    Ok(Json(MembersResponse { members }))
}

pub async fn member_new(
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<MemberNew>,
) -> Result<(StatusCode, Json<MemberView>), ServerError> {
    let member = state
        .store
        .add_member(&GroupId::from(group_id), &payload.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MemberView {
            id: member.id.to_string(),
            name: member.name,
        }),
    ))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path((group_id, member_id)): Path<(String, String)>,
) -> Result<StatusCode, ServerError> {
    state
        .store
        .remove_member(&GroupId::from(group_id), &MemberId::from(member_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
