//! Group API endpoints

use api_types::group::{GroupNew, GroupView, GroupsResponse};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

fn view(group: engine::Group) -> GroupView {
    GroupView {
        id: group.id.to_string(),
        name: group.name,
    }
}

pub async fn list(State(state): State<ServerState>) -> Json<GroupsResponse> {
    let groups = state.store.list_groups().await.into_iter().map(view).collect();
    Json(GroupsResponse { groups })
}

/// Handle requests for creating a new group
pub async fn group_new(
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let group = state.store.create_group(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(view(group))))
}
