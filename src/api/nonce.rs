// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::ApiError,
    models::{NonceQuery, NonceResponse},
    state::AppState,
};

/// Issue a challenge nonce for an address.
///
/// Any nonce previously issued for the same address stops being valid.
#[utoipa::path(
    get,
    path = "/api/nonce",
    params(NonceQuery),
    tag = "Verification",
    responses(
        (status = 200, description = "Nonce issued", body = NonceResponse),
        (status = 400, description = "Address missing or malformed")
    )
)]
pub async fn issue_nonce(
    State(state): State<AppState>,
    Query(params): Query<NonceQuery>,
) -> Result<Json<NonceResponse>, ApiError> {
    let address = params
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::bad_request("Address required"))?;

    let nonce = state.nonces.issue(address)?;
    Ok(Json(NonceResponse { nonce }))
}
