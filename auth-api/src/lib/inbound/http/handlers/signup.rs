use axum::extract::State;
use axum::Json;

use super::ApiEnvelope;
use crate::account::models::AccountProfile;
use crate::account::models::SignupRequest;
use crate::account::ports::AccountStore;
use crate::inbound::http::router::AppState;

pub async fn sign_up<S: AccountStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<SignupRequest>,
) -> ApiEnvelope<AccountProfile> {
    ApiEnvelope(state.account_service.sign_up(body).await)
}
