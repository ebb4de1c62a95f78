use axum::extract::State;
use axum::Json;

use super::ApiEnvelope;
use crate::account::models::SigninData;
use crate::account::models::SigninRequest;
use crate::account::ports::AccountStore;
use crate::inbound::http::router::AppState;

pub async fn sign_in<S: AccountStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<SigninRequest>,
) -> ApiEnvelope<SigninData> {
    ApiEnvelope(state.account_service.sign_in(body).await)
}
