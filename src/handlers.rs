use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::models::*;
use crate::service::CurrencyService;

const INVALID_BODY: &str = "Corpo da requisição inválido";
const INVALID_QUERY: &str = "Parâmetros de consulta inválidos";

pub async fn handler_current_rate(State(service): State<CurrencyService>) -> Json<CurrencyRate> {
    Json(service.current_rate())
}

pub async fn process_rate_update(
    request: RateUpdateRequest,
    service: CurrencyService,
) -> Response<Body> {
    if let Err(error) = request.validate() {
        return error.into_response();
    }

    match service.update_rate(request.rate).await {
        Ok(updated) => Json(updated).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn handler_update_rate(
    State(service): State<CurrencyService>,
    body: Option<Json<RateUpdateRequest>>,
) -> Response<Body> {
    match body {
        Some(Json(request)) => process_rate_update(request, service).await,
        None => (StatusCode::UNPROCESSABLE_ENTITY, INVALID_BODY).into_response(),
    }
}

pub async fn handler_conversion(
    State(service): State<CurrencyService>,
    body: Option<Json<ConversionRequest>>,
) -> Response<Body> {
    let Some(Json(request)) = body else {
        return (StatusCode::UNPROCESSABLE_ENTITY, INVALID_BODY).into_response();
    };

    match service.convert(request).await {
        Ok(result) => Json(result).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn handler_transaction_history(
    State(service): State<CurrencyService>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Response<Body> {
    let Ok(Query(query)) = query else {
        return (StatusCode::UNPROCESSABLE_ENTITY, INVALID_QUERY).into_response();
    };

    let (filters, pagination) = query.into_parts();
    let page = service.query_transactions(&filters, pagination).await;

    Json(page).into_response()
}
