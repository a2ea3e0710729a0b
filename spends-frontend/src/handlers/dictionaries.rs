use crate::models::{
    Contract, Counterparty, DictionaryEntry, DictionaryKind, ExpenseItem, Normative, Priority,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use spends_core::error::AppError;

pub async fn list_dictionary(
    State(state): State<AppState>,
    Path(kind): Path<DictionaryKind>,
) -> Result<Json<Value>, AppError> {
    let entries = match kind {
        DictionaryKind::Counterparties => to_json(state.dictionaries.list::<Counterparty>().await?.as_ref()),
        DictionaryKind::ExpenseArticles => to_json(state.dictionaries.list::<ExpenseItem>().await?.as_ref()),
        DictionaryKind::Contracts => to_json(state.dictionaries.list::<Contract>().await?.as_ref()),
        DictionaryKind::Priorities => to_json(state.dictionaries.list::<Priority>().await?.as_ref()),
        DictionaryKind::Normatives => to_json(state.dictionaries.list::<Normative>().await?.as_ref()),
    }?;
    Ok(Json(entries))
}

pub async fn get_dictionary_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DictionaryKind, String)>,
) -> Result<Json<Value>, AppError> {
    let entry = match kind {
        DictionaryKind::Counterparties => to_json(&state.dictionaries.get::<Counterparty>(&id).await?),
        DictionaryKind::ExpenseArticles => to_json(&state.dictionaries.get::<ExpenseItem>(&id).await?),
        DictionaryKind::Contracts => to_json(&state.dictionaries.get::<Contract>(&id).await?),
        DictionaryKind::Priorities => to_json(&state.dictionaries.get::<Priority>(&id).await?),
        DictionaryKind::Normatives => to_json(&state.dictionaries.get::<Normative>(&id).await?),
    }?;
    Ok(Json(entry))
}

pub async fn create_dictionary_entry(
    State(state): State<AppState>,
    Path(kind): Path<DictionaryKind>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = match kind {
        DictionaryKind::Counterparties => create::<Counterparty>(&state, &body).await,
        DictionaryKind::ExpenseArticles => create::<ExpenseItem>(&state, &body).await,
        DictionaryKind::Contracts => create::<Contract>(&state, &body).await,
        DictionaryKind::Priorities => create::<Priority>(&state, &body).await,
        DictionaryKind::Normatives => create::<Normative>(&state, &body).await,
    }?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_dictionary_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DictionaryKind, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let updated = match kind {
        DictionaryKind::Counterparties => update::<Counterparty>(&state, &id, &body).await,
        DictionaryKind::ExpenseArticles => update::<ExpenseItem>(&state, &id, &body).await,
        DictionaryKind::Contracts => update::<Contract>(&state, &id, &body).await,
        DictionaryKind::Priorities => update::<Priority>(&state, &id, &body).await,
        DictionaryKind::Normatives => update::<Normative>(&state, &id, &body).await,
    }?;
    Ok(Json(updated))
}

pub async fn delete_dictionary_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DictionaryKind, String)>,
) -> Result<StatusCode, AppError> {
    state.dictionaries.delete(kind, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drop the cached list so the next read goes to the backend.
pub async fn invalidate_dictionary(
    State(state): State<AppState>,
    Path(kind): Path<DictionaryKind>,
) -> StatusCode {
    state.dictionaries.invalidate(kind);
    StatusCode::NO_CONTENT
}

async fn create<T: DictionaryEntry>(state: &AppState, body: &Value) -> Result<Value, AppError> {
    let created: T = state.dictionaries.create(body).await?;
    to_json(&created)
}

async fn update<T: DictionaryEntry>(
    state: &AppState,
    id: &str,
    body: &Value,
) -> Result<Value, AppError> {
    let updated: T = state.dictionaries.update(id, body).await?;
    to_json(&updated)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::InternalError(e.into()))
}
