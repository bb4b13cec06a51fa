use serde::{Deserialize, Serialize};

use crate::aggregator::{Aggregator, ServiceError};
use crate::browser::{BrowserApi, SettingsStorage};
use crate::contract::{PageRequest, SearchResponse};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    Settings,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

/// Envelope written back for every request. Fire-and-forget requests answer
/// with `response: null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: Option<SearchResponse> },
    Err { error: ErrorResponse },
}

pub async fn handle_request<B>(aggregator: &mut Aggregator<B>, request: PageRequest) -> TransportResponse
where
    B: BrowserApi + SettingsStorage,
{
    match aggregator.handle_request(request).await {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err {
            error: map_service_error(error),
        },
    }
}

pub async fn handle_json<B>(aggregator: &mut Aggregator<B>, payload: &str) -> String
where
    B: BrowserApi + SettingsStorage,
{
    let response = match serde_json::from_str::<PageRequest>(payload) {
        Ok(request) => handle_request(aggregator, request).await,
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
        },
    };

    encode(&response)
}

fn encode(response: &TransportResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|error| {
        tracing::error!(event = "transport_encode_failed", %error);
        let fallback = TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::Internal,
                message: "response could not be encoded".to_string(),
            },
        };
        serde_json::to_string(&fallback).unwrap_or_default()
    })
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    match error {
        ServiceError::InvalidRequest(message) => ErrorResponse {
            code: ErrorCode::InvalidRequest,
            message,
        },
        ServiceError::Settings(error) => ErrorResponse {
            code: ErrorCode::Settings,
            message: error.to_string(),
        },
    }
}
