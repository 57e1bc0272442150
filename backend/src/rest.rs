//! REST surface over the core: the seam where a dashboard UI attaches.
//! Nothing here is allowed to surface an unhandled error; the only 4xx is
//! entry validation, and mirror/advice failures are not errors at all.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{
    AdviceResponse, CategorySuggestionRequest, CreateTransactionRequest, SheetEndpoint,
    SUGGESTED_PAYMENT_METHODS,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::advice::AdviceService;
use crate::export::ExportService;
use crate::reports;
use crate::store::RecordStore;
use crate::transactions::{CreateError, TransactionService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub transactions: TransactionService,
    pub advice: AdviceService,
    pub export: ExportService,
}

impl AppState {
    pub fn new(
        store: Arc<RecordStore>,
        transactions: TransactionService,
        advice: AdviceService,
        export: ExportService,
    ) -> Self {
        Self {
            store,
            transactions,
            advice,
            export,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/api/summary", get(get_summary))
        .route("/api/reports/daily", get(get_daily_reports))
        .route("/api/export", get(export_csv))
        .route("/api/sheet-url", get(get_sheet_url).put(set_sheet_url))
        .route("/api/payment-methods", get(list_payment_methods))
        .route("/api/advice", get(get_advice))
        .route("/api/categories/suggest", post(suggest_category))
        .with_state(state)
}

/// GET /api/transactions - the full persisted list, newest first
pub async fn list_transactions(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/transactions");
    match state.transactions.list() {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => {
            error!("Error listing transactions: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing transactions").into_response()
        }
    }
}

/// POST /api/transactions - record a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);
    match state.transactions.create(request).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(CreateError::Invalid(e)) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        Err(CreateError::Storage(e)) => {
            error!("Error storing transaction: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error storing transaction").into_response()
        }
    }
}

/// GET /api/summary - overall totals, recomputed from the full list
pub async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/summary");
    match state.transactions.list() {
        Ok(transactions) => {
            (StatusCode::OK, Json(reports::compute_summary(&transactions))).into_response()
        }
        Err(e) => {
            error!("Error computing summary: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing summary").into_response()
        }
    }
}

/// GET /api/reports/daily - per-day breakdown, most recent day first
pub async fn get_daily_reports(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reports/daily");
    match state.transactions.list() {
        Ok(transactions) => (
            StatusCode::OK,
            Json(reports::compute_daily_reports(&transactions)),
        )
            .into_response(),
        Err(e) => {
            error!("Error computing daily reports: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing daily reports").into_response()
        }
    }
}

/// GET /api/export - the transaction list as a CSV attachment
pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export");
    let transactions = match state.transactions.list() {
        Ok(transactions) => transactions,
        Err(e) => {
            error!("Error reading transactions for export: {:?}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error exporting transactions")
                .into_response();
        }
    };

    match state.export.export(&transactions) {
        Ok(data) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", data.filename),
                ),
            ],
            data.csv_content,
        )
            .into_response(),
        Err(e) => {
            error!("Error rendering export: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error exporting transactions").into_response()
        }
    }
}

/// GET /api/sheet-url - the configured mirror endpoint (empty if none)
pub async fn get_sheet_url(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/sheet-url");
    match state.store.endpoint() {
        Ok(url) => (StatusCode::OK, Json(SheetEndpoint { url })).into_response(),
        Err(e) => {
            error!("Error reading sheet endpoint: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading sheet endpoint").into_response()
        }
    }
}

/// PUT /api/sheet-url - configure the mirror endpoint; empty disconnects
pub async fn set_sheet_url(
    State(state): State<AppState>,
    Json(endpoint): Json<SheetEndpoint>,
) -> impl IntoResponse {
    info!("PUT /api/sheet-url");
    match state.store.set_endpoint(&endpoint.url) {
        Ok(()) => (StatusCode::OK, Json(endpoint)).into_response(),
        Err(e) => {
            error!("Error storing sheet endpoint: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error storing sheet endpoint").into_response()
        }
    }
}

/// GET /api/payment-methods - suggestions for the entry form
pub async fn list_payment_methods() -> impl IntoResponse {
    (StatusCode::OK, Json(SUGGESTED_PAYMENT_METHODS))
}

/// GET /api/advice - free-text guidance; always succeeds with some string
pub async fn get_advice(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/advice");
    let transactions = state.transactions.list().unwrap_or_else(|e| {
        error!("Error reading transactions for advice: {:?}", e);
        Vec::new()
    });
    let advice = state.advice.generate_advice(&transactions).await;
    (StatusCode::OK, Json(AdviceResponse { advice }))
}

/// POST /api/categories/suggest - one-word category for a description
pub async fn suggest_category(
    State(state): State<AppState>,
    Json(request): Json<CategorySuggestionRequest>,
) -> impl IntoResponse {
    info!("POST /api/categories/suggest");
    let suggestion = state.advice.suggest_category(&request.description).await;
    (StatusCode::OK, Json(suggestion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MirrorClient;
    use axum::body::to_bytes;
    use shared::{FinancialSummary, Transaction, TransactionType};
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            RecordStore::new(temp_dir.path().to_path_buf()).expect("Failed to create store"),
        );
        let mirror = MirrorClient::new(Duration::from_secs(1)).unwrap();
        let transactions = TransactionService::new(store.clone(), mirror);
        let advice = AdviceService::new(None, Duration::from_secs(1)).unwrap();
        let state = AppState::new(store, transactions, advice, ExportService::new());
        (state, temp_dir)
    }

    fn create_request(date: &str, amount: f64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            date: Some(date.to_string()),
            transaction_type: TransactionType::Receipt,
            category: "Sales".to_string(),
            description: "Invoice".to_string(),
            amount,
            payment_method: "Cash".to_string(),
            reference: None,
        }
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_then_list_round_trips() {
        let (state, _dir) = setup_test_state();

        let response = create_transaction(
            State(state.clone()),
            Json(create_request("2024-01-01", 100.0)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = list_transactions(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let listed: Vec<Transaction> = body_json(response).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, 100.0);
    }

    #[tokio::test]
    async fn invalid_amount_is_a_bad_request() {
        let (state, _dir) = setup_test_state();
        let response = create_transaction(State(state), Json(create_request("2024-01-01", 0.0)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_amount_is_rejected_at_the_http_layer() {
        use tower::ServiceExt;

        let (state, _dir) = setup_test_state();
        let app = router(state.clone());

        // A string amount never reaches the handler; deserialization
        // rejects it instead of coercing it to zero.
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/transactions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                r#"{"date":"2024-01-01","type":"RECEIPT","category":"Sales","description":"Invoice","amount":"abc","paymentMethod":"Cash"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.transactions.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_reflects_created_transactions() {
        let (state, _dir) = setup_test_state();

        let mut receipt = create_request("2024-01-01", 100.0);
        receipt.transaction_type = TransactionType::Receipt;
        let mut payment = create_request("2024-01-01", 40.0);
        payment.transaction_type = TransactionType::Payment;

        create_transaction(State(state.clone()), Json(receipt)).await;
        create_transaction(State(state.clone()), Json(payment)).await;

        let response = get_summary(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let summary: FinancialSummary = body_json(response).await;
        assert_eq!(summary.total_receipts, 100.0);
        assert_eq!(summary.total_payments, 40.0);
        assert_eq!(summary.net_cash_flow, 60.0);
        assert_eq!(summary.bank_balance, 0.0);
    }

    #[tokio::test]
    async fn daily_reports_come_back_newest_day_first() {
        let (state, _dir) = setup_test_state();
        create_transaction(State(state.clone()), Json(create_request("2024-01-01", 10.0))).await;
        create_transaction(State(state.clone()), Json(create_request("2024-01-03", 20.0))).await;

        let response = get_daily_reports(State(state)).await.into_response();
        let reports: Vec<shared::DailySummary> = body_json(response).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].date, "2024-01-03");
        assert_eq!(reports[1].date, "2024-01-01");
    }

    #[tokio::test]
    async fn export_is_served_as_a_csv_attachment() {
        let (state, _dir) = setup_test_state();
        create_transaction(State(state.clone()), Json(create_request("2024-01-01", 10.0))).await;

        let response = export_csv(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"findash_sheet_sync_"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let content = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(content.starts_with("Date,Type,Category,Description,Amount,Method,Reference"));
    }

    #[tokio::test]
    async fn sheet_url_round_trips_and_disconnects() {
        let (state, _dir) = setup_test_state();

        let response = get_sheet_url(State(state.clone())).await.into_response();
        let endpoint: SheetEndpoint = body_json(response).await;
        assert_eq!(endpoint.url, "");

        set_sheet_url(
            State(state.clone()),
            Json(SheetEndpoint {
                url: "https://example.com/sheet".to_string(),
            }),
        )
        .await;
        let response = get_sheet_url(State(state.clone())).await.into_response();
        let endpoint: SheetEndpoint = body_json(response).await;
        assert_eq!(endpoint.url, "https://example.com/sheet");

        set_sheet_url(State(state.clone()), Json(SheetEndpoint { url: String::new() })).await;
        let response = get_sheet_url(State(state)).await.into_response();
        let endpoint: SheetEndpoint = body_json(response).await;
        assert_eq!(endpoint.url, "");
    }

    #[tokio::test]
    async fn advice_handler_always_returns_a_string() {
        let (state, _dir) = setup_test_state();
        let response = get_advice(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let advice: AdviceResponse = body_json(response).await;
        assert!(!advice.advice.is_empty());
    }
}
