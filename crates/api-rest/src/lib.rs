//! # API REST
//!
//! REST API implementation for Wardbook.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON envelope, CORS)
//!
//! Every response answers HTTP 200 and wraps its payload in a
//! `{"message": ...}` envelope; callers distinguish outcomes by inspecting
//! the body, not the status code. This is a compatibility contract carried
//! over from the service this one replaces, including for malformed
//! requests, which are caught via extractor rejections instead of being
//! answered with 4xx codes.

#![warn(rust_2018_idioms)]

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path as AxumPath, State},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use wardbook_core::{NewRecord, PatientRecord, RecordError, RecordField, RecordPatch, RecordStore};

/// Application state shared across REST API handlers
///
/// Holds the record store adapter; each handler checks connections out of
/// its pool for the duration of a request.
#[derive(Clone)]
pub struct AppState {
    store: RecordStore,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        update_patient,
        patient_report,
        search_patients,
        delete_patient,
        set_ordered_tests,
        set_test_results,
        set_prescription,
        set_payment_status,
    ),
    components(schemas(
        HealthRes,
        CreatePatientReq,
        RecordPatch,
        OrderedTestsReq,
        TestResultsReq,
        PrescriptionReq,
        PaymentStatusReq,
        PatientRecord,
    ))
)]
struct ApiDoc;

/// Health check response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// POST /patients body. `patient`, `admission` and `discharge` are required
/// keys; their absence is reported as a malformed request inside the
/// envelope.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    pub patient: String,
    pub admission: String,
    pub treatments: Option<String>,
    pub discharge: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderedTestsReq {
    pub tests: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TestResultsReq {
    pub results: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PrescriptionReq {
    pub prescription: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PaymentStatusReq {
    pub payment: Option<String>,
}

/// Build the Wardbook REST router on top of a connected store.
pub fn app(store: RecordStore) -> Router {
    Router::new()
        .route("/", get(list_patients))
        .route("/health", get(health))
        .route("/patients", post(create_patient))
        .route("/patients/:sno", put(update_patient))
        .route("/patients/tests/:sno", put(set_ordered_tests))
        .route("/patients/test_results/:sno", put(set_test_results))
        .route("/patients/prescription/:sno", put(set_prescription))
        .route("/patients/payment_sts/:sno", put(set_payment_status))
        .route("/report/:name", get(patient_report))
        .route("/search/:name", get(search_patients))
        .route("/delete/:sno", delete(delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { store })
}

/// The not-found envelope. Deliberately a 200-status body, not a 404.
fn not_found() -> Json<Value> {
    Json(json!({ "message": "Patient not found" }))
}

/// Convert a handler-boundary error into the envelope. The error's display
/// text becomes the message; the transport status stays 200.
fn failure(error: &RecordError) -> Json<Value> {
    Json(json!({ "message": error.to_string() }))
}

fn malformed_body(rejection: JsonRejection) -> RecordError {
    RecordError::MalformedRequest(rejection.body_text())
}

fn malformed_path(rejection: PathRejection) -> RecordError {
    RecordError::MalformedRequest(rejection.body_text())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Wardbook REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Envelope carrying every patient row; an empty table yields an empty array")
    )
)]
/// List all patients in the table
///
/// Returns every row unfiltered, in natural store order. An empty result is
/// a valid success response carrying an empty array.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Json<Value> {
    match state.store.select_all().await {
        Ok(rows) => {
            tracing::info!("displayed list of all {} patients", rows.len());
            Json(json!({ "message": rows }))
        }
        Err(error) => {
            tracing::error!("list patients error: {error}");
            failure(&error)
        }
    }
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 200, description = "Confirmation envelope; the generated serial number is not echoed")
    )
)]
/// Add a new patient row
///
/// Requires `patient`, `admission` and `discharge`; `treatments` is optional
/// and stored as NULL when absent. A missing required key or an unreadable
/// body is reported as a malformed request, an unparseable date or blank
/// name as invalid input. All outcomes answer 200.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<CreatePatientReq>, JsonRejection>,
) -> Json<Value> {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let error = malformed_body(rejection);
            tracing::warn!("create patient rejected: {error}");
            return failure(&error);
        }
    };

    let record = match NewRecord::new(req.patient, &req.admission, req.treatments, &req.discharge)
    {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!("create patient rejected: {error}");
            return failure(&error);
        }
    };

    match state.store.insert(&record).await {
        Ok(()) => {
            tracing::info!("{} added in the list", record.patient_name);
            Json(json!({ "message": "Item added to the cart" }))
        }
        Err(error) => {
            tracing::error!("create patient error: {error}");
            failure(&error)
        }
    }
}

#[utoipa::path(
    put,
    path = "/patients/{sno}",
    request_body = RecordPatch,
    params(
        ("sno" = i64, Path, description = "Serial number of the patient row")
    ),
    responses(
        (status = 200, description = "Update confirmation echoing the supplied patch, or the not-found envelope")
    )
)]
/// Update one field of a patient row
///
/// First-matching-key-wins: keys are checked in the fixed order `patient`,
/// `admission`, `treatments`, `discharge` and only the first one present is
/// applied; the rest are ignored even when supplied. The whole supplied
/// patch is echoed back under `"Details"`.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    sno: Result<AxumPath<i64>, PathRejection>,
    payload: Result<Json<RecordPatch>, JsonRejection>,
) -> Json<Value> {
    let AxumPath(sno) = match sno {
        Ok(sno) => sno,
        Err(rejection) => {
            let error = malformed_path(rejection);
            tracing::warn!("update patient rejected: {error}");
            return failure(&error);
        }
    };
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let error = malformed_body(rejection);
            tracing::warn!("update patient rejected: {error}");
            return failure(&error);
        }
    };

    match state.store.select_by_id(sno).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(),
        Err(error) => {
            tracing::error!("update patient error: {error}");
            return failure(&error);
        }
    }

    let change = match patch.first_change() {
        Ok(change) => change,
        Err(error) => {
            tracing::warn!("update patient rejected: {error}");
            return failure(&error);
        }
    };

    // A patch with no recognised key still reports success with the echo.
    if let Some((field, value)) = change {
        if let Err(error) = state.store.update_field(sno, field, Some(&value)).await {
            tracing::error!("update patient error: {error}");
            return failure(&error);
        }
        tracing::info!("patient {sno}: {} updated", field.column());
    }

    Json(json!({ "message": "Details updated", "Details": patch }))
}

#[utoipa::path(
    get,
    path = "/report/{name}",
    params(
        ("name" = String, Path, description = "Exact patient name")
    ),
    responses(
        (status = 200, description = "Envelope carrying the first row matching the name, or the not-found envelope")
    )
)]
/// Report for one patient by exact name
///
/// Returns the first matching row only; use the search endpoint for every
/// namesake.
#[axum::debug_handler]
async fn patient_report(
    State(state): State<AppState>,
    AxumPath(name): AxumPath<String>,
) -> Json<Value> {
    match state.store.select_by_name(&name).await {
        Ok(rows) => match rows.into_iter().next() {
            Some(row) => {
                tracing::info!("displayed report for {name}");
                Json(json!({ "message": row }))
            }
            None => not_found(),
        },
        Err(error) => {
            tracing::error!("patient report error: {error}");
            failure(&error)
        }
    }
}

#[utoipa::path(
    get,
    path = "/search/{name}",
    params(
        ("name" = String, Path, description = "Exact patient name")
    ),
    responses(
        (status = 200, description = "Envelope carrying every row matching the name, or the not-found envelope")
    )
)]
/// Search patients by exact name
///
/// Returns all matching rows; zero matches yields the not-found envelope
/// rather than an empty array.
#[axum::debug_handler]
async fn search_patients(
    State(state): State<AppState>,
    AxumPath(name): AxumPath<String>,
) -> Json<Value> {
    match state.store.select_by_name(&name).await {
        Ok(rows) if rows.is_empty() => not_found(),
        Ok(rows) => {
            tracing::info!("displayed all {} patients named {name}", rows.len());
            Json(json!({ "message": rows }))
        }
        Err(error) => {
            tracing::error!("search patients error: {error}");
            failure(&error)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/delete/{sno}",
    params(
        ("sno" = i64, Path, description = "Serial number of the patient row")
    ),
    responses(
        (status = 200, description = "Deletion confirmation echoing the serial number, whether or not a row existed")
    )
)]
/// Delete a patient row by serial number
///
/// No existence check is performed: deleting an absent row still reports
/// success with the serial number echoed back.
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    sno: Result<AxumPath<i64>, PathRejection>,
) -> Json<Value> {
    let AxumPath(sno) = match sno {
        Ok(sno) => sno,
        Err(rejection) => {
            let error = malformed_path(rejection);
            tracing::warn!("delete patient rejected: {error}");
            return failure(&error);
        }
    };

    match state.store.delete(sno).await {
        Ok(()) => {
            tracing::info!("patient {sno} deleted from the table");
            Json(json!({ "message": "Deleted Successfully", "item_no": sno }))
        }
        Err(error) => {
            tracing::error!("delete patient error: {error}");
            failure(&error)
        }
    }
}

/// Shared flow for the four single-field setters: verify the row exists,
/// then unconditionally overwrite the named column. A missing value
/// overwrites with NULL.
async fn set_single_field(
    state: &AppState,
    sno: Result<AxumPath<i64>, PathRejection>,
    field: RecordField,
    value: Option<String>,
    confirmation: &'static str,
) -> Json<Value> {
    let AxumPath(sno) = match sno {
        Ok(sno) => sno,
        Err(rejection) => {
            let error = malformed_path(rejection);
            tracing::warn!("set {} rejected: {error}", field.column());
            return failure(&error);
        }
    };

    match state.store.select_by_id(sno).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(),
        Err(error) => {
            tracing::error!("set {} error: {error}", field.column());
            return failure(&error);
        }
    }

    match state.store.update_field(sno, field, value.as_deref()).await {
        Ok(()) => {
            tracing::info!("patient {sno}: {} updated", field.column());
            Json(json!({ "message": confirmation }))
        }
        Err(error) => {
            tracing::error!("set {} error: {error}", field.column());
            failure(&error)
        }
    }
}

#[utoipa::path(
    put,
    path = "/patients/tests/{sno}",
    request_body = OrderedTestsReq,
    params(
        ("sno" = i64, Path, description = "Serial number of the patient row")
    ),
    responses(
        (status = 200, description = "Confirmation envelope, or the not-found envelope")
    )
)]
/// Set the ordered tests for a patient
#[axum::debug_handler]
async fn set_ordered_tests(
    State(state): State<AppState>,
    sno: Result<AxumPath<i64>, PathRejection>,
    payload: Result<Json<OrderedTestsReq>, JsonRejection>,
) -> Json<Value> {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let error = malformed_body(rejection);
            tracing::warn!("set ordered_tests rejected: {error}");
            return failure(&error);
        }
    };

    set_single_field(
        &state,
        sno,
        RecordField::OrderedTests,
        req.tests,
        "Ordered tests updated",
    )
    .await
}

#[utoipa::path(
    put,
    path = "/patients/test_results/{sno}",
    request_body = TestResultsReq,
    params(
        ("sno" = i64, Path, description = "Serial number of the patient row")
    ),
    responses(
        (status = 200, description = "Confirmation envelope, or the not-found envelope")
    )
)]
/// Set the test results for a patient
#[axum::debug_handler]
async fn set_test_results(
    State(state): State<AppState>,
    sno: Result<AxumPath<i64>, PathRejection>,
    payload: Result<Json<TestResultsReq>, JsonRejection>,
) -> Json<Value> {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let error = malformed_body(rejection);
            tracing::warn!("set test_results rejected: {error}");
            return failure(&error);
        }
    };

    set_single_field(
        &state,
        sno,
        RecordField::TestResults,
        req.results,
        "Test results updated",
    )
    .await
}

#[utoipa::path(
    put,
    path = "/patients/prescription/{sno}",
    request_body = PrescriptionReq,
    params(
        ("sno" = i64, Path, description = "Serial number of the patient row")
    ),
    responses(
        (status = 200, description = "Confirmation envelope, or the not-found envelope")
    )
)]
/// Set the prescription for a patient
#[axum::debug_handler]
async fn set_prescription(
    State(state): State<AppState>,
    sno: Result<AxumPath<i64>, PathRejection>,
    payload: Result<Json<PrescriptionReq>, JsonRejection>,
) -> Json<Value> {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let error = malformed_body(rejection);
            tracing::warn!("set prescription rejected: {error}");
            return failure(&error);
        }
    };

    set_single_field(
        &state,
        sno,
        RecordField::Prescription,
        req.prescription,
        "Prescription updated",
    )
    .await
}

#[utoipa::path(
    put,
    path = "/patients/payment_sts/{sno}",
    request_body = PaymentStatusReq,
    params(
        ("sno" = i64, Path, description = "Serial number of the patient row")
    ),
    responses(
        (status = 200, description = "Confirmation envelope, or the not-found envelope")
    )
)]
/// Set the payment status for a patient
#[axum::debug_handler]
async fn set_payment_status(
    State(state): State<AppState>,
    sno: Result<AxumPath<i64>, PathRejection>,
    payload: Result<Json<PaymentStatusReq>, JsonRejection>,
) -> Json<Value> {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let error = malformed_body(rejection);
            tracing::warn!("set payment_status rejected: {error}");
            return failure(&error);
        }
    };

    set_single_field(
        &state,
        sno,
        RecordField::PaymentStatus,
        req.payment,
        "Payment status updated",
    )
    .await
}
