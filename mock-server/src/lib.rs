use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    pub credit_level: i64,
    pub valid: bool,
}

#[derive(Deserialize)]
pub struct CustomerInput {
    pub firstname: String,
    pub lastname: String,
}

impl CustomerInput {
    /// Badly shaped bodies become `Invalid Customer` (400).
    fn from_body(body: serde_json::Value) -> Result<Self, AppError> {
        serde_json::from_value(body).map_err(|e| AppError::Invalid(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl SearchParams {
    fn matches(&self, customer: &Customer) -> bool {
        let check = |filter: &Option<String>, value: &str| match filter.as_deref() {
            None | Some("") => true,
            Some(wanted) => wanted == value,
        };
        check(&self.firstname, &customer.firstname) && check(&self.lastname, &customer.lastname)
    }
}

/// In-memory customer table. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    customers: BTreeMap<u64, Customer>,
}

impl Store {
    fn insert(&mut self, input: CustomerInput) -> Customer {
        self.next_id += 1;
        let customer = Customer {
            id: self.next_id,
            firstname: input.firstname,
            lastname: input.lastname,
            credit_level: 0,
            valid: true,
        };
        self.customers.insert(customer.id, customer.clone());
        customer
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error responses, rendered as `{status, error, message}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Customer with id '{0}' was not found.")]
    NotFound(u64),

    #[error("Invalid Customer: {0}")]
    Invalid(String),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Invalid(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        tracing::info!(status = status.as_u16(), %message, "request failed");
        let body = json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Lists customers in id order, narrowed by any non-empty filters.
async fn list_customers(State(db): State<Db>, Query(params): Query<SearchParams>) -> Json<Vec<Customer>> {
    let store = db.read().await;
    Json(
        store
            .customers
            .values()
            .filter(|c| params.matches(c))
            .cloned()
            .collect(),
    )
}

async fn create_customer(
    State(db): State<Db>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let input = CustomerInput::from_body(body)?;
    let customer = db.write().await.insert(input);
    tracing::info!(id = customer.id, "customer created");
    let location = format!("/customers/{}", customer.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(customer)).into_response())
}

async fn get_customer(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Customer>, AppError> {
    let Path(id) = id?;
    let store = db.read().await;
    store.customers.get(&id).cloned().map(Json).ok_or(AppError::NotFound(id))
}

async fn update_customer(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Customer>, AppError> {
    let Path(id) = id?;
    let mut store = db.write().await;
    let customer = store.customers.get_mut(&id).ok_or(AppError::NotFound(id))?;
    let Json(body) = body?;
    let input = CustomerInput::from_body(body)?;
    customer.firstname = input.firstname;
    customer.lastname = input.lastname;
    tracing::info!(id, "customer updated");
    Ok(Json(customer.clone()))
}

async fn delete_customer(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Path(id) = id?;
    let mut store = db.write().await;
    store.customers.remove(&id).ok_or(AppError::NotFound(id))?;
    tracing::info!(id, "customer deleted");
    Ok(Json(json!({ "id": id })))
}
