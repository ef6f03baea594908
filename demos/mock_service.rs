//! Stand-in for the user and order services.
//!
//! ```text
//! cargo run --example mock_service -- --port 8080   # user-service
//! cargo run --example mock_service -- --port 8081   # order-service
//! cargo run
//! curl localhost:8082/api/v1/users/42
//! ```

use axum::{extract::Path, routing::get, Json, Router};
use clap::Parser;
use serde_json::{json, Value};
use std::net::SocketAddr;

#[derive(Parser)]
struct Args {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

async fn get_user(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({ "id": id, "name": format!("user-{}", id) }))
}

async fn list_orders() -> Json<Value> {
    Json(json!({ "orders": [] }))
}

async fn create_order(Json(order): Json<Value>) -> (axum::http::StatusCode, Json<Value>) {
    (axum::http::StatusCode::CREATED, Json(json!({ "id": 1, "order": order })))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let app = Router::new()
        .route("/api/v1/users/{id}", get(get_user))
        .route("/api/v1/orders", get(list_orders).post(create_order));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    println!("Mock service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
