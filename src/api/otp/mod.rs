//! OTP auth API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth/otp", otp_routes())
}

fn otp_routes() -> Router<ServerState> {
    Router::new()
        .route("/send", post(handler::send))
        .route("/verify", post(handler::verify))
        .route("/resend", post(handler::resend))
}
