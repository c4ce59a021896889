//! Shared-finances REST endpoints
//!
//! Every path keeps its trailing slash.

pub mod chat;
pub mod groups;
pub mod index;
pub mod operations;
pub mod users;

use axum::{
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};

use crate::api::types::ApiError;
use crate::domain::membership::MembershipStatus;

use super::state::AppState;

pub fn create_finance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::api_index))
        .route("/api/", get(index::api_index))
        // Groups
        .route("/group/", post(groups::create_group))
        .route(
            "/group/{id}/",
            get(groups::get_group).delete(groups::delete_group),
        )
        .route("/group/{id}/join/", post(groups::join_group))
        .route("/group/{id}/status/{user}/", put(groups::set_status))
        // Users
        .route("/user/", post(users::register))
        .route("/user/{user}/", get(users::get_user))
        .route("/user/{user}/groups/", get(groups::list_user_groups))
        .route("/login/", post(users::login))
        // Ledger
        .route("/group/{id}/operations/", get(operations::list_operations))
        .route("/group/{id}/operation/", post(operations::record_operation))
        .route("/group/{id}/balance/", get(operations::verify_balance))
        // Chat
        .route(
            "/group/{id}/chat/",
            get(chat::get_messages).post(chat::post_message),
        )
}

/// Timestamp layout used in listings
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse an optional `status` filter; an unknown name is a 400
pub(crate) fn parse_status_filter(
    raw: Option<&str>,
) -> Result<Option<MembershipStatus>, ApiError> {
    raw.map(|s| s.parse::<MembershipStatus>())
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2021, 1, 5, 9, 3, 7).unwrap();
        assert_eq!(format_timestamp(&at), "2021-01-05 09:03:07");
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("pending")).unwrap(),
            Some(MembershipStatus::Pending)
        );
        assert!(parse_status_filter(Some("owner")).is_err());
    }
}
