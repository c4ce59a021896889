//! API index

use serde::Serialize;

use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct Link {
    pub href: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub version: &'static str,
    pub _links: Links,
}

/// GET / and GET /api/
pub async fn api_index() -> Json<IndexResponse> {
    Json(IndexResponse {
        version: env!("CARGO_PKG_VERSION"),
        _links: Links {
            self_link: Link { href: "/api/" },
        },
    })
}
