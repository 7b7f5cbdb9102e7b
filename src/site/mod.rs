//! Static site metadata served at `GET /api/author`.

use serde::Serialize;

use crate::{Response, StatusCode};

/// Contact details for the site's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorProfile {
    pub name: &'static str,
    pub title: &'static str,
    pub email: &'static str,
    pub website: &'static str,
    pub github: &'static str,
    pub twitter: &'static str,
}

pub const AUTHOR: AuthorProfile = AuthorProfile {
    name: "Crypto News Desk",
    title: "Market news aggregator",
    email: "hello@example.com",
    website: "https://example.com",
    github: "https://github.com/example",
    twitter: "https://x.com/example",
};

/// [`AUTHOR`] as a JSON response.
pub fn author_response() -> Response {
    match Response::json(StatusCode::Ok, &AUTHOR) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize author profile");
            Response::new(StatusCode::InternalServerError).body("Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_every_contact_field() {
        let value = serde_json::to_value(AUTHOR).unwrap();
        for key in ["name", "title", "email", "website", "github", "twitter"] {
            assert!(value[key].is_string(), "missing {key}");
        }
        assert_eq!(value["email"], AUTHOR.email);
    }

    #[test]
    fn author_response_is_200_json() {
        let res = author_response();
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.headers().get("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(res.payload()).unwrap();
        assert_eq!(body["name"], AUTHOR.name);
    }
}
