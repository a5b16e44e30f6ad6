//! Bearer credential extractor.
//!
//! `Authenticated` reads `Authorization: Bearer <token>` and resolves it
//! through the [`IdentityResolver`](crate::domain::ports::IdentityResolver)
//! in [`HttpState`]. Clearance checks stay in the domain services.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, Error};
use crate::inbound::http::state::HttpState;

const SCHEME: &str = "bearer";

/// The resolved caller of a request.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Actor);

impl Authenticated {
    pub fn actor(&self) -> &Actor {
        &self.0
    }
}

/// Token part of an `Authorization` header value, if it uses the bearer scheme.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(SCHEME) && !token.is_empty()).then_some(token)
}

fn extract_token(req: &HttpRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer credential"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    bearer_token(value)
        .map(str::to_owned)
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = extract_token(req);
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered on the app"))?;
            let actor = state.identity.resolve(&token?).await?;
            Ok::<Self, actix_web::Error>(Self(actor))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::{CATERER_TOKEN, TestPorts};

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer   abc  ", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer", None)]
    #[case("Bearer    ", None)]
    fn bearer_tokens_are_parsed(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(header), expected);
    }

    async fn whoami(auth: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(auth.actor().username.to_string())
    }

    #[rstest]
    #[actix_web::test]
    async fn resolved_actors_reach_the_handler() {
        let ports = TestPorts::default();
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.state())
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {CATERER_TOKEN}")))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body.as_ref(), b"chef");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic Zm9vOmJhcg=="))]
    #[case(Some("Bearer unknown-token"))]
    #[actix_web::test]
    async fn unresolvable_credentials_are_unauthorized(#[case] header: Option<&str>) {
        let ports = TestPorts::default();
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.state())
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let mut req = actix_test::TestRequest::get().uri("/me");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
