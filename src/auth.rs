use std::ops::Deref;

use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::sea_orm_active_enums::AccessRole;

/// Verifies bearer tokens minted by the identity service.
///
/// Issuing tokens is not this service's job, only reading who is acting.
pub struct Authority {
    jwt_key: DecodingKey,
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            jwt_key: DecodingKey::from_secret(jwt_key),
        }
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<Actor, AuthError> {
        let payload = decode::<Claims<Actor>>(token.as_ref(), &self.jwt_key, &Validation::default())?;

        Ok(payload.claims.data)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

/// Employee performing the request. Stamped into approvals and history rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub access_role: AccessRole,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authority error")]
    AuthorityError(#[from] jsonwebtoken::errors::Error),
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::AuthorityError(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Value after the scheme, e.g. `Bearer <token>`
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(" "))
                )
            else {
                return Err(actix_web::error::ErrorUnauthorized("unauthorized"))
            };

            let Some(authority) = req.app_data::<web::Data<Authority>>() else {
                return Err(actix_web::error::ErrorInternalServerError("authority is not configured"))
            };
            let actor = authority.authorize(token)?;

            Ok(actor)
        })
    }
}

/// Actor allowed to create, calculate, approve and pay payrolls
pub struct PayrollManager(pub Actor);

impl Deref for PayrollManager {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for PayrollManager {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let actor = Actor::from_request(&req, &mut dev::Payload::None).await?;

            if !actor.access_role.manages_payroll() {
                return Err(actix_web::error::ErrorForbidden("forbidden"))
            }

            Ok(Self(actor))
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{body::MessageBody, get, test, App, Responder};
    use chrono::{Duration, Local};
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    pub(crate) const SECRET: &[u8] = b"secret";

    pub(crate) fn actor(access_role: AccessRole) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            name: "Bob Builder".to_owned(),
            access_role,
        }
    }

    /// Token as the identity service would mint it, valid for a week
    pub(crate) fn issue_for(actor: &Actor) -> String {
        let claims = Claims {
            exp: (Local::now() + Duration::weeks(1)).timestamp(),
            data: actor,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[actix_web::test]
    async fn test_authority() {
        let authority = Authority::new(SECRET);
        let actor = actor(AccessRole::Employee);

        let token = issue_for(&actor);

        let authorized = authority.authorize(token).expect("Unable to authorize actor from token");
        assert_eq!(actor, authorized);
        assert!(Authority::new(b"other").authorize(issue_for(&actor)).is_err());
    }

    #[actix_web::test]
    async fn test_extractor() {
        #[get("/")]
        async fn test_handler(actor: Actor) -> impl Responder {
            actor.id.to_string()
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .service(test_handler)
        ).await;

        {
            let forbidden_req = test::TestRequest::default()
                .uri("/")
                .insert_header(("Authorization", "Bearer wrong"))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        {
            let unauthorized_req = test::TestRequest::default()
                .uri("/")
                .to_request();

            let response = test::call_service(&app, unauthorized_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        {
            let actor = actor(AccessRole::Employee);
            let token = issue_for(&actor);

            let authorized_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, authorized_req).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.into_body().try_into_bytes().unwrap(), actor.id.to_string().as_bytes());
        }
    }

    #[actix_web::test]
    async fn test_payroll_manager_extractor() {
        #[get("/")]
        async fn test_handler(manager: PayrollManager) -> impl Responder {
            assert!(manager.access_role.manages_payroll());

            ""
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .service(test_handler)
        ).await;

        for role in [AccessRole::Admin, AccessRole::Hr, AccessRole::Finance] {
            let token = issue_for(&actor(role));

            let success_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, success_req).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        for role in [AccessRole::Manager, AccessRole::Employee] {
            let token = issue_for(&actor(role));

            let forbidden_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }
}
