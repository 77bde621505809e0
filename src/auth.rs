use std::ops::Deref;

use actix_web::{dev, web, FromRequest, HttpRequest};
use chrono::{Duration, Local};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entity::{
        employee, user,
        sea_orm_active_enums::{AccountStatus, RoleType},
    },
    error::ApiError,
};

/// Issues and validates the bearer tokens carried on every request.
pub struct Authority {
    jwt_key: (EncodingKey, DecodingKey),
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            jwt_key: (EncodingKey::from_secret(jwt_key), DecodingKey::from_secret(jwt_key)),
        }
    }

    /// Issue a token for the given account with 24 hours of expiration time.
    pub fn issue_for(&self, user: &user::Model, employee: Option<&employee::Model>) -> String {
        let claims = Claims {
            exp: (Local::now() + Duration::hours(24)).timestamp(),
            data: TokenUser {
                user_id: user.id,
                username: user.username.clone(),
                email: user.email.clone(),
                role: user.role.clone(),
                status: user.status.clone(),
                employee_id: employee.map(|e| e.id),
                nama_lengkap: employee.map(|e| e.nama_lengkap.clone()),
            },
        };

        encode(&Header::default(), &claims, &self.jwt_key.0).unwrap()
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<TokenUser, ApiError> {
        let payload = decode::<Claims<TokenUser>>(token.as_ref(), &self.jwt_key.1, &Validation::default())
            .map_err(|_| ApiError::Unauthorized("token tidak valid".to_string()))?;

        Ok(payload.claims.data)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

/// The authenticated identity decoded out of the token. `employee_id` is
/// absent for accounts that have not completed their profile yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: RoleType,
    pub status: AccountStatus,
    pub employee_id: Option<Uuid>,
    pub nama_lengkap: Option<String>,
}

impl FromRequest for TokenUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Grabs the value after the space from the `Authorization` header
            // Example: Bearer sometoken
            //                 ^ grabs this value
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(" "))
                )
            else {
                return Err(ApiError::Unauthorized("unauthorized".to_string()).into())
            };

            let authority = req.app_data::<web::Data<Authority>>().expect("Authority must be attached");
            let user = authority.authorize(token)?;

            // Pending accounts may only finish their profile; rejected
            // accounts are locked out entirely.
            match user.status {
                AccountStatus::Active => {}
                AccountStatus::Pending if req.path().contains("complete-profile") => {}
                AccountStatus::Pending => {
                    return Err(ApiError::UnauthorizedCode {
                        message: "akun menunggu persetujuan admin".to_string(),
                        code: "ACCOUNT_PENDING",
                    }.into())
                }
                AccountStatus::Rejected => {
                    return Err(ApiError::UnauthorizedCode {
                        message: "akun ditolak oleh admin".to_string(),
                        code: "ACCOUNT_REJECTED",
                    }.into())
                }
            }

            Ok(user)
        })
    }
}

pub struct Admin(pub TokenUser);

impl Deref for Admin {
    type Target = TokenUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = TokenUser::from_request(&req, &mut dev::Payload::None).await?;

            if user.role != RoleType::Admin {
                return Err(ApiError::forbidden("akses khusus admin").into())
            }

            Ok(Self(user))
        })
    }
}

/// Accepts Admin and HR accounts, the two roles that run approvals.
pub struct AdminOrHr(pub TokenUser);

impl Deref for AdminOrHr {
    type Target = TokenUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AdminOrHr {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = TokenUser::from_request(&req, &mut dev::Payload::None).await?;

            if !user.role.is_privileged() {
                return Err(ApiError::forbidden("akses khusus admin atau HR").into())
            }

            Ok(Self(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{body::MessageBody, get, http::StatusCode, test, web, App, Responder};

    use super::*;

    fn token_user(role: RoleType, status: AccountStatus) -> TokenUser {
        TokenUser {
            user_id: Uuid::new_v4(),
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            role,
            status,
            employee_id: Some(Uuid::new_v4()),
            nama_lengkap: Some("Bob".to_string()),
        }
    }

    fn issue(authority: &Authority, user: &TokenUser) -> String {
        let claims = Claims {
            exp: (Local::now() + Duration::hours(24)).timestamp(),
            data: user.clone(),
        };

        encode(&Header::default(), &claims, &authority.jwt_key.0).unwrap()
    }

    #[actix_web::test]
    async fn test_authority_roundtrip() {
        let authority = Authority::new(b"secret");
        let user = token_user(RoleType::Karyawan, AccountStatus::Active);

        let token = issue(&authority, &user);

        let authorized = authority.authorize(token).expect("Unable to authorize user from token");
        assert_eq!(user, authorized);
    }

    #[actix_web::test]
    async fn test_extractor() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(user: TokenUser) -> impl Responder {
            user.user_id.to_string()
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler)
        ).await;

        {
            let bad_token_req = test::TestRequest::default()
                .uri("/")
                .insert_header(("Authorization", "Bearer wrong"))
                .to_request();

            let response = test::call_service(&app, bad_token_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        {
            let unauthorized_req = test::TestRequest::default()
                .uri("/")
                .to_request();

            let response = test::call_service(&app, unauthorized_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        {
            let user = token_user(RoleType::Karyawan, AccountStatus::Active);
            let token = issue(&Authority::new(secret), &user);

            let authorized_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, authorized_req).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.into_body().try_into_bytes().unwrap(), user.user_id.to_string().as_bytes());
        }
    }

    #[actix_web::test]
    async fn test_pending_account_gate() {
        let secret = b"secret";

        #[get("/attendance")]
        async fn attendance_handler(_user: TokenUser) -> impl Responder {
            ""
        }

        #[get("/users/complete-profile")]
        async fn profile_handler(_user: TokenUser) -> impl Responder {
            ""
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(attendance_handler)
                .service(profile_handler)
        ).await;

        let pending = token_user(RoleType::Karyawan, AccountStatus::Pending);
        let token = issue(&Authority::new(secret), &pending);

        {
            let blocked_req = test::TestRequest::default()
                .uri("/attendance")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, blocked_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = response.into_body().try_into_bytes().unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["code"], "ACCOUNT_PENDING");
        }

        {
            let allowed_req = test::TestRequest::default()
                .uri("/users/complete-profile")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, allowed_req).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[actix_web::test]
    async fn test_rejected_account_locked_out() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(_user: TokenUser) -> impl Responder {
            ""
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler)
        ).await;

        let rejected = token_user(RoleType::Karyawan, AccountStatus::Rejected);
        let token = issue(&Authority::new(secret), &rejected);

        let req = test::TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], "ACCOUNT_REJECTED");
    }

    #[actix_web::test]
    async fn test_role_guards() {
        let secret = b"secret";

        #[get("/admin")]
        async fn admin_handler(user: Admin) -> impl Responder {
            assert_eq!(user.role, RoleType::Admin);

            ""
        }

        #[get("/approvals")]
        async fn approvals_handler(_user: AdminOrHr) -> impl Responder {
            ""
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(admin_handler)
                .service(approvals_handler)
        ).await;

        let authority = Authority::new(secret);
        let admin_token = issue(&authority, &token_user(RoleType::Admin, AccountStatus::Active));
        let hr_token = issue(&authority, &token_user(RoleType::Hr, AccountStatus::Active));
        let employee_token = issue(&authority, &token_user(RoleType::Karyawan, AccountStatus::Active));

        for (uri, token, expected) in [
            ("/admin", &admin_token, StatusCode::OK),
            ("/admin", &hr_token, StatusCode::FORBIDDEN),
            ("/admin", &employee_token, StatusCode::FORBIDDEN),
            ("/approvals", &admin_token, StatusCode::OK),
            ("/approvals", &hr_token, StatusCode::OK),
            ("/approvals", &employee_token, StatusCode::FORBIDDEN),
        ] {
            let req = test::TestRequest::default()
                .uri(uri)
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), expected, "{uri}");
        }
    }
}
