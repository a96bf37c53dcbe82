use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use futures::future::LocalBoxFuture;

use crate::{
    auth::{Claims, JwtService},
    errors::AppError,
    middleware::get_request_id,
};

/// Resolves the session from an `Authorization: Bearer` header.
///
/// Requests without a header pass through anonymously; handlers that need a
/// session ask for [`AuthenticatedUser`]. A header carrying an invalid or
/// expired token is rejected here with 401.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let bearer = req.extract::<Option<BearerAuth>>().await.ok().flatten();

            if let Some(bearer) = bearer {
                let jwt_service = req
                    .app_data::<web::Data<JwtService>>()
                    .cloned()
                    .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

                match jwt_service.validate_token(bearer.token()) {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims);
                    }
                    Err(err) => {
                        log::debug!(
                            "Rejected bearer token [{}]: {}",
                            get_request_id(req.request()).unwrap_or_default(),
                            err
                        );
                        let response = err.error_response();
                        return Ok(req.into_response(response).map_into_right_body());
                    }
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

// Extractor for authenticated user in handlers
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, models::domain::User};
    use actix_web::{get, http::StatusCode, test, App, HttpResponse};

    #[get("/whoami")]
    async fn whoami(auth: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(auth.0.username)
    }

    #[get("/open")]
    async fn open() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn jwt() -> JwtService {
        JwtService::new(&Config::test_config().jwt_secret, 1)
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let jwt = jwt();
        let token = jwt.create_token(&User::test_teacher("mr_jones")).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt))
                .wrap(AuthMiddleware)
                .service(whoami),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "mr_jones");
    }

    #[actix_web::test]
    async fn test_missing_token_is_anonymous() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt()))
                .wrap(AuthMiddleware)
                .service(whoami)
                .service(open),
        )
        .await;

        let req = test::TestRequest::get().uri("/open").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/whoami").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_invalid_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt()))
                .wrap(AuthMiddleware)
                .service(open),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/open")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
