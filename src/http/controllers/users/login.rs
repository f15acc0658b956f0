use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::auth::Directory;
use crate::http::{jwt::LoginClaims, Error};
use crate::schema::User;
use crate::types::ErrorKind;
use crate::util::validator::IntoValidatorReport;
use crate::App;

#[derive(Debug, Deserialize, Validate)]
pub struct Request {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Error)]
#[error("Invalid username or password.")]
struct InvalidCredentials;

#[derive(Debug, Error)]
#[error("Could not issue an API token")]
struct TokenError;

#[tracing::instrument(skip_all, fields(username = %form.username))]
pub async fn login(app: web::Data<App>, form: Json<Request>) -> Result<HttpResponse, Error> {
    form.validate().into_validator_report()?;

    let Some(user) = Directory::demo().authenticate(&form.username, &form.password) else {
        return Err(Error::from_context(ErrorKind::Forbidden, InvalidCredentials));
    };

    let token = LoginClaims::generate(&app, user)
        .encode(&app)
        .change_context(TokenError)
        .map_err(|e| Error::from_report(ErrorKind::Internal, e))?;

    tracing::info!(user.id = %user.id, "issued API token");
    Ok(HttpResponse::Ok().json(Response {
        user: user.clone(),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App as ActixApp};
    use assert_json_diff::assert_json_include;
    use serde_json::{json, Value};

    use crate::auth::DEMO_PASSWORD;
    use crate::http::jwt::LoginClaims;
    use crate::App;

    #[actix_web::test]
    async fn should_login_demo_user() {
        let app = App::for_tests();
        let service = test::init_service(
            ActixApp::new()
                .app_data(web::Data::new(app.clone()))
                .configure(crate::http::controllers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({ "username": "admin", "password": DEMO_PASSWORD }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_json_include!(
            actual: &body,
            expected: json!({
                "user": { "id": "2", "username": "admin", "name": "Adam Min", "role": "admin" },
            })
        );
        assert!(body["user"].get("password").is_none());

        let claims = LoginClaims::decode(&app, body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.name, "Adam Min");
    }

    #[actix_web::test]
    async fn should_reject_wrong_password() {
        let service = test::init_service(
            ActixApp::new()
                .app_data(web::Data::new(App::for_tests()))
                .configure(crate::http::controllers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({ "username": "admin", "password": "hunter2" }))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(json!({ "username": "", "password": "" }))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
