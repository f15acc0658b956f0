use actix_web::{web, HttpResponse};

use crate::http::Error;
use crate::posts::find_post;
use crate::types::PostId;
use crate::App;

#[tracing::instrument(skip(app))]
pub async fn get(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let id = PostId::new(path.into_inner());
    let post = find_post(app.store.as_ref(), &id).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App as ActixApp};
    use serde_json::Value;

    use crate::App;

    #[actix_web::test]
    async fn should_get_post_or_not_found() {
        let service = test::init_service(
            ActixApp::new()
                .app_data(web::Data::new(App::for_tests()))
                .configure(crate::http::controllers::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/posts/2").to_request();
        let post: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(post["id"], "2");
        assert_eq!(post["author"]["name"], "Eddie Tor");
        assert_eq!(post["created_at"], "2024-07-19T14:30:00+00:00");

        let req = test::TestRequest::get().uri("/posts/missing").to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
    }
}
