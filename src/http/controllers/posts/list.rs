use actix_web::{web, HttpResponse};
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::http::Error;
use crate::listing::PAGE_SIZE;
use crate::schema::Post;
use crate::store::{Cursor, PageQuery, StoreError};
use crate::util::validator::IntoValidatorReport;
use crate::App;

#[derive(Debug, Deserialize, Validate)]
pub struct Request {
    /// Cursor token from a previous page.
    pub after: Option<String>,
    #[validate(range(min = 1, max = 6, message = "Limit must be between 1 and 6"))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub posts: Vec<Post>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[tracing::instrument(skip(app))]
pub async fn list(app: web::Data<App>, query: web::Query<Request>) -> Result<HttpResponse, Error> {
    query.validate().into_validator_report()?;

    let limit = query.limit.unwrap_or(PAGE_SIZE);
    let start_after = query
        .after
        .as_deref()
        .map(Cursor::decode)
        .transpose()
        .change_context(StoreError::InvalidCursor)?;

    let posts = app
        .store
        .query_page(PageQuery { start_after, limit })
        .await?;

    let has_more = posts.len() == limit;
    let next_cursor = posts.last().map(|post| Cursor::after(post).encode());

    Ok(HttpResponse::Ok().json(Response {
        posts,
        next_cursor,
        has_more,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App as ActixApp};
    use assert_json_diff::assert_json_include;
    use serde_json::{json, Value};

    use crate::App;

    #[actix_web::test]
    async fn should_page_through_seeded_posts() {
        let service = test::init_service(
            ActixApp::new()
                .app_data(web::Data::new(App::for_tests()))
                .configure(crate::http::controllers::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/posts?limit=3").to_request();
        let page: Value = test::call_and_read_body_json(&service, req).await;
        assert_json_include!(
            actual: &page,
            expected: json!({
                "has_more": true,
                "posts": [{ "id": "1" }, { "id": "2" }, { "id": "3" }],
            })
        );

        let cursor = page["next_cursor"].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/posts?limit=3&after={cursor}"))
            .to_request();
        let page: Value = test::call_and_read_body_json(&service, req).await;
        assert_json_include!(
            actual: &page,
            expected: json!({
                "has_more": false,
                "posts": [{ "id": "4" }, { "id": "5" }],
            })
        );
    }

    #[actix_web::test]
    async fn should_reject_bad_queries() {
        let service = test::init_service(
            ActixApp::new()
                .app_data(web::Data::new(App::for_tests()))
                .configure(crate::http::controllers::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/posts?limit=7").to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/posts?after=zz").to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "bad_request");
    }
}
