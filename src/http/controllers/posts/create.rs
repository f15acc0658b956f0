use actix_web::{
    web::{self, Json},
    HttpResponse,
};

use crate::http::{Actor, Error};
use crate::posts::CreatePost;
use crate::App;

#[tracing::instrument(skip(app, form))]
pub async fn create(
    app: web::Data<App>,
    actor: Actor,
    form: Json<CreatePost>,
) -> Result<HttpResponse, Error> {
    let post = form
        .into_inner()
        .perform(app.store.as_ref(), actor.user())
        .await?;

    Ok(HttpResponse::Created().json(post))
}
