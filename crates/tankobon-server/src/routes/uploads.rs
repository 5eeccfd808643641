use actix_web::{
    http::{header::CONTENT_TYPE, StatusCode},
    web, HttpRequest, HttpResponse,
};
use tankobon_shared::{
    errors::message_response,
    req_args::api::uploads::{DeleteReqArgs, StoreReqArgs},
};

use crate::uploads::{UploadError, UploadStorage};

/// The raw file is the request body, its category and id come from the query
/// string and the MIME type from the Content-Type header
#[tracing::instrument(name = "Store upload", skip(storage, req, body))]
pub async fn upload_store(
    storage: web::Data<UploadStorage>,
    query: web::Query<StoreReqArgs>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, UploadError> {
    let StoreReqArgs { category, id } = query.into_inner();
    let mime = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or(UploadError::MissingContentType)?;
    // Strip parameters such as a charset before matching the allow-list
    let mime = mime.split(';').next().unwrap_or(mime).trim();
    let location = storage.store(category, id, mime, &body).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "location": location })))
}

#[tracing::instrument(name = "Delete upload", skip(storage))]
pub async fn upload_delete(
    storage: web::Data<UploadStorage>,
    args: web::Json<DeleteReqArgs>,
) -> Result<HttpResponse, UploadError> {
    let DeleteReqArgs { category, id } = args.into_inner();
    storage.delete(category, id).await?;
    Ok(message_response(StatusCode::OK, "deleted"))
}
