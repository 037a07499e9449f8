use crate::{errors::ApiError, media::MediaService};
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType, HeaderValue};
use actix_web::{HttpResponse, web};

// Public by design: the blob name is the capability, as with the URLs handed
// out at upload time.
pub async fn get_file(
    media: web::Data<MediaService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let (record, data) = media.open(&name).await?;

    let mime = HeaderValue::from_str(&record.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, mime))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(record.media_name)],
        })
        .body(data))
}
