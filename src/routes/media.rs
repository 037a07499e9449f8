use crate::{auth::AuthUser, errors::ApiError, media::{MediaError, MediaService, Upload}};
use actix_multipart::{Field, Multipart};
use actix_web::http::header::ContentDisposition;
use actix_web::{HttpResponse, web};
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt as _;

const FILE_FIELD: &str = "file";

pub async fn upload_media(
    media: web::Data<MediaService>,
    user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let upload = read_upload(payload, media.max_upload_size()).await?;
    let saved = media.upload(user.user_id, upload).await?;
    Ok(HttpResponse::Ok().json(saved))
}

/// Pulls the `file` part out of the form. Every part counts against `limit`,
/// so padding the form with other fields cannot get around it.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, ApiError> {
    let mut total = 0usize;
    let mut upload: Option<Upload> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart".into()))?
    {
        let wanted = upload.is_none() && field.name() == Some(FILE_FIELD);
        let filename = field.content_disposition().and_then(part_filename);
        let mime_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());

        let data = read_field(&mut field, &mut total, limit).await?;
        if !wanted {
            continue;
        }
        let filename = filename.ok_or_else(|| ApiError::BadRequest("file part has no filename".into()))?;
        upload = Some(Upload { data, filename, mime_type });
    }

    upload.ok_or(ApiError::BadRequest("no file part".into()))
}

/// Plain `filename=` first, then the RFC 5987 `filename*=` form.
fn part_filename(cd: &ContentDisposition) -> Option<String> {
    cd.get_filename().map(str::to_string).or_else(|| {
        cd.get_filename_ext()
            .map(|ext| String::from_utf8_lossy(&ext.value).into_owned())
    })
}

async fn read_field(field: &mut Field, total: &mut usize, limit: usize) -> Result<Bytes, ApiError> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("upload read error".into()))?
    {
        *total += chunk.len();
        if *total > limit {
            return Err(MediaError::TooLarge { limit }.into());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data.freeze())
}

pub async fn list_media(
    media: web::Data<MediaService>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(media.list(user.user_id).await?))
}

pub async fn get_media(
    media: web::Data<MediaService>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    Ok(HttpResponse::Ok().json(media.get(user.user_id, id).await?))
}

pub async fn delete_media(
    media: web::Data<MediaService>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    media.delete(user.user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("invalid media id".into()))
}
