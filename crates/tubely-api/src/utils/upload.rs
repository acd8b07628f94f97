//! Common utilities for file upload handlers

use std::error::Error as StdError;
use std::io;
use std::pin::Pin;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http_body_util::LengthLimitError;
use tokio_util::io::StreamReader;
use tubely_core::AppError;
use tubely_processing::ProcessingError;

/// Body stream of a multipart field as an `AsyncRead`.
pub type FieldReader<'a> =
    StreamReader<Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send + 'a>>, Bytes>;

/// Parse the request body as multipart. Called only after the caller is authorized.
///
/// Handlers then look for their file field with `next_field`, skipping any others.
pub async fn multipart_from_request(request: Request) -> Result<Multipart, AppError> {
    Multipart::from_request(request, &())
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart request: {}", e.body_text())))
}

/// Stream a field's bytes without buffering them.
pub fn field_reader(field: Field<'_>) -> FieldReader<'_> {
    let stream: Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send + '_>> =
        Box::pin(field.map_err(io::Error::other));
    StreamReader::new(stream)
}

/// Map a failure to read the next multipart field.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE || exceeds_length_limit(&err) {
        AppError::PayloadTooLarge(format!("Request body too large: {}", err.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Map a staging failure. A body cut off by the size limit surfaces as a read error
/// wrapping the multipart rejection, and is reported as 413 like any other overrun.
pub fn staging_error(err: ProcessingError) -> AppError {
    match err {
        ProcessingError::BodyRead(io_err) => {
            let cut_off = io_err.get_ref().is_some_and(|inner| {
                let status_says_so = inner
                    .downcast_ref::<MultipartError>()
                    .is_some_and(|e| e.status() == StatusCode::PAYLOAD_TOO_LARGE);
                status_says_so || exceeds_length_limit(inner)
            });
            if cut_off {
                AppError::PayloadTooLarge(format!("Request body too large: {}", io_err))
            } else {
                AppError::InvalidInput(format!("Failed to read upload body: {}", io_err))
            }
        }
        other => other.into(),
    }
}

/// The body limit error can sit several layers deep (multer, axum and the limiting
/// body each wrap it), so check the whole source chain.
fn exceeds_length_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
