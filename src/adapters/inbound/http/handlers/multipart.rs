use axum::extract::{multipart::MultipartError, Multipart};
use std::collections::HashMap;

use crate::domain::{
    errors::{ListingError, ListingResult},
    models::ImageUpload,
};

const IMAGE_FIELDS: [&str; 2] = ["images", "images[]"];

/// A fully buffered multipart request: text fields plus image files
#[derive(Debug, Default)]
pub struct MultipartPayload {
    pub fields: HashMap<String, String>,
    pub images: Vec<ImageUpload>,
}

fn multipart_error(err: MultipartError) -> ListingError {
    ListingError::validation(format!("Invalid multipart body: {}", err.body_text()))
}

/// Read every part of `multipart`. Files are only accepted under the
/// `images` field name.
pub async fn read_multipart(mut multipart: Multipart) -> ListingResult<MultipartPayload> {
    let mut payload = MultipartPayload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if IMAGE_FIELDS.contains(&name.as_str()) {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            payload
                .images
                .push(ImageUpload::new(file_name, content_type, data));
        } else if field.file_name().is_some() {
            return Err(ListingError::validation(format!(
                "Unexpected file field: {}",
                name
            )));
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            payload.fields.insert(name, value);
        }
    }

    Ok(payload)
}
