use std::io;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    response::Html,
};
use futures::TryStreamExt;
use quillbox_core::{AppError, UploadRequest};
use serde::Deserialize;
use tokio_util::io::StreamReader;

use crate::auth::CurrentUser;
use crate::constants::{CALLBACK_PARAM, UPLOAD_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(rename = "CKEditorFuncNum")]
    func_num: Option<String>,
}

/// Editor callback ids are plain integers; anything else is refused before it can be
/// echoed into a script.
fn parse_callback_id(raw: Option<&str>) -> Result<&str, AppError> {
    match raw {
        Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => Ok(id),
        Some(_) => Err(AppError::BadRequest(format!(
            "{} must be a number",
            CALLBACK_PARAM
        ))),
        None => Err(AppError::BadRequest(format!(
            "Missing {} query parameter",
            CALLBACK_PARAM
        ))),
    }
}

/// Escape for a single-quoted JavaScript string literal inside an HTML script block.
fn js_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '<' => out.push_str("\\x3C"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Script body that hands the uploaded file's URL back to the editor dialog.
pub fn callback_script(func_num: &str, url: &str) -> String {
    format!(
        "<script type='text/javascript'>window.parent.CKEDITOR.tools.callFunction({}, '{}');</script>",
        func_num,
        js_single_quoted(url)
    )
}

/// Upload a file from the editor's upload dialog
///
/// Streams the `upload` multipart field to disk, thumbnails it when it is an image and
/// answers with a script invoking the editor callback with the file's public URL.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    params(
        ("CKEditorFuncNum" = String, Query, description = "Editor callback id (digits)")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored; body invokes the editor callback", content_type = "text/html", body = String),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "No user identity", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, user, query, multipart),
    fields(username = %user.0.username, operation = "upload")
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Html<String>, HttpAppError> {
    let CurrentUser(user) = user;
    let func_num = parse_callback_id(query.func_num.as_deref())?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let declared_name = field.file_name().unwrap_or_default().to_string();
        let content = StreamReader::new(field.map_err(io::Error::other));
        let outcome = state
            .upload_service
            .handle_upload(UploadRequest::new(declared_name, content, user))
            .await?;

        return Ok(Html(callback_script(func_num, &outcome.url)));
    }

    Err(AppError::BadRequest(format!("Missing '{}' file field", UPLOAD_FIELD)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_callback_id() {
        assert_eq!(parse_callback_id(Some("12")).unwrap(), "12");
        assert!(parse_callback_id(Some("")).is_err());
        assert!(parse_callback_id(Some("1);alert(1")).is_err());
        assert!(parse_callback_id(None).is_err());
    }

    #[test]
    fn test_callback_script() {
        assert_eq!(
            callback_script("3", "/media/2024/03/07/cat.png"),
            "<script type='text/javascript'>window.parent.CKEDITOR.tools.callFunction(3, '/media/2024/03/07/cat.png');</script>"
        );
        assert!(callback_script("3", "/x/it's</script>").contains("it\\'s\\x3C/script>"));
    }
}
