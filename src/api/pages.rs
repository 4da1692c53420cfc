//! Server-rendered web page: document upload and URL check forms

use askama::Template;
use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::FormRejection,
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::state::AppState;
use crate::domain::classification::has_http_scheme;
use crate::domain::{DomainError, UploadKind};
use crate::infrastructure::extraction::extract_upload;

/// Multipart field carrying the uploaded document
pub const UPLOAD_FIELD: &str = "file";

#[derive(Template, Debug, Default)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub message: Option<String>,
    pub input_url: Option<String>,
    pub predicted_class: Option<String>,
}

impl IndexPage {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub url: String,
}

/// GET /
pub async fn index() -> Response {
    render(StatusCode::OK, IndexPage::default())
}

/// POST /scam/ - Classify the text of an uploaded PDF or TXT file
pub async fn detect_scam(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => {
            warn!(error = %rejection, "Upload is not a multipart form");
            Ok(None)
        }
    };

    let (filename, bytes) = match upload {
        Ok(Some(upload)) => upload,
        Ok(None) => return render(StatusCode::OK, IndexPage::with_message("No file uploaded.")),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            let max_bytes = state.config.uploads.max_bytes;
            warn!(error = %e, max_bytes, "Upload exceeds size limit");
            return render(
                StatusCode::PAYLOAD_TOO_LARGE,
                IndexPage::with_message(too_large_message(max_bytes)),
            );
        }
        Err(e) => {
            warn!(error = %e, "Failed to read upload");
            return render(e.status(), IndexPage::with_message("No file uploaded."));
        }
    };

    let text = match UploadKind::from_filename(&filename) {
        Ok(kind) => extract_upload(kind, bytes).await,
        Err(e) => Err(e),
    };

    let text = match text {
        Ok(text) => text,
        Err(e) => {
            info!(filename = %filename, error = %e, "Upload rejected");
            return render(StatusCode::OK, IndexPage::with_message(e.user_message()));
        }
    };

    match state.classifier.classify_content(&text).await {
        Ok(message) => render(StatusCode::OK, IndexPage::with_message(message)),
        Err(e) => analysis_failed(e),
    }
}

/// POST /predict - Classify a submitted URL
pub async fn predict_url(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Response {
    let url = form
        .map(|Form(form)| form.url.trim().to_string())
        .unwrap_or_default();

    if !has_http_scheme(&url) {
        return render(
            StatusCode::OK,
            IndexPage {
                message: Some("Invalid URL format.".to_string()),
                input_url: Some(url),
                predicted_class: None,
            },
        );
    }

    match state.classifier.classify_url(&url).await {
        Ok(verdict) => render(
            StatusCode::OK,
            IndexPage {
                message: None,
                input_url: Some(url),
                predicted_class: Some(verdict.raw),
            },
        ),
        Err(e) => analysis_failed(e),
    }
}

/// First file field named [`UPLOAD_FIELD`], as (filename, bytes)
async fn read_upload(
    mut multipart: Multipart,
) -> Result<Option<(String, Vec<u8>)>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Some((filename, bytes.to_vec())));
    }

    Ok(None)
}

fn too_large_message(max_bytes: usize) -> String {
    format!("File is too large. Maximum upload size is {} bytes.", max_bytes)
}

fn analysis_failed(e: DomainError) -> Response {
    warn!(error = %e, "Page analysis failed");
    render(
        StatusCode::BAD_GATEWAY,
        IndexPage::with_message(format!("Analysis failed: {}", e)),
    )
}

fn render(status: StatusCode, page: IndexPage) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_message_is_escaped() {
        let html = IndexPage::with_message("<script>alert(1)</script>")
            .render()
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn test_render_prediction() {
        let html = IndexPage {
            message: None,
            input_url: Some("http://secure-login.paypa1.com/".to_string()),
            predicted_class: Some("phishing".to_string()),
        }
        .render()
        .unwrap();

        assert!(html.contains("<strong>phishing</strong>"));
        assert!(html.contains("secure-login.paypa1.com"));
    }

    #[test]
    fn test_too_large_message_names_limit() {
        assert_eq!(
            too_large_message(1024),
            "File is too large. Maximum upload size is 1024 bytes."
        );
    }

    #[test]
    fn test_empty_page_has_no_result() {
        let html = IndexPage::default().render().unwrap();
        assert!(!html.contains("class=\"result\""));
    }
}
