use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use bytes::Bytes;

use crate::errors::AppError;
use crate::models::candidate::CandidateInput;
use crate::state::AppState;

const PDF_FIELD: &str = "offerLetterPDF";
const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug)]
pub struct PdfUpload {
    pub data: Bytes,
    pub content_type: String,
}

/// Candidate create/update body: JSON, or multipart with an optional PDF part.
#[derive(Debug)]
pub struct CandidateForm {
    pub input: CandidateInput,
    pub upload: Option<PdfUpload>,
}

impl CandidateForm {
    /// Stores the upload, if any, and returns its storage key.
    pub async fn store_upload(&mut self, state: &AppState) -> Result<Option<String>, AppError> {
        match self.upload.take() {
            Some(upload) => Ok(Some(
                state.files.put(upload.data, &upload.content_type).await?,
            )),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl FromRequest<AppState> for CandidateForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(input) = Json::<CandidateInput>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(CandidateForm {
                input,
                upload: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut input = CandidateInput::default();
        let mut upload = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == PDF_FIELD {
                let content_type = field
                    .content_type()
                    .unwrap_or(PDF_CONTENT_TYPE)
                    .to_string();
                if content_type != PDF_CONTENT_TYPE {
                    return Err(AppError::Validation(
                        "Only PDF files are allowed for offerLetterPDF".to_string(),
                    ));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                if !data.is_empty() {
                    upload = Some(PdfUpload { data, content_type });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                input.set_text_field(&name, value)?;
            }
        }

        Ok(CandidateForm { input, upload })
    }
}
