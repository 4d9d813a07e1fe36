//! The backend's uniform response envelope.
//!
//! Every `/v1` endpoint answers `{"success": bool, "data": ..., "error": ...}`.
//! A 200 with `success:false` is an application-level failure and carries an
//! error code/message instead of data.

use serde::Deserialize;

use crate::error::HttpError;

/// Application-level error payload inside an envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Uniform response envelope.
///
/// No field-level `default` attributes: serde already reads missing `Option`
/// fields as `None`, and a `default` on the generic `data` field would drag a
/// `T: Default` bound into the `Deserialize` impl.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

impl<T> Envelope<T> {
    /// Unwrap the envelope into the payload or the embedded error.
    pub fn into_result(self) -> Result<T, HttpError> {
        if self.success {
            self.data.ok_or_else(|| HttpError::Api {
                code: "missing_data".to_string(),
                message: "success response carried no data".to_string(),
            })
        } else {
            Err(self.into_error())
        }
    }

    /// Unwrap an envelope from an endpoint that acknowledges without a
    /// payload (deletes, logout). `success:true` with no data is the
    /// expected shape here, not an error.
    pub fn into_unit_result(self) -> Result<(), HttpError> {
        if self.success {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    fn into_error(self) -> HttpError {
        let err = self.error.unwrap_or(ApiErrorBody {
            code: "unknown".to_string(),
            message: String::new(),
        });
        HttpError::Api {
            code: err.code,
            message: err.message,
        }
    }
}
