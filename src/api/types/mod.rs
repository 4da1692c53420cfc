//! HTTP request, response and error types

pub mod error;
pub mod json;
pub mod scan;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::OptionalJson;
pub use scan::{
    ContentScanResponse, GeneratedKeyResponse, ScanContentRequest, ScanStarted, ScanUrlRequest,
    StatsResponse,
};
