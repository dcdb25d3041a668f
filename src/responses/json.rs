use crate::errors::ServerError;
use crate::responses::download::attachment_response;
use crate::responses::ResultResp;
use serde::Serialize;

/// Serialize `value` as a downloadable JSON document.
pub fn json_response<T: Serialize + ?Sized>(value: &T, filename: &str) -> ResultResp {
    let body = serde_json::to_vec_pretty(value).map_err(|_| ServerError::InternalError)?;
    attachment_response(mime::APPLICATION_JSON.as_ref(), body, filename)
}
