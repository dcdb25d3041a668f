use crate::responses::download::attachment_response;
use crate::responses::ResultResp;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Return XLSX file as HTTP response
pub fn xlsx_response(buffer: Vec<u8>, filename: &str) -> ResultResp {
    attachment_response(XLSX_MIME, buffer, filename)
}
