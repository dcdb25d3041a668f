use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use crate::scraper::{HomePrice, ListingRecord};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

fn xlsx_err(what: &str) -> impl Fn(XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

fn write_opt_str(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
    what: &str,
) -> Result<(), ServerError> {
    // Unknown fields stay as blank cells.
    if let Some(v) = value {
        ws.write_string(row, col, v).map_err(xlsx_err(what))?;
    }
    Ok(())
}

fn write_opt_num(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
    what: &str,
) -> Result<(), ServerError> {
    if let Some(v) = value {
        ws.write_number(row, col, v).map_err(xlsx_err(what))?;
    }
    Ok(())
}

/// One header row with the record field names, then one row per listing.
pub fn listings_workbook(listings: &[ListingRecord]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in ListingRecord::FIELDS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(xlsx_err("header"))?;
    }

    for (i, listing) in listings.iter().enumerate() {
        let r = (i + 1) as u32;

        write_opt_str(worksheet, r, 0, listing.home_type.as_deref(), "home type")?;
        write_opt_num(worksheet, r, 1, listing.posted.map(|d| d as f64), "posted")?;
        write_opt_str(worksheet, r, 2, listing.home_url.as_deref(), "URL")?;
        write_opt_str(worksheet, r, 3, listing.home_status.as_deref(), "status")?;
        match &listing.home_price {
            Some(HomePrice::Number(n)) => write_opt_num(worksheet, r, 4, Some(*n), "price")?,
            Some(HomePrice::Text(s)) => write_opt_str(worksheet, r, 4, Some(s.as_str()), "price")?,
            None => {}
        }
        write_opt_str(worksheet, r, 5, listing.home_address.as_deref(), "address")?;
        write_opt_str(worksheet, r, 6, listing.home_zipcode.as_deref(), "zipcode")?;
        write_opt_num(worksheet, r, 7, listing.num_beds, "beds")?;
        write_opt_num(worksheet, r, 8, listing.num_baths, "baths")?;
        write_opt_num(worksheet, r, 9, listing.home_area, "area")?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_listings_xlsx(listings: &[ListingRecord], run_id: i64) -> ResultResp {
    let buffer = listings_workbook(listings)?;
    xlsx_response(buffer, &format!("listings_run_{run_id}.xlsx"))
}
