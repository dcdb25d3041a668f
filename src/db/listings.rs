use crate::errors::ServerError;
use crate::scraper::crawl::EmittedRecord;
use crate::scraper::{HomePrice, ListingRecord};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};

// home_price is an untyped column: numbers go in as REAL, formatted prices as TEXT.
impl ToSql for HomePrice {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            HomePrice::Number(n) => n.to_sql(),
            HomePrice::Text(s) => s.to_sql(),
        }
    }
}

impl FromSql for HomePrice {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(HomePrice::Number(i as f64)),
            ValueRef::Real(f) => Ok(HomePrice::Number(f)),
            ValueRef::Text(_) => String::column_result(value).map(HomePrice::Text),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

pub fn save_listing(
    conn: &Connection,
    run_id: i64,
    emitted: &EmittedRecord,
) -> Result<(), ServerError> {
    let r = &emitted.record;
    conn.execute(
        r#"
        INSERT INTO listings (
            run_id, position, page,
            home_type, posted, home_url, home_status, home_price,
            home_address, home_zipcode, num_beds, num_baths, home_area
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
        params![
            run_id,
            emitted.position as i64,
            emitted.page as i64,
            r.home_type,
            r.posted,
            r.home_url,
            r.home_status,
            r.home_price,
            r.home_address,
            r.home_zipcode,
            r.num_beds,
            r.num_baths,
            r.home_area,
        ],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

/// Listings of one run, in the order they were emitted.
pub fn get_listings_for_run(
    conn: &Connection,
    run_id: i64,
) -> Result<Vec<ListingRecord>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT home_type, posted, home_url, home_status, home_price,
                   home_address, home_zipcode, num_beds, num_baths, home_area
            FROM listings
            WHERE run_id = ?1
            ORDER BY position
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok(ListingRecord {
                home_type: row.get(0)?,
                posted: row.get(1)?,
                home_url: row.get(2)?,
                home_status: row.get(3)?,
                home_price: row.get(4)?,
                home_address: row.get(5)?,
                home_zipcode: row.get(6)?,
                num_beds: row.get(7)?,
                num_baths: row.get(8)?,
                home_area: row.get(9)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}
