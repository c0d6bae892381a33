//! CSV parsing for ticket feeds
//!
//! The header row is normalized and resolved against the fixed destination
//! column set; data rows are parsed into typed records. Empty cells map to
//! NULL. Any malformed input (ragged row, unknown column, cell that fails
//! typed parsing) aborts the run.

use chrono::NaiveDate;
use tracing::debug;

use super::models::{normalize_column_name, TicketColumn, TicketRecord, TicketTable};
use super::{IngestError, Result};

/// Expected format for `date_of_purchase` cells
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse raw CSV content into a [`TicketTable`].
pub fn parse_tickets(content: &str) -> Result<TicketTable> {
    if content.trim().is_empty() {
        return Err(IngestError::Parse("source is empty, missing header row".to_string()));
    }

    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::Parse(format!("failed to read header row: {e}")))?
        .clone();

    let mut columns = Vec::with_capacity(headers.len());
    for raw in headers.iter() {
        let normalized = normalize_column_name(raw);
        let column = TicketColumn::from_normalized(&normalized).ok_or_else(|| {
            IngestError::Parse(format!("unknown column '{raw}' (normalized '{normalized}')"))
        })?;
        if columns.contains(&column) {
            return Err(IngestError::Parse(format!("duplicate column '{column}'")));
        }
        columns.push(column);
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = row.map_err(|e| IngestError::Parse(format!("malformed CSV record: {e}")))?;

        let mut record = TicketRecord::default();
        for (column, cell) in columns.iter().zip(row.iter()) {
            apply_cell(&mut record, *column, cell, line)?;
        }
        records.push(record);
    }

    debug!(rows = records.len(), columns = columns.len(), "Parsed ticket CSV");

    Ok(TicketTable { columns, records })
}

/// Parse one cell into its typed field on the record.
fn apply_cell(
    record: &mut TicketRecord,
    column: TicketColumn,
    raw: &str,
    line: usize,
) -> Result<()> {
    let value = raw.trim();

    match column {
        TicketColumn::TicketId => record.ticket_id = parse_int(value, column, line)?,
        TicketColumn::CustomerAge => record.customer_age = parse_int(value, column, line)?,
        TicketColumn::CustomerSatisfactionRating => {
            record.customer_satisfaction_rating = parse_float(value, column, line)?
        },
        TicketColumn::DateOfPurchase => record.date_of_purchase = parse_date(value, column, line)?,
        TicketColumn::CustomerName => record.customer_name = parse_text(value),
        TicketColumn::CustomerEmail => record.customer_email = parse_text(value),
        TicketColumn::CustomerGender => record.customer_gender = parse_text(value),
        TicketColumn::ProductPurchased => record.product_purchased = parse_text(value),
        TicketColumn::TicketType => record.ticket_type = parse_text(value),
        TicketColumn::TicketSubject => record.ticket_subject = parse_text(value),
        TicketColumn::TicketDescription => record.ticket_description = parse_text(value),
        TicketColumn::TicketStatus => record.ticket_status = parse_text(value),
        TicketColumn::Resolution => record.resolution = parse_text(value),
        TicketColumn::TicketPriority => record.ticket_priority = parse_text(value),
        TicketColumn::TicketChannel => record.ticket_channel = parse_text(value),
        TicketColumn::FirstResponseTime => record.first_response_time = parse_text(value),
        TicketColumn::TimeToResolution => record.time_to_resolution = parse_text(value),
    }

    Ok(())
}

fn parse_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_int(value: &str, column: TicketColumn, line: usize) -> Result<Option<i32>> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<i32>().map(Some).map_err(|_| {
        IngestError::Parse(format!("row {line}: invalid integer '{value}' in column {column}"))
    })
}

fn parse_float(value: &str, column: TicketColumn, line: usize) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| {
        IngestError::Parse(format!("row {line}: invalid number '{value}' in column {column}"))
    })
}

fn parse_date(value: &str, column: TicketColumn, line: usize) -> Result<Option<NaiveDate>> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map(Some).map_err(|_| {
        IngestError::Parse(format!(
            "row {line}: invalid date '{value}' in column {column} (expected YYYY-MM-DD)"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HEADER: &str = "Ticket ID,Customer Name,Customer Email,Customer Age,\
Customer Gender,Product Purchased,Date of Purchase,Ticket Type,Ticket Subject,\
Ticket Description,Ticket Status,Resolution,Ticket Priority,Ticket Channel,\
First Response Time,Time to Resolution,Customer Satisfaction Rating";

    #[test]
    fn test_parse_full_row() {
        let csv = format!(
            "{FULL_HEADER}\n\
             1,Alice Smith,alice@example.com,34,Female,GoPro Hero,2023-01-15,\
             Technical issue,Setup problem,Device will not pair,Open,,Low,Email,\
             2023-06-01 10:00:00,2023-06-02 10:00:00,3.5\n"
        );

        let table = parse_tickets(&csv).unwrap();
        assert_eq!(table.columns.len(), 17);
        assert_eq!(table.records.len(), 1);
        assert!(table.has_ticket_id());

        let record = &table.records[0];
        assert_eq!(record.ticket_id, Some(1));
        assert_eq!(record.customer_name.as_deref(), Some("Alice Smith"));
        assert_eq!(record.customer_age, Some(34));
        assert_eq!(
            record.date_of_purchase,
            Some(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())
        );
        assert_eq!(record.resolution, None);
        assert_eq!(record.customer_satisfaction_rating, Some(3.5));
    }

    #[test]
    fn test_parse_subset_of_columns() {
        let csv = "Customer Name,Ticket Status\nBob,Open\nCarol,Closed\n";
        let table = parse_tickets(csv).unwrap();

        assert_eq!(table.columns, vec![TicketColumn::CustomerName, TicketColumn::TicketStatus]);
        assert!(!table.has_ticket_id());
        assert_eq!(table.records[1].customer_name.as_deref(), Some("Carol"));
        assert_eq!(table.records[1].ticket_id, None);
    }

    #[test]
    fn test_empty_cells_become_none() {
        let csv = "Ticket ID,Customer Age,Customer Satisfaction Rating,Date of Purchase\n\
                   5,,,\n";
        let table = parse_tickets(csv).unwrap();
        let record = &table.records[0];
        assert_eq!(record.ticket_id, Some(5));
        assert_eq!(record.customer_age, None);
        assert_eq!(record.customer_satisfaction_rating, None);
        assert_eq!(record.date_of_purchase, None);
    }

    #[test]
    fn test_unknown_column_is_parse_error() {
        let err = parse_tickets("Ticket ID,Favorite Color\n1,blue\n").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
        assert!(err.to_string().contains("favorite_color"));
    }

    #[test]
    fn test_bad_integer_names_row_and_column() {
        let err = parse_tickets("Ticket ID\nnot-a-number\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row 2"));
        assert!(message.contains("ticket_id"));
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let err = parse_tickets("Date of Purchase\n15/01/2023\n").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let err = parse_tickets("Ticket ID,Customer Name\n1,Alice,extra\n").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = parse_tickets("").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn test_duplicate_column_is_parse_error() {
        let err = parse_tickets("Ticket ID,ticket_id\n1,2\n").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }
}
