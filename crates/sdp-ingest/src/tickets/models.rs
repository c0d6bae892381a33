//! Ticket record model and column-name normalization

use chrono::NaiveDate;

/// Destination table for raw ticket rows
pub const TICKETS_TABLE: &str = "raw_support_tickets";

/// Normalize a source column name: lower-case, each space replaced with an
/// underscore. Pure and per-name, so it is load-order-independent.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// The fixed destination column set, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketColumn {
    TicketId,
    CustomerName,
    CustomerEmail,
    CustomerAge,
    CustomerGender,
    ProductPurchased,
    DateOfPurchase,
    TicketType,
    TicketSubject,
    TicketDescription,
    TicketStatus,
    Resolution,
    TicketPriority,
    TicketChannel,
    FirstResponseTime,
    TimeToResolution,
    CustomerSatisfactionRating,
}

impl TicketColumn {
    /// All destination columns in table order
    pub const ALL: [TicketColumn; 17] = [
        TicketColumn::TicketId,
        TicketColumn::CustomerName,
        TicketColumn::CustomerEmail,
        TicketColumn::CustomerAge,
        TicketColumn::CustomerGender,
        TicketColumn::ProductPurchased,
        TicketColumn::DateOfPurchase,
        TicketColumn::TicketType,
        TicketColumn::TicketSubject,
        TicketColumn::TicketDescription,
        TicketColumn::TicketStatus,
        TicketColumn::Resolution,
        TicketColumn::TicketPriority,
        TicketColumn::TicketChannel,
        TicketColumn::FirstResponseTime,
        TicketColumn::TimeToResolution,
        TicketColumn::CustomerSatisfactionRating,
    ];

    /// SQL column name
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketColumn::TicketId => "ticket_id",
            TicketColumn::CustomerName => "customer_name",
            TicketColumn::CustomerEmail => "customer_email",
            TicketColumn::CustomerAge => "customer_age",
            TicketColumn::CustomerGender => "customer_gender",
            TicketColumn::ProductPurchased => "product_purchased",
            TicketColumn::DateOfPurchase => "date_of_purchase",
            TicketColumn::TicketType => "ticket_type",
            TicketColumn::TicketSubject => "ticket_subject",
            TicketColumn::TicketDescription => "ticket_description",
            TicketColumn::TicketStatus => "ticket_status",
            TicketColumn::Resolution => "resolution",
            TicketColumn::TicketPriority => "ticket_priority",
            TicketColumn::TicketChannel => "ticket_channel",
            TicketColumn::FirstResponseTime => "first_response_time",
            TicketColumn::TimeToResolution => "time_to_resolution",
            TicketColumn::CustomerSatisfactionRating => "customer_satisfaction_rating",
        }
    }

    /// Resolve a normalized column name, or None for an unknown column
    pub fn from_normalized(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|column| column.as_str() == name)
    }
}

impl std::fmt::Display for TicketColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One support-ticket row. Every field is optional: a column may be absent
/// from the source, and empty cells map to NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketRecord {
    pub ticket_id: Option<i32>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_age: Option<i32>,
    pub customer_gender: Option<String>,
    pub product_purchased: Option<String>,
    pub date_of_purchase: Option<NaiveDate>,
    pub ticket_type: Option<String>,
    pub ticket_subject: Option<String>,
    pub ticket_description: Option<String>,
    pub ticket_status: Option<String>,
    pub resolution: Option<String>,
    pub ticket_priority: Option<String>,
    pub ticket_channel: Option<String>,
    pub first_response_time: Option<String>,
    pub time_to_resolution: Option<String>,
    pub customer_satisfaction_rating: Option<f64>,
}

/// Parsed source table: the resolved columns in source order plus the rows
#[derive(Debug, Clone)]
pub struct TicketTable {
    pub columns: Vec<TicketColumn>,
    pub records: Vec<TicketRecord>,
}

impl TicketTable {
    /// Whether the source carries the dedup key column
    pub fn has_ticket_id(&self) -> bool {
        self.columns.contains(&TicketColumn::TicketId)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Ticket ID"), "ticket_id");
        assert_eq!(normalize_column_name("Customer Name"), "customer_name");
        assert_eq!(normalize_column_name("ticket_id"), "ticket_id");
        assert_eq!(normalize_column_name("TICKET TYPE"), "ticket_type");
    }

    #[test]
    fn test_normalize_maps_every_space() {
        // Each space becomes an underscore; runs are not collapsed.
        assert_eq!(normalize_column_name("Customer  Name"), "customer__name");
        assert_eq!(normalize_column_name(" Resolution"), "_resolution");
    }

    #[test]
    fn test_normalize_is_a_fixed_point_on_normalized_names() {
        for column in TicketColumn::ALL {
            assert_eq!(normalize_column_name(column.as_str()), column.as_str());
        }
    }

    #[test]
    fn test_from_normalized_resolves_all_columns() {
        for column in TicketColumn::ALL {
            assert_eq!(TicketColumn::from_normalized(column.as_str()), Some(column));
        }
        assert_eq!(TicketColumn::from_normalized("customer__name"), None);
        assert_eq!(TicketColumn::from_normalized("unknown"), None);
    }

    #[test]
    fn test_has_ticket_id() {
        let table = TicketTable {
            columns: vec![TicketColumn::CustomerName, TicketColumn::TicketStatus],
            records: vec![],
        };
        assert!(!table.has_ticket_id());

        let table = TicketTable {
            columns: vec![TicketColumn::TicketId],
            records: vec![],
        };
        assert!(table.has_ticket_id());
    }
}
