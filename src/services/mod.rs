// Business records
pub mod customers;
pub mod products;
pub mod warehouses;

// Sales documents
pub mod quotes;
pub mod returns;
pub mod sales;

// Money
pub mod accounts;
pub mod expenses;
pub mod payments;

// Operator administration
pub mod plans;
pub mod seed;
pub mod users;

use uuid::Uuid;

/// Builds a document number like `SL-9F21A4C0` for records created without
/// an explicit one.
pub(crate) fn generate_document_number(prefix: &str) -> String {
    let tail = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}", prefix, &tail[..8])
}

#[cfg(test)]
mod tests {
    use super::generate_document_number;

    #[test]
    fn document_numbers_carry_prefix_and_eight_chars() {
        let number = generate_document_number("SL");
        assert!(number.starts_with("SL-"));
        assert_eq!(number.len(), "SL-".len() + 8);
    }

    #[test]
    fn document_numbers_are_unique_enough() {
        let a = generate_document_number("QT");
        let b = generate_document_number("QT");
        assert_ne!(a, b);
    }
}
