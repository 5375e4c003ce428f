//! Line items of an invoice

use crate::core::aggregate::{self, Reducer, Reducers};

crate::impl_record!(
    InvoiceLine,
    "invoice_line",
    search: ["invoice_number", "description"],
    {
        invoice_number: String => Text,
        position: u32 => Number,
        description: String => Text,
        #[validate(range(min = 0.0))]
        quantity: f64 => Number,
        #[validate(range(min = 0.0))]
        rate: f64 => Number,
        tax_percent: Option<f64> => Number,
    }
);

impl InvoiceLine {
    /// Subtotal, tax and grand total of an invoice
    pub fn summary() -> Reducers {
        let field = |name: &str| name.to_string();
        Reducers::from([
            (
                "subtotal".to_string(),
                Reducer::Subtotal {
                    quantity: field("quantity"),
                    rate: field("rate"),
                },
            ),
            (
                "tax".to_string(),
                Reducer::Tax {
                    quantity: field("quantity"),
                    rate: field("rate"),
                    tax_percent: field("tax_percent"),
                },
            ),
            (
                "total".to_string(),
                Reducer::LineTotal {
                    quantity: field("quantity"),
                    rate: field("rate"),
                    tax_percent: field("tax_percent"),
                },
            ),
        ])
    }

    /// Quantity × rate × (1 + tax/100), tax clamped to `[0, 100]`
    pub fn line_total(&self) -> f64 {
        aggregate::line_total(self.quantity, self.rate, self.tax_percent.unwrap_or(0.0))
    }
}
