//! Invoice documents and the CSV/ZIP export

use std::borrow::Cow;
use std::io::{Cursor, Write};

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{Customer, Order, OrderItem, OrderStatus};
use shared::util::utc_date;
use zip::write::FileOptions;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub discount_amount: f64,
    pub line_total: f64,
}

/// Customer-facing invoice for one order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub invoice_number: String,
    pub order_id: i64,
    /// UTC date the order was placed
    pub issue_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub customer: Option<InvoiceCustomer>,
    pub payment_method: Option<String>,
    pub note: Option<String>,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub discount_total: f64,
    pub shipping_fee: f64,
    pub total: f64,
}

/// Build the invoice for an order. Orders without a number yet fall back to `ORDER-<id>`.
pub fn build_invoice(order: &Order, customer: Option<&Customer>, items: &[OrderItem]) -> Invoice {
    Invoice {
        invoice_number: order
            .invoice_number
            .clone()
            .unwrap_or_else(|| format!("ORDER-{}", order.id)),
        order_id: order.id,
        issue_date: utc_date(order.ordered_at),
        status: order.status,
        customer: customer.map(|c| InvoiceCustomer {
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
        }),
        payment_method: order.payment_method.clone(),
        note: order.note.clone(),
        lines: items
            .iter()
            .map(|item| InvoiceLine {
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                discount_amount: item.discount_amount,
                line_total: item.line_total,
            })
            .collect(),
        subtotal: order.subtotal,
        discount_total: order.discount_total,
        shipping_fee: order.shipping_fee,
        total: order.total,
    }
}

/// Quote a CSV field when it contains a comma, quote, CR or LF
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_field(field));
    }
    out.push_str("\r\n");
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// One row per invoice
pub fn invoices_csv(invoices: &[Invoice]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &[
            "invoice_number",
            "order_id",
            "issue_date",
            "status",
            "customer_name",
            "customer_email",
            "payment_method",
            "subtotal",
            "discount_total",
            "shipping_fee",
            "total",
        ],
    );
    for inv in invoices {
        let issue_date = inv.issue_date.map(|d| d.to_string()).unwrap_or_default();
        let customer = inv.customer.as_ref();
        push_row(
            &mut out,
            &[
                &inv.invoice_number,
                &inv.order_id.to_string(),
                &issue_date,
                inv.status.as_str(),
                customer.map(|c| c.name.as_str()).unwrap_or(""),
                customer.and_then(|c| c.email.as_deref()).unwrap_or(""),
                inv.payment_method.as_deref().unwrap_or(""),
                &money(inv.subtotal),
                &money(inv.discount_total),
                &money(inv.shipping_fee),
                &money(inv.total),
            ],
        );
    }
    out
}

/// One row per invoice line
pub fn invoice_lines_csv(invoices: &[Invoice]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &[
            "invoice_number",
            "line",
            "product_name",
            "quantity",
            "unit_price",
            "discount_amount",
            "line_total",
        ],
    );
    for inv in invoices {
        for (n, line) in inv.lines.iter().enumerate() {
            push_row(
                &mut out,
                &[
                    &inv.invoice_number,
                    &(n + 1).to_string(),
                    &line.product_name,
                    &line.quantity.to_string(),
                    &money(line.unit_price),
                    &money(line.discount_amount),
                    &money(line.line_total),
                ],
            );
        }
    }
    out
}

/// Invoice archive errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

/// ZIP archive with `invoices.csv` and `invoice_lines.csv`
pub fn export_zip(invoices: &[Invoice]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buf);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("invoices.csv", options)?;
        zip.write_all(invoices_csv(invoices).as_bytes())?;
        zip.start_file("invoice_lines.csv", options)?;
        zip.write_all(invoice_lines_csv(invoices).as_bytes())?;
        zip.finish()?;
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    // 2024-05-17T10:00:00Z
    const ORDERED_AT: i64 = 1_715_940_000_000;

    fn order() -> Order {
        Order {
            id: 77,
            customer_id: Some(5),
            invoice_number: Some("INV-20240517-12".into()),
            status: OrderStatus::Paid,
            payment_method: Some("bank_transfer".into()),
            shipping_fee: 4.5,
            note: None,
            subtotal: 30.0,
            discount_total: 3.0,
            operating_cost_total: 1.0,
            cost_total: 10.0,
            total: 31.5,
            profit: 16.0,
            ordered_at: ORDERED_AT,
            created_at: ORDERED_AT,
            updated_at: ORDERED_AT,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: 5,
            name: "Doe, Jane".into(),
            email: Some("jane@example.com".into()),
            phone: None,
            address: Some("1 Main St\nSpringfield".into()),
            note: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn items() -> Vec<OrderItem> {
        vec![OrderItem {
            id: 1,
            order_id: 77,
            product_id: 9,
            product_name: "Mug \"Classic\"".into(),
            quantity: 3,
            unit_price: 10.0,
            unit_cost: 10.0 / 3.0,
            discount_id: Some(2),
            discount_amount: 3.0,
            calculation_setting_ids: vec![],
            cost_breakdown: vec![],
            operating_cost: 1.0,
            gross_amount: 30.0,
            line_total: 27.0,
            net_amount: 26.0,
            profit: 16.0,
        }]
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(csv_field("cr\r"), "\"cr\r\"");
    }

    #[test]
    fn test_build_invoice() {
        let invoice = build_invoice(&order(), Some(&customer()), &items());
        assert_eq!(invoice.invoice_number, "INV-20240517-12");
        assert_eq!(invoice.issue_date.unwrap().to_string(), "2024-05-17");
        assert_eq!(invoice.customer.as_ref().unwrap().name, "Doe, Jane");
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].line_total, 27.0);
        assert_eq!(invoice.total, 31.5);

        let mut unnumbered = order();
        unnumbered.invoice_number = None;
        assert_eq!(build_invoice(&unnumbered, None, &[]).invoice_number, "ORDER-77");
    }

    #[test]
    fn test_invoice_csvs() {
        let invoices = vec![build_invoice(&order(), Some(&customer()), &items())];

        let csv = invoices_csv(&invoices);
        let rows: Vec<_> = csv.split("\r\n").collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("invoice_number,order_id,issue_date"));
        assert_eq!(
            rows[1],
            "INV-20240517-12,77,2024-05-17,paid,\"Doe, Jane\",jane@example.com,bank_transfer,30.00,3.00,4.50,31.50"
        );
        assert_eq!(rows[2], "");

        let lines = invoice_lines_csv(&invoices);
        assert!(lines.contains("INV-20240517-12,1,\"Mug \"\"Classic\"\"\",3,10.00,3.00,27.00\r\n"));
    }

    #[test]
    fn test_export_zip_contains_both_files() {
        let invoices = vec![build_invoice(&order(), None, &items())];
        let bytes = export_zip(&invoices).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("invoices.csv")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, invoices_csv(&invoices));
        assert!(archive.by_name("invoice_lines.csv").is_ok());
    }
}
