//! Renders a subscription payment into a minimal single-page PDF, built by
//! hand so invoice downloads carry no extra dependency.

use chrono::{DateTime, FixedOffset};

pub struct InvoiceData {
    pub order_id: String,
    pub company_name: String,
    pub plan_name: String,
    pub price_per_employee: i64,
    pub employee_count: i64,
    pub amount: i64,
    pub status: String,
    pub payment_date: Option<DateTime<FixedOffset>>,
}

/// Produces a complete PDF document as bytes. The layout is a fixed
/// courier-font column of label/value lines.
pub fn render_pdf(invoice: &InvoiceData) -> Vec<u8> {
    let paid_on = invoice.payment_date
        .map(|d| d.format("%d-%m-%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = [
        "INVOICE".to_string(),
        String::new(),
        format!("Order ID       : {}", invoice.order_id),
        format!("Perusahaan     : {}", invoice.company_name),
        format!("Paket          : {}", invoice.plan_name),
        format!("Harga/karyawan : Rp {}", invoice.price_per_employee),
        format!("Jumlah karyawan: {}", invoice.employee_count),
        format!("Total          : Rp {}", invoice.amount),
        format!("Status         : {}", invoice.status),
        format!("Tanggal bayar  : {paid_on}"),
    ];

    let mut content = String::from("BT /F1 12 Tf 50 780 Td 16 TL\n");
    for line in lines {
        content.push_str(&format!("({}) Tj T*\n", escape_pdf_text(&line)));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>".to_string(),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
    ];

    let mut pdf = Vec::from(&b"%PDF-1.4\n"[..]);
    let mut offsets = Vec::with_capacity(objects.len());

    for (index, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );

    pdf
}

fn escape_pdf_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_invoice() -> InvoiceData {
        InvoiceData {
            order_id: "SUB-1718000000-abcd1234".to_string(),
            company_name: "PT Contoh".to_string(),
            plan_name: "Premium".to_string(),
            price_per_employee: 15_000,
            employee_count: 20,
            amount: 300_000,
            status: "success".to_string(),
            payment_date: None,
        }
    }

    #[test]
    fn test_renders_valid_pdf_envelope() {
        let pdf = render_pdf(&sample_invoice());

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));

        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("SUB-1718000000-abcd1234"));
        assert!(text.contains("Rp 300000"));
    }

    #[test]
    fn test_escapes_parentheses() {
        let mut invoice = sample_invoice();
        invoice.company_name = "PT (Contoh)".to_string();

        let pdf = render_pdf(&invoice);
        let text = String::from_utf8_lossy(&pdf);

        assert!(text.contains("PT \\(Contoh\\)"));
    }
}
