use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use quoteflow_clients::ClientId;
use quoteflow_core::Money;
use quoteflow_documents::{Invoice, InvoiceStatus, Quote, QuoteStatus};

/// Revenue position of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRevenue {
    pub client_id: ClientId,
    /// Collected: total of paid invoices.
    pub revenue: Money,
    /// Billed but not collected: total of sent invoices, late or not.
    pub outstanding: Money,
}

/// Revenue and outstanding balance per client, in first-billed order.
///
/// Draft invoices and invoices without a client are not counted; they have
/// not been billed to anyone yet.
pub fn revenue_by_client(invoices: &[Invoice], today: NaiveDate) -> Vec<ClientRevenue> {
    let mut rows: Vec<ClientRevenue> = Vec::new();
    for invoice in invoices {
        let Some(client_id) = invoice.client_id() else {
            continue;
        };
        let (revenue, outstanding) = match invoice.effective_status(today) {
            InvoiceStatus::Paid => (invoice.total(), Money::ZERO),
            InvoiceStatus::Sent | InvoiceStatus::Overdue => (Money::ZERO, invoice.total()),
            InvoiceStatus::Draft => continue,
        };
        match rows.iter_mut().find(|r| r.client_id == client_id) {
            Some(row) => {
                row.revenue = Money::sum([row.revenue, revenue]);
                row.outstanding = Money::sum([row.outstanding, outstanding]);
            }
            None => rows.push(ClientRevenue {
                client_id,
                revenue,
                outstanding,
            }),
        }
    }
    rows
}

/// Collected revenue for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// Calendar month, 1-based.
    pub month: u32,
    pub revenue: Money,
}

/// Paid-invoice revenue bucketed by issue month for one year. Always returns
/// twelve entries, January first.
pub fn monthly_revenue(invoices: &[Invoice], year: i32, today: NaiveDate) -> Vec<MonthlyRevenue> {
    let mut months = vec![Money::ZERO; 12];
    for invoice in invoices {
        if invoice.effective_status(today) != InvoiceStatus::Paid {
            continue;
        }
        let issued = invoice.issue_date();
        if issued.year() == year {
            let bucket = (issued.month() - 1) as usize;
            months[bucket] = Money::sum([months[bucket], invoice.total()]);
        }
    }
    months
        .into_iter()
        .enumerate()
        .map(|(i, revenue)| MonthlyRevenue {
            month: i as u32 + 1,
            revenue,
        })
        .collect()
}

/// Total billed but uncollected across all clients.
pub fn outstanding_total(invoices: &[Invoice], today: NaiveDate) -> Money {
    Money::sum(
        invoices
            .iter()
            .filter(|i| {
                matches!(
                    i.effective_status(today),
                    InvoiceStatus::Sent | InvoiceStatus::Overdue
                )
            })
            .map(|i| i.total()),
    )
}

/// Quote counts by displayed status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePipeline {
    pub draft: usize,
    pub sent: usize,
    pub accepted: usize,
    pub declined: usize,
    pub expired: usize,
}

/// Bucket quotes by their effective (displayed) status, so a sent quote past
/// its expiry date counts as expired here even though its stored status has
/// not changed.
pub fn quote_pipeline(quotes: &[Quote], today: NaiveDate) -> QuotePipeline {
    let mut pipeline = QuotePipeline::default();
    for quote in quotes {
        match quote.effective_status(today) {
            QuoteStatus::Draft => pipeline.draft += 1,
            QuoteStatus::Sent => pipeline.sent += 1,
            QuoteStatus::Accepted => pipeline.accepted += 1,
            QuoteStatus::Declined => pipeline.declined += 1,
            QuoteStatus::Expired => pipeline.expired += 1,
        }
    }
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use quoteflow_core::{EntityId, TaxRate};
    use quoteflow_documents::{DocumentNumber, InvoiceId, LineItemId, QuoteId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn client() -> ClientId {
        ClientId::new(EntityId::new())
    }

    fn invoice_for(client_id: ClientId, cents: i64, issued: NaiveDate) -> Invoice {
        Invoice::new(
            InvoiceId::new(EntityId::new()),
            DocumentNumber::new("INV", issued.year(), 1),
            issued,
        )
        .with_client(client_id)
        .add_item(
            LineItemId::generate(),
            "Work performed",
            1,
            Money::from_cents(cents),
            false,
            TaxRate::DEFAULT_GST,
        )
        .unwrap()
    }

    fn paid(invoice: Invoice) -> Invoice {
        invoice.mark_sent().unwrap().mark_paid().unwrap()
    }

    fn sent(invoice: Invoice) -> Invoice {
        invoice.mark_sent().unwrap()
    }

    #[test]
    fn revenue_rows_group_by_client_in_first_billed_order() {
        let acme = client();
        let brown = client();
        let invoices = vec![
            paid(invoice_for(acme, 10_000, today())),
            sent(invoice_for(brown, 5_000, today())),
            paid(invoice_for(acme, 2_500, today())),
        ];

        let rows = revenue_by_client(&invoices, today());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].client_id, acme);
        assert_eq!(rows[0].revenue, Money::from_cents(12_500));
        assert_eq!(rows[0].outstanding, Money::ZERO);
        assert_eq!(rows[1].client_id, brown);
        assert_eq!(rows[1].revenue, Money::ZERO);
        assert_eq!(rows[1].outstanding, Money::from_cents(5_000));
    }

    #[test]
    fn drafts_are_not_billed_to_anyone() {
        let invoices = vec![invoice_for(client(), 10_000, today())];
        assert!(revenue_by_client(&invoices, today()).is_empty());
        assert_eq!(outstanding_total(&invoices, today()), Money::ZERO);
    }

    #[test]
    fn late_invoices_still_count_as_outstanding() {
        let issued = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let invoice = sent(invoice_for(client(), 7_500, issued));
        assert_eq!(
            invoice.effective_status(today()),
            InvoiceStatus::Overdue
        );
        assert_eq!(outstanding_total(&[invoice], today()), Money::from_cents(7_500));
    }

    #[test]
    fn monthly_buckets_follow_issue_dates() {
        let acme = client();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mar = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let invoices = vec![
            paid(invoice_for(acme, 10_000, jan)),
            paid(invoice_for(acme, 3_000, jan)),
            paid(invoice_for(acme, 4_000, mar)),
            // A different year never lands in this report.
            paid(invoice_for(
                acme,
                9_900,
                NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
            )),
        ];

        let months = monthly_revenue(&invoices, 2024, today());
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, 1);
        assert_eq!(months[0].revenue, Money::from_cents(13_000));
        assert_eq!(months[2].revenue, Money::from_cents(4_000));
        assert_eq!(months[11].revenue, Money::ZERO);
    }

    #[test]
    fn pipeline_counts_use_effective_status() {
        let quote = Quote::new(
            QuoteId::new(EntityId::new()),
            DocumentNumber::new("QUO", 2024, 1),
            today(),
        )
        .with_client(client())
        .add_item(
            LineItemId::generate(),
            "Proposal",
            1,
            Money::from_dollars(100),
            true,
            TaxRate::DEFAULT_GST,
        )
        .unwrap()
        .mark_sent()
        .unwrap();

        let past_expiry = quote.expiry_date().checked_add_days(Days::new(1)).unwrap();
        let pipeline = quote_pipeline(&[quote], past_expiry);
        assert_eq!(pipeline.expired, 1);
        assert_eq!(pipeline.sent, 0);
    }
}
