use absa_domain::common::PaymentStatus;
use chrono::NaiveDate;

/// Flips a payment status. Paying stamps `supplied` (or `today`); reverting clears the date.
pub(crate) fn toggle_payment(
    status: &mut PaymentStatus,
    payment_date: &mut Option<NaiveDate>,
    supplied: Option<NaiveDate>,
    today: NaiveDate,
) {
    *status = status.toggled();
    *payment_date = if status.is_paid() {
        Some(supplied.unwrap_or(today))
    } else {
        None
    };
}
