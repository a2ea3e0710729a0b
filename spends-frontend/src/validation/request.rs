use crate::models::NewPaymentRequest;

/// Field checks before a request is created or updated.
///
/// Drafts only need a counterparty and a due date.
pub fn validate_new_request(request: &NewPaymentRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if request
        .counterparty_id
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .is_empty()
    {
        errors.push("Counterparty is required".to_string());
    }
    if request.due_date.is_none() {
        errors.push("Due date is required".to_string());
    }

    if !request.as_draft {
        if request
            .currency
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
        {
            errors.push("Currency is required".to_string());
        }
        if request.amount.map(|a| a <= 0.0).unwrap_or(true) {
            errors.push("Amount must be greater than zero".to_string());
        }
    }

    errors
}

/// Return and decline must explain themselves.
pub fn require_comment(comment: Option<&str>) -> Result<String, String> {
    match comment.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err("A comment is required".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn complete() -> NewPaymentRequest {
        NewPaymentRequest {
            counterparty_id: Some("cp-1".to_string()),
            amount: Some(100.0),
            currency: Some("KZT".to_string()),
            due_date: NaiveDate::from_ymd_opt(2024, 7, 1),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_request_is_valid() {
        assert!(validate_new_request(&complete()).is_empty());
    }

    #[test]
    fn test_submitted_request_requires_positive_amount() {
        let mut request = complete();
        request.amount = Some(0.0);
        assert_eq!(validate_new_request(&request), vec!["Amount must be greater than zero"]);
    }

    #[test]
    fn test_draft_relaxes_amount_and_currency() {
        let request = NewPaymentRequest {
            counterparty_id: Some("cp-1".to_string()),
            due_date: NaiveDate::from_ymd_opt(2024, 7, 1),
            as_draft: true,
            ..Default::default()
        };
        assert!(validate_new_request(&request).is_empty());

        let missing = NewPaymentRequest {
            as_draft: true,
            ..Default::default()
        };
        assert_eq!(validate_new_request(&missing).len(), 2);
    }

    #[test]
    fn test_require_comment() {
        assert_eq!(require_comment(Some("  fix VAT  ")), Ok("fix VAT".to_string()));
        assert!(require_comment(Some("   ")).is_err());
        assert!(require_comment(None).is_err());
    }
}
