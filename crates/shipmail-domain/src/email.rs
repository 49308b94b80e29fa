//! Email module - the unit of input

use serde::{Deserialize, Serialize};

/// A single freight-forwarding email to extract shipment details from
///
/// The `id` is unique within a batch and is copied verbatim onto the
/// extraction record produced for this email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailInput {
    /// Unique identifier of the email
    pub id: String,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,

    /// Sender address, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,

    /// Recipient addresses, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_emails: Option<String>,

    /// Carbon-copy addresses, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_emails: Option<String>,
}

impl EmailInput {
    /// Create an email with only the required fields set
    ///
    /// # Examples
    ///
    /// ```
    /// use shipmail_domain::EmailInput;
    ///
    /// let email = EmailInput::new("EMAIL_001", "Quote request", "2 cbm HKG to MAA");
    /// assert_eq!(email.id, "EMAIL_001");
    /// assert!(email.sender_email.is_none());
    /// ```
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            body: body.into(),
            sender_email: None,
            to_emails: None,
            cc_emails: None,
        }
    }
}
