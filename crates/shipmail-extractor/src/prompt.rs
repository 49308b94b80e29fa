//! Prompt templates for shipment extraction
//!
//! Templates carry three placeholders: `{subject}`, `{body}` and
//! `{port_reference}`. Substitution is a single pass over the template, so
//! braces or placeholder names inside an email are inserted verbatim.

use crate::config::PromptVersion;
use shipmail_domain::EmailInput;

/// System message sent with every extraction call
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an expert at extracting structured data from freight forwarding emails. Always return valid JSON.";

const PLACEHOLDERS: [&str; 3] = ["subject", "body", "port_reference"];

/// Builds the user prompt for one email
pub struct PromptBuilder<'a> {
    version: PromptVersion,
    port_reference: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for a template revision and a rendered port listing
    pub fn new(version: PromptVersion, port_reference: &'a str) -> Self {
        Self {
            version,
            port_reference,
        }
    }

    /// Build the complete extraction prompt for an email
    pub fn build(&self, email: &EmailInput) -> String {
        render(
            template(self.version),
            &email.subject,
            &email.body,
            self.port_reference,
        )
    }
}

/// Raw template text of a revision
pub fn template(version: PromptVersion) -> &'static str {
    match version {
        PromptVersion::V1 => PROMPT_V1,
        PromptVersion::V2 => PROMPT_V2,
        PromptVersion::V3 => PROMPT_V3,
    }
}

fn render(template: &str, subject: &str, body: &str, port_reference: &str) -> String {
    let mut out = String::with_capacity(template.len() + subject.len() + body.len() + port_reference.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let hit = PLACEHOLDERS.iter().find(|name| {
            tail.strip_prefix(**name)
                .is_some_and(|after| after.starts_with('}'))
        });

        match hit {
            Some(name) => {
                out.push_str(match *name {
                    "subject" => subject,
                    "body" => body,
                    _ => port_reference,
                });
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

const PROMPT_V1: &str = r#"You extract structured shipment information from freight forwarding emails.

Extract these fields from the email:
- product_line: "pl_sea_import_lcl" or "pl_sea_export_lcl"
- origin_port_code: 5-letter UN/LOCODE
- origin_port_name: port name
- destination_port_code: 5-letter UN/LOCODE
- destination_port_name: port name
- incoterm: shipping terms (FOB, CIF, ...)
- cargo_weight_kg: weight in kilograms
- cargo_cbm: volume in cubic meters
- is_dangerous: true for dangerous goods

Email Subject: {subject}
Email Body: {body}

Return only valid JSON shaped like this:
{
    "product_line": "pl_sea_import_lcl",
    "origin_port_code": "HKHKG",
    "origin_port_name": "Hong Kong",
    "destination_port_code": "INMAA",
    "destination_port_name": "Chennai",
    "incoterm": "FOB",
    "cargo_weight_kg": 500.0,
    "cargo_cbm": 2.5,
    "is_dangerous": false
}"#;

const PROMPT_V2: &str = r#"You extract structured shipment data from freight forwarding emails.

BUSINESS RULES:
1. Product line: destination port in India (code starts with "IN") means "pl_sea_import_lcl"; origin in India means "pl_sea_export_lcl".
2. Incoterm: default to "FOB" when none is mentioned.
3. Port codes: UN/LOCODE, 2-letter country plus 3-letter location.
4. Missing data is null, never 0 or an empty string.

PORT CODE REFERENCE (partial):
{port_reference}

Email Subject: {subject}
Email Body: {body}

Return ONLY valid JSON:
{
    "product_line": "pl_sea_import_lcl",
    "origin_port_code": "HKHKG",
    "origin_port_name": "Hong Kong",
    "destination_port_code": "INMAA",
    "destination_port_name": "Chennai",
    "incoterm": "FOB",
    "cargo_weight_kg": null,
    "cargo_cbm": 5.0,
    "is_dangerous": false
}"#;

const PROMPT_V3: &str = r#"You are an expert at extracting structured shipment data from freight forwarding emails.

CRITICAL BUSINESS RULES:

1. PRODUCT LINE
   - Destination code starting with "IN" -> "pl_sea_import_lcl"
   - Origin code starting with "IN" -> "pl_sea_export_lcl"
   - Indian ports: INMAA (Chennai), INNSA (Nhava Sheva), INBLR (Bangalore), INMUN (Mundra), INWFD (Whitefield)

2. PORT CODES
   - Match port names and cities to UN/LOCODE codes with the reference below
   - Common abbreviations: HK/Hong Kong -> HKHKG, SHA -> CNSHA, MAA/Chennai -> INMAA, SIN/Singapore -> SGSIN
   - Use the reference's canonical name for a matched code
   - An unmatched port is null for both code and name

3. INCOTERMS
   - Valid: FOB, CIF, CFR, EXW, DDP, DAP, FCA, CPT, CIP, DPU
   - Not mentioned -> "FOB"
   - Ambiguous ("FOB or CIF") -> "FOB"
   - Always uppercase

4. DANGEROUS GOODS
   - true when the email mentions "DG", "dangerous", "hazardous", "Class" with a number, "IMO", "IMDG" or "UN" with a number (UN 1993)
   - false for "non-DG", "non-hazardous", "non hazardous" or "not dangerous"
   - false when not mentioned

5. NUMBERS
   - Round cargo_weight_kg and cargo_cbm to 2 decimals
   - lbs to kg: multiply by 0.453592
   - tonnes/MT to kg: multiply by 1000
   - "TBD", "N/A", "to be confirmed" -> null
   - An explicit zero ("0 kg") is 0, not null
   - Dimensions (L x W x H) give a null cbm; do not compute a volume
   - Extract weight and cbm independently when both appear

6. CONFLICTS
   - The body wins over the subject
   - Extract only the FIRST shipment when several are mentioned
   - Use the origin and destination pair; ignore transshipment ports

PORT CODE REFERENCE:
{port_reference}

Email Subject: {subject}
Email Body: {body}

Return ONLY valid JSON, no markdown and no explanations:
{
    "product_line": "pl_sea_import_lcl",
    "origin_port_code": "HKHKG",
    "origin_port_name": "Hong Kong",
    "destination_port_code": "INMAA",
    "destination_port_name": "Chennai",
    "incoterm": "FOB",
    "cargo_weight_kg": 500.0,
    "cargo_cbm": 2.5,
    "is_dangerous": false
}"#;
