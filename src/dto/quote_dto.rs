use crate::model::quote::{NewQuote, QuoteRequest};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

// --- Validated DTOs for request validation ---

/// Body of `POST /api/quotes`.
///
/// Required fields default to empty when absent so that a missing key and an empty value
/// are reported the same way. Unknown keys are rejected while deserializing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateQuoteRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub last_name: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub address: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub suburb: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub postcode: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub service_type: String,

    pub roof_type: Option<String>,

    pub timeframe: Option<String>,

    pub message: Option<String>,
}

impl CreateQuoteRequest {
    /// Check required fields, returning the camelCase names of those missing.
    pub fn missing_fields(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => field_names(&errors),
        }
    }

    pub fn into_new_quote(self, quote_number: String) -> NewQuote {
        NewQuote {
            quote_number,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            suburb: self.suburb,
            postcode: self.postcode,
            service_type: self.service_type,
            roof_type: self.roof_type,
            timeframe: self.timeframe,
            message: self.message,
        }
    }
}

fn field_names(errors: &ValidationErrors) -> Vec<String> {
    let mut names: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|name| camel_case(name))
        .collect();
    names.sort();
    names
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// What a successful submission hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedQuote {
    pub id: i64,
    pub quote_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuoteResponse {
    pub success: bool,
    pub message: String,
    pub quote_number: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteListResponse {
    pub success: bool,
    pub quotes: Vec<QuoteRequest>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub quote: QuoteRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> CreateQuoteRequest {
        CreateQuoteRequest {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "j@example.com".into(),
            phone: "0412345678".into(),
            address: "1 Main St".into(),
            suburb: "Suburb".into(),
            postcode: "4000".into(),
            service_type: "roof-repairs".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_request_has_no_missing_fields() {
        assert!(complete_request().missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields_are_named_in_camel_case() {
        let mut request = complete_request();
        request.service_type.clear();
        request.first_name.clear();
        assert_eq!(request.missing_fields(), vec!["firstName", "serviceType"]);
    }

    #[test]
    fn test_absent_keys_deserialize_as_empty() {
        let request: CreateQuoteRequest =
            serde_json::from_str(r#"{"firstName":"Jane","roofType":"tile"}"#).unwrap();
        assert_eq!(request.first_name, "Jane");
        assert_eq!(request.roof_type.as_deref(), Some("tile"));
        assert_eq!(request.missing_fields().len(), 7);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = serde_json::from_str::<CreateQuoteRequest>(r#"{"firstName":"Jane","promo":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("service_type"), "serviceType");
        assert_eq!(camel_case("email"), "email");
    }
}
