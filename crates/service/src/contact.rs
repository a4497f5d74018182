//! WhatsApp deep links sent back by the click endpoints.

use url::Url;

use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct WhatsAppContact {
    digits: String,
}

impl WhatsAppContact {
    /// Accepts any human formatting ("+254 722 669 912") and keeps the digits.
    pub fn new(number: &str) -> Result<Self, ServiceError> {
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(ServiceError::Validation("contact number has no digits".into()));
        }
        Ok(Self { digits })
    }

    /// `https://wa.me/<digits>?text=<form-encoded text>`.
    pub fn link(&self, text: &str) -> Result<String, ServiceError> {
        let url = Url::parse_with_params(&format!("https://wa.me/{}", self.digits), &[("text", text)])
            .map_err(|e| ServiceError::Validation(format!("cannot build contact link: {e}")))?;
        Ok(url.into())
    }
}

/// Render a price the way customers expect to read it: `30.0`, `12.5`.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 { format!("{price:.1}") } else { price.to_string() }
}

/// Message body for an enquiry about a product or service.
pub fn enquiry_text(kind: &str, item: &str, price: f64, name: &str, phone: &str, message: &str) -> String {
    format!(
        "I am interested in the {kind} '{item}' priced at {}\nName: {name}\nPhone: {phone}\nMessage: {message}",
        format_price(price)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_keeps_digits_and_encodes_text() {
        let c = WhatsAppContact::new("+254 722-669912").unwrap();
        let url = c.link("Hi there\nName: Jo & Co").unwrap();
        assert_eq!(url, "https://wa.me/254722669912?text=Hi+there%0AName%3A+Jo+%26+Co");
    }

    #[test]
    fn number_without_digits_is_rejected() {
        assert!(WhatsAppContact::new("call me").is_err());
    }

    #[test]
    fn enquiry_text_mentions_item_and_customer() {
        let t = enquiry_text("product", "Argan Oil", 30.0, "Jane", "0700", "Is it in stock?");
        assert!(t.starts_with("I am interested in the product 'Argan Oil' priced at 30.0\n"));
        assert!(t.ends_with("Message: Is it in stock?"));
        assert_eq!(format_price(12.5), "12.5");
    }
}
