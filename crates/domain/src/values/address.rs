use serde::{Deserialize, Serialize};

use super::{ValueError, require_non_blank};

/// A postal address. All four parts are required.
///
/// Addresses have no identity: replacing a member's address means building
/// a new value, never editing the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    street: String,
    city: String,
    postal_code: String,
    country: String,
}

impl Address {
    /// Creates an address, rejecting any blank part.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, ValueError> {
        let street = street.into();
        let city = city.into();
        let postal_code = postal_code.into();
        let country = country.into();

        require_non_blank("street", &street)?;
        require_non_blank("city", &city)?;
        require_non_blank("postal code", &postal_code)?;
        require_non_blank("country", &country)?;

        Ok(Self {
            street,
            city,
            postal_code,
            country,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Renders the address as a single display line.
    pub fn full_display(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.street, self.postal_code, self.city, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Address {
        Address::new("Naamsestraat 1", "Leuven", "3000", "Belgium").unwrap()
    }

    #[test]
    fn rejects_blank_parts() {
        assert_eq!(
            Address::new("", "Leuven", "3000", "Belgium"),
            Err(ValueError::Blank { field: "street" })
        );
        assert_eq!(
            Address::new("Naamsestraat 1", " ", "3000", "Belgium"),
            Err(ValueError::Blank { field: "city" })
        );
        assert_eq!(
            Address::new("Naamsestraat 1", "Leuven", "", "Belgium"),
            Err(ValueError::Blank { field: "postal code" })
        );
        assert_eq!(
            Address::new("Naamsestraat 1", "Leuven", "3000", ""),
            Err(ValueError::Blank { field: "country" })
        );
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(sample(), sample());
        let other = Address::new("Naamsestraat 2", "Leuven", "3000", "Belgium").unwrap();
        assert_ne!(sample(), other);
    }

    #[test]
    fn full_display_renders_one_line() {
        assert_eq!(sample().full_display(), "Naamsestraat 1, 3000 Leuven, Belgium");
    }
}
