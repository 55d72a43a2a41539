use {
    super::error::CheckoutError,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::fmt,
};

/// Monetary amount in integer centavos (BRL). Every wire format the
/// storefront and the gateway speak carries decimal reais, so serde
/// converts at the boundary and arithmetic stays exact inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(i64);

impl Amount {
    pub fn new(centavos: i64) -> Result<Self, CheckoutError> {
        if centavos < 0 {
            return Err(CheckoutError::Validation(format!(
                "amount cannot be negative, got: {centavos}"
            )));
        }
        Ok(Self(centavos))
    }

    pub fn from_reais(reais: f64) -> Result<Self, CheckoutError> {
        if !reais.is_finite() {
            return Err(CheckoutError::Validation(format!(
                "amount is not a number: {reais}"
            )));
        }
        Self::new((reais * 100.0).round() as i64)
    }

    pub fn centavos(&self) -> i64 {
        self.0
    }

    pub fn reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_mul(self, factor: u32) -> Option<Amount> {
        self.0.checked_mul(i64::from(factor)).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.reais())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let reais = f64::deserialize(deserializer)?;
        Amount::from_reais(reais).map_err(serde::de::Error::custom)
    }
}
