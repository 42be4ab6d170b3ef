//! Utilidades de validación
//!
//! Este módulo contiene helpers para validar placas, teléfonos y precios
//! de las órdenes de servicio.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// Placa antigua (ABC1234) o Mercosul (ABC1D23), con guion opcional
    pub static ref PLATE_REGEX: Regex =
        Regex::new(r"^(?i)[A-Z]{3}-?[0-9][A-Z0-9][0-9]{2}$").expect("plate regex");
}

/// Dejar solo los dígitos de un teléfono
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validar teléfono brasileño: DDD + número, opcionalmente con 55 adelante
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = digits_only(value);
    if digits.len() < 10 || digits.len() > 13 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        error.add_param("digits".into(), &digits.len());
        return Err(error);
    }
    Ok(())
}

/// Validar que un precio no sea negativo
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("price");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Normalizar placa: mayúsculas y sin guion
pub fn normalize_plate(value: &str) -> String {
    value.trim().replace('-', "").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_formats() {
        assert!(PLATE_REGEX.is_match("ABC1234"));
        assert!(PLATE_REGEX.is_match("ABC-1234"));
        assert!(PLATE_REGEX.is_match("BRA2E19"));
        assert!(PLATE_REGEX.is_match("bra2e19"));
        assert!(!PLATE_REGEX.is_match("AB1234"));
        assert!(!PLATE_REGEX.is_match("ABCD123"));
    }

    #[test]
    fn test_phone() {
        assert_eq!(digits_only("(11) 99999-8888"), "11999998888");
        assert!(validate_phone("(11) 99999-8888").is_ok());
        assert!(validate_phone("+55 11 99999-8888").is_ok());
        assert!(validate_phone("9999-8888").is_err());
    }

    #[test]
    fn test_price_and_plate_normalization() {
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::new(4500, 2)).is_ok());
        assert!(validate_price(&Decimal::new(-1, 0)).is_err());
        assert_eq!(normalize_plate(" abc-1234 "), "ABC1234");
    }
}
