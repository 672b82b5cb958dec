/// Currency utility functions for handling Peso conversions
///
/// Escrow math is done in centavos (1 Peso = 100 centavos) so that the
/// downpayment/final split and refund clamping never drift.

/// Convert Pesos to centavos (multiply by 100)
pub fn peso_to_centavos(peso: f64) -> i64 {
    (peso * 100.0).round() as i64
}

/// Convert centavos to Pesos (divide by 100)
pub fn centavos_to_peso(centavos: i64) -> f64 {
    centavos as f64 / 100.0
}

/// Format centavos as a Peso string with 2 decimal places
pub fn format_centavos_as_peso(centavos: i64) -> String {
    let sign = if centavos < 0 { "-" } else { "" };
    let abs = centavos.unsigned_abs();
    format!("{}₱{}.{:02}", sign, group_thousands(abs / 100), abs % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peso_to_centavos() {
        assert_eq!(peso_to_centavos(100.0), 10000);
        assert_eq!(peso_to_centavos(0.50), 50);
        assert_eq!(peso_to_centavos(123.45), 12345);
    }

    #[test]
    fn test_centavos_to_peso() {
        assert_eq!(centavos_to_peso(10000), 100.0);
        assert_eq!(centavos_to_peso(50), 0.50);
        assert_eq!(centavos_to_peso(12345), 123.45);
    }

    #[test]
    fn test_format_centavos_as_peso() {
        assert_eq!(format_centavos_as_peso(10000), "₱100.00");
        assert_eq!(format_centavos_as_peso(50), "₱0.50");
        assert_eq!(format_centavos_as_peso(123456789), "₱1,234,567.89");
        assert_eq!(format_centavos_as_peso(-2500), "-₱25.00");
    }
}
