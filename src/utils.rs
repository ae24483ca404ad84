// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

/// Two-decimal amount in Brazilian notation: `1234.5` -> `1.234,50`.
/// Returns `None` for NaN and infinities.
fn pt_br_amount(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    // -0.00 prints without a sign
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    Some(format!("{}{},{}", sign, grouped, frac_part))
}

pub fn format_brl(value: f64) -> String {
    match pt_br_amount(value) {
        Some(amount) => format!("R$ {}", amount),
        None => "R$ --,--".to_string(),
    }
}

pub fn format_eur(value: f64) -> String {
    match pt_br_amount(value) {
        Some(amount) => format!("€{}", amount),
        None => "€--,--".to_string(),
    }
}

/// Exchange rate with a decimal comma and no grouping, e.g. `5,50`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.2}", rate).replace('.', ",")
}

/// Convert a BRL amount to EUR given a EUR→BRL rate.
pub fn euro_equivalent(amount_brl: f64, eur_brl_rate: f64) -> f64 {
    if eur_brl_rate > 0.0 {
        amount_brl / eur_brl_rate
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(7734.45), "R$ 7.734,45");
        assert_eq!(format_brl(46181.25), "R$ 46.181,25");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_brl(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_brl(-1500.0), "R$ -1.500,00");
        assert_eq!(format_brl(f64::NAN), "R$ --,--");
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(8396.59), "€8.396,59");
        assert_eq!(format_eur(12.0), "€12,00");
        assert_eq!(format_eur(f64::NAN), "€--,--");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(5.5), "5,50");
        assert_eq!(format_rate(6.29314), "6,29");
    }

    #[test]
    fn test_euro_equivalent() {
        assert_relative_eq!(euro_equivalent(46181.25, 5.5), 8396.59, epsilon = 0.01);
        assert!(euro_equivalent(100.0, 0.0).is_nan());
        assert_eq!(format_eur(euro_equivalent(100.0, 0.0)), "€--,--");
    }
}
