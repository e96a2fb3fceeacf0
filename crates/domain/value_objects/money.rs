/// Renders an amount in minor units as a two-decimal string, e.g. `3000` -> `"30.00"`.
pub fn format_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_and_fractional_amounts() {
        assert_eq!(format_minor(3000), "30.00");
        assert_eq!(format_minor(1999), "19.99");
        assert_eq!(format_minor(5), "0.05");
        assert_eq!(format_minor(0), "0.00");
    }

    #[test]
    fn keeps_sign_for_negative_amounts() {
        assert_eq!(format_minor(-250), "-2.50");
    }
}
