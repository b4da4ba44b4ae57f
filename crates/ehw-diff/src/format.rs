//! Number formatting for report lines.

/// `2722000` -> `"2,722,000"`.
pub fn format_thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Always carries a sign: `50000` -> `"+50,000"`, `-7` -> `"-7"`.
pub fn format_signed_thousands(v: i64) -> String {
    if v < 0 {
        format_thousands(v)
    } else {
        format!("+{}", format_thousands(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(123456), "123,456");
        assert_eq!(format_thousands(2722000), "2,722,000");
        assert_eq!(format_thousands(-1234567), "-1,234,567");
        assert_eq!(format_thousands(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn signed() {
        assert_eq!(format_signed_thousands(50), "+50");
        assert_eq!(format_signed_thousands(50000), "+50,000");
        assert_eq!(format_signed_thousands(-12000), "-12,000");
    }
}
