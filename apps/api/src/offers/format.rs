use chrono::{DateTime, Utc};

/// Formats rupees in en-IN style with no fractional digits: `₹12,00,000`, `-₹1,234`.
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}₹{}", group_indian(rounded.unsigned_abs()))
}

/// `1800` -> `Rs. 1,800`
pub fn format_rs(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("Rs. {sign}{}", group_indian(amount.unsigned_abs()))
}

/// Groups digits as lakh/crore: last three, then pairs.
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `March 3, 2025`
pub fn format_long_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1_000), "1,000");
        assert_eq!(group_indian(100_000), "1,00,000");
        assert_eq!(group_indian(1_200_000), "12,00,000");
        assert_eq!(group_indian(123_456_789), "12,34,56,789");
    }

    #[test]
    fn test_format_inr_rounds_and_signs() {
        assert_eq!(format_inr(1_200_000.0), "₹12,00,000");
        assert_eq!(format_inr(454_999.999_999_999_94), "₹4,55,000");
        assert_eq!(format_inr(-2_100.0), "-₹2,100");
        assert_eq!(format_inr(27_150.0), "₹27,150");
    }

    #[test]
    fn test_format_rs() {
        assert_eq!(format_rs(1_800), "Rs. 1,800");
        assert_eq!(format_rs(200), "Rs. 200");
    }

    #[test]
    fn test_format_long_date() {
        let date = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
        assert_eq!(format_long_date(date), "March 3, 2025");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & Jerry's</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; Jerry&#39;s&lt;/b&gt;"
        );
    }
}
