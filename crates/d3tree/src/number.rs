/// Format a finite f64 for display in legend labels.
/// - no exponent notation
/// - no trailing fractional zeros (decimal point dropped if none remain)
/// - -0 shown as 0
pub(crate) fn format_plain_f64(value: f64) -> String {
    if !value.is_finite() {
        debug_assert!(false, "format_plain_f64 called with non-finite value");
        return String::from("NA");
    }
    if value == 0.0 {
        return String::from("0");
    }

    let negative = value < 0.0;
    let magnitude = value.abs();

    let mut buf = ryu::Buffer::new();
    let raw = buf.format_finite(magnitude);
    let body = match raw.find(['e', 'E']) {
        Some(exp_index) => {
            let exp: i32 = raw[exp_index + 1..].parse().unwrap_or(0);
            expand_exponent(&raw[..exp_index], exp)
        }
        None => String::from(raw),
    };
    let trimmed = trim_fraction(body);
    if negative && trimmed != "0" {
        format!("-{}", trimmed)
    } else {
        trimmed
    }
}

fn expand_exponent(mantissa: &str, exp: i32) -> String {
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits: String = format!("{}{}", int_part, frac_part);
    let point = int_part.len() as i32 + exp;

    if point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (head, tail) = digits.split_at(point as usize);
        format!("{}.{}", head, tail)
    }
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let kept = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(kept);
    }
    s
}
