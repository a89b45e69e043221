/// Format an amount with thousands separators, keeping every significant
/// decimal of the micro-unit storage (at least two): -1,234.56, 1.23456
pub fn amount(val: f64) -> String {
    let negative = val < 0.0;
    let fixed = format!("{:.6}", val.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut dec_part = dec_part.trim_end_matches('0').to_string();
    while dec_part.len() < 2 {
        dec_part.push('0');
    }

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative && fixed != "0.000000" {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(1234.56), "1,234.56");
        assert_eq!(amount(-500.00), "-500.00");
        assert_eq!(amount(0.0), "0.00");
        assert_eq!(amount(1000000.99), "1,000,000.99");
        assert_eq!(amount(1.23456), "1.23456");
        assert_eq!(amount(-40.5), "-40.50");
        assert_eq!(amount(0.000001), "0.000001");
        assert_eq!(amount(-0.0000001), "0.00");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
