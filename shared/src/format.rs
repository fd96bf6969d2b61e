/// `1234567` -> `"1,234,567"`.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rounded, grouped value for non-negative floats such as areas.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return "\u{2014}".to_string();
    }
    format_number(value.round() as u64)
}

/// Compact US-dollar amount: `$3.9T`, `$85.2K`, `$912`.
pub fn format_currency_compact(value: f64) -> String {
    if !value.is_finite() {
        return "\u{2014}".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (abs / 1e12, "T")
    } else if abs >= 1e9 {
        (abs / 1e9, "B")
    } else if abs >= 1e6 {
        (abs / 1e6, "M")
    } else if abs >= 1e3 {
        (abs / 1e3, "K")
    } else {
        return format!("{sign}${}", abs.round());
    };
    let rounded = (scaled * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{sign}${rounded:.0}{suffix}")
    } else {
        format!("{sign}${rounded:.1}{suffix}")
    }
}

/// Expand single-letter party codes; longer values pass through.
pub fn party_label(party: &str) -> &str {
    match party.trim() {
        "D" | "d" => "Democrat",
        "R" | "r" => "Republican",
        "I" | "i" => "Independent",
        other => other,
    }
}

/// `" (#7)"` for a rank, empty otherwise.
pub fn gdp_rank_suffix(rank: Option<u32>) -> String {
    match rank {
        Some(rank) if rank > 0 => format!(" (#{rank})"),
        _ => String::new(),
    }
}

/// `"Governor Name (Republican)"`, degrading to whichever half is known.
pub fn governor_line(name: Option<&str>, party: Option<&str>) -> Option<String> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    let party = party.map(party_label).filter(|p| !p.is_empty());
    match (name, party) {
        (Some(name), Some(party)) => Some(format!("{name} ({party})")),
        (Some(name), None) => Some(name.to_string()),
        (None, Some(party)) => Some(party.to_string()),
        (None, None) => None,
    }
}

/// Flag image path: `/StateFlags/Flag_of_New_York.svg`.
pub fn flag_path(state_name: &str) -> String {
    let joined = state_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("/StateFlags/Flag_of_{joined}.svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_grouping() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(39_538_223), "39,538,223");
    }

    #[test]
    fn decimal_rounds_and_guards() {
        assert_eq!(format_decimal(423_967.4), "423,967");
        assert_eq!(format_decimal(f64::NAN), "\u{2014}");
    }

    #[test]
    fn compact_currency() {
        assert_eq!(format_currency_compact(3.87e12), "$3.9T");
        assert_eq!(format_currency_compact(2.0e12), "$2T");
        assert_eq!(format_currency_compact(85_200.0), "$85.2K");
        assert_eq!(format_currency_compact(912.4), "$912");
        assert_eq!(format_currency_compact(-1.5e9), "-$1.5B");
    }

    #[test]
    fn party_and_governor() {
        assert_eq!(party_label("R"), "Republican");
        assert_eq!(party_label("Green"), "Green");
        assert_eq!(
            governor_line(Some("Gavin Newsom"), Some("D")).as_deref(),
            Some("Gavin Newsom (Democrat)")
        );
        assert_eq!(governor_line(None, Some("R")).as_deref(), Some("Republican"));
        assert_eq!(governor_line(Some(" "), None), None);
    }

    #[test]
    fn rank_suffix() {
        assert_eq!(gdp_rank_suffix(Some(7)), " (#7)");
        assert_eq!(gdp_rank_suffix(None), "");
    }

    #[test]
    fn flag_paths_join_words() {
        assert_eq!(flag_path("New York"), "/StateFlags/Flag_of_New_York.svg");
        assert_eq!(flag_path("Ohio"), "/StateFlags/Flag_of_Ohio.svg");
    }
}
