/// Country names as reported by OMDb, mapped to ISO 3166 region codes.
const REGION_CODES: &[(&str, &str)] = &[
    ("USA", "US"),
    ("United States", "US"),
    ("UK", "GB"),
    ("United Kingdom", "GB"),
    ("France", "FR"),
    ("Germany", "DE"),
    ("Italy", "IT"),
    ("Canada", "CA"),
    ("India", "IN"),
    ("Japan", "JP"),
    ("China", "CN"),
];

/// Shown for countries missing from [`REGION_CODES`].
pub const PLACEHOLDER_FLAG: &str = "🏳️";

/// Offset from an ASCII capital letter to its regional indicator symbol.
const REGIONAL_INDICATOR_OFFSET: u32 = 127397;

/// Flag glyph for the first country in a comma-separated list.
pub fn country_to_flag(country: &str) -> String {
    let first = country.split(',').next().unwrap_or("").trim();

    REGION_CODES
        .iter()
        .find(|(name, _)| *name == first)
        .and_then(|(_, code)| region_flag(code))
        .unwrap_or_else(|| PLACEHOLDER_FLAG.to_string())
}

fn region_flag(code: &str) -> Option<String> {
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(c as u32 + REGIONAL_INDICATOR_OFFSET))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usa_maps_to_us_flag() {
        let flag = country_to_flag("USA");
        let points: Vec<u32> = flag.chars().map(|c| c as u32).collect();
        assert_eq!(points, vec![0x1F1FA, 0x1F1F8]);
        assert_eq!(flag, "🇺🇸");
    }

    #[test]
    fn only_the_first_country_counts() {
        assert_eq!(country_to_flag("United Kingdom, USA"), "🇬🇧");
        assert_eq!(country_to_flag(" Japan "), "🇯🇵");
    }

    #[test]
    fn unknown_countries_get_the_placeholder() {
        assert_eq!(country_to_flag("Atlantis"), PLACEHOLDER_FLAG);
        assert_eq!(country_to_flag(""), PLACEHOLDER_FLAG);
        assert_eq!(country_to_flag("Unknown"), PLACEHOLDER_FLAG);
    }

    #[test]
    fn every_mapped_code_yields_two_indicators() {
        for (name, _) in REGION_CODES {
            let flag = country_to_flag(name);
            assert_eq!(flag.chars().count(), 2, "{}", name);
            assert!(flag
                .chars()
                .all(|c| (0x1F1E6..=0x1F1FF).contains(&(c as u32))));
        }
    }
}
