// ABOUTME: Formatting helpers shared by the CLI commands
// ABOUTME: Table presets, placeholder text, date trimming, and argument parsers

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use taskdeck_services::{record_id_str, ChannelType};

pub const EMPTY: &str = "—";

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => EMPTY.to_string(),
    }
}

pub fn id_or_dash(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| EMPTY.to_string())
}

/// Date part of an ISO timestamp
pub fn format_date(value: Option<&str>) -> String {
    or_dash(value.map(|v| v.get(..10).unwrap_or(v)))
}

pub fn parse_id(value: &str) -> Result<i64, String> {
    record_id_str(value).map_err(|e| e.to_string())
}

pub fn parse_channel(value: &str) -> Result<ChannelType, String> {
    value.parse::<ChannelType>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2024-06-03T09:00:00.000Z")), "2024-06-03");
        assert_eq!(format_date(Some("")), EMPTY);
        assert_eq!(format_date(None), EMPTY);
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_id("12"), Ok(12));
        assert!(parse_id("twelve").is_err());
        assert_eq!(parse_channel("project"), Ok(ChannelType::Project));
    }
}
