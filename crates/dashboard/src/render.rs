use crate::{
    format::{
        format_amount, format_duration, format_number, format_percent, format_timestamp,
        format_usd, with_commas,
    },
    sections::{Section, SectionReport, StatGroup},
};
use metrics::{DelegationSample, DerivedStatistic, StatValue};
use serde::Serialize;

/// everything one invocation produced, including the sections that failed
#[derive(Debug, Serialize)]
pub struct Report {
    pub sections: Vec<SectionReport>,
    pub errors: Vec<SectionError>,
}

#[derive(Debug, Serialize)]
pub struct SectionError {
    pub section: Section,
    pub error: String,
}

pub fn render_value(value: &StatValue) -> String {
    match value {
        StatValue::Count(n) => with_commas(*n),
        StatValue::Amount {
            base_units,
            decimals,
        } => format_amount(*base_units, *decimals, 0),
        StatValue::Percent(p) => format_percent(*p),
        StatValue::Usd(p) => format_usd(*p),
        StatValue::Duration { secs } => format_duration(*secs),
        StatValue::Timestamp(at) => format_timestamp(at),
    }
}

pub fn render_stat(stat: &DerivedStatistic) -> String {
    let mut value = render_value(&stat.value);
    if stat.approximate {
        value.insert(0, '~');
    }
    match &stat.unit {
        Some(unit) => format!("{value} {unit}"),
        None => value,
    }
}

pub fn render_group(group: &StatGroup) -> String {
    let width = group
        .items
        .iter()
        .map(|item| item.label.len())
        .max()
        .unwrap_or_default();
    let mut out = format!("{}  ({}: {})\n", group.title, group.link_text, group.link);
    for item in &group.items {
        out.push_str(&format!("  {:<width$}  {}", item.label, render_stat(item)));
        if let Some(cadence) = item.cadence {
            out.push_str(&format!("  [{cadence:?}]"));
        }
        out.push('\n');
    }
    out
}

pub fn render_delegation(samples: &[DelegationSample]) -> String {
    let mut out = String::from("veHNT Delegation History\n");
    if samples.is_empty() {
        out.push_str("  no completed epochs since delegation started\n");
        return out;
    }
    out.push_str(&format!(
        "  {:<10}  {:>7}  {:>18}  {:>18}  {:>7}\n",
        "date", "epoch", "MOBILE", "IOT", "% IOT"
    ));
    for sample in samples {
        out.push_str(&format!(
            "  {:<10}  {:>7}  {:>18}  {:>18}  {:>7}\n",
            sample.date.format("%Y/%m/%d"),
            sample.epoch,
            format_number(sample.mobile_delegated, 0),
            format_number(sample.iot_delegated, 0),
            format_percent(sample.percent_iot),
        ));
    }
    out
}

pub fn render_text(report: &Report) -> String {
    report
        .sections
        .iter()
        .map(|section| match section {
            SectionReport::Stats(group) => render_group(group),
            SectionReport::Delegation(samples) => render_delegation(samples),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use common::{Network, network::Icon};
    use metrics::Cadence;

    fn group() -> StatGroup {
        let info = Network::Mobile.info();
        StatGroup {
            title: info.title.to_string(),
            link: info.link.to_string(),
            link_text: info.link_text.to_string(),
            icon: Icon::Mobile,
            items: vec![
                DerivedStatistic::new(
                    "Max Supply",
                    StatValue::Amount {
                        base_units: 1_234_567_890_000_000,
                        decimals: 6,
                    },
                )
                .approximate()
                .cadence(Cadence::Live),
                DerivedStatistic::new("Estimated Swap", StatValue::Count(20_000))
                    .unit("MOBILE/HNT"),
            ],
        }
    }

    #[test]
    fn stat_values() {
        assert_eq!(render_value(&StatValue::Count(1_000_000)), "1,000,000");
        assert_eq!(render_value(&StatValue::Usd(4.257)), "$4.26");
        assert_eq!(render_value(&StatValue::Percent(25.0)), "25.00%");
        assert_eq!(
            render_value(&StatValue::Duration { secs: 90_061 }),
            "1d 01h 01m 01s"
        );
        let group = group();
        assert_eq!(render_stat(&group.items[0]), "~1,234,567,890");
        assert_eq!(render_stat(&group.items[1]), "20,000 MOBILE/HNT");
    }

    #[test]
    fn group_lines() {
        let text = render_group(&group());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("MOBILE"));
        assert!(lines[1].contains("~1,234,567,890"));
        assert!(lines[1].ends_with("[Live]"));
        assert!(lines[2].contains("Estimated Swap"));
    }

    #[test]
    fn delegation_table() {
        let samples = vec![DelegationSample {
            epoch: 19_469,
            date: DateTime::from_timestamp(19_469 * 86_400, 0).unwrap(),
            mobile_delegated: 3_000_000.0,
            iot_delegated: 1_000_000.0,
            percent_iot: 25.0,
        }];
        let text = render_delegation(&samples);
        assert!(text.contains("2023/04/22"));
        assert!(text.contains("3,000,000"));
        assert!(text.contains("25.00%"));
        assert!(render_delegation(&[]).contains("no completed epochs"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("% IOT"));
        assert!(lines[2].trim_start().starts_with("2023/04/22"));
    }

    #[test]
    fn json_keeps_failed_sections() {
        let report = Report {
            sections: vec![SectionReport::Stats(group())],
            errors: vec![SectionError {
                section: Section::Iot,
                error: "error: rpc unavailable".to_string(),
            }],
        };
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["sections"][0]["section"], "stats");
        assert_eq!(json["sections"][0]["data"]["title"], "MOBILE");
        assert_eq!(
            json["sections"][0]["data"]["items"][1]["value"]["kind"],
            "count"
        );
        assert_eq!(json["errors"][0]["section"], "iot");
    }
}
