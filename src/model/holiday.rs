use serde::Serialize;

/// Company public holiday table, served read-only.
#[derive(Debug, Clone, Serialize)]
pub struct PublicHoliday {
    pub name: &'static str,
    pub date: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<&'static str>,
}

pub const PUBLIC_HOLIDAYS: &[PublicHoliday] = &[
    PublicHoliday { name: "New Year", date: "Jan 1", remarks: None },
    PublicHoliday { name: "Chinese New Year Day 1", date: "Jan 22", remarks: Some("Lunar Calendar") },
    PublicHoliday { name: "Chinese New Year Day 2", date: "Jan 23", remarks: Some("Lunar Calendar") },
    PublicHoliday { name: "Labour Day", date: "May 1", remarks: None },
    PublicHoliday { name: "National Day", date: "Aug 31", remarks: None },
    PublicHoliday { name: "Malaysia Day", date: "Sep 16", remarks: None },
    PublicHoliday { name: "Christmas", date: "Dec 25", remarks: None },
];
