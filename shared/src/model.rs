use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Category tag attached to every record summary.
///
/// The tag alone decides which fixed detail template the UI renders; there is
/// no per-record payload behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordTag {
    Lab,
    Note,
    Imaging,
    Upload,
}

impl RecordTag {
    /// Label shown in timeline pills and detail headers.
    pub fn label(&self) -> &'static str {
        match self {
            RecordTag::Lab => "Lab",
            RecordTag::Note => "Note",
            RecordTag::Imaging => "Imaging",
            RecordTag::Upload => "Upload",
        }
    }
}

/// Display-only summary of a medical document.
///
/// Summaries are immutable after creation; the timeline keeps them in
/// most-recent-first insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: u64,
    pub date: String,
    pub title: String,
    pub meta: String,
    pub tag: RecordTag,
}

/// Which record categories a share grant would include.
///
/// Serialized in camelCase because the snapshot travels verbatim inside the
/// share QR payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSettings {
    pub clinical_summary: bool,
    pub medications: bool,
    pub labs: bool,
    pub imaging: bool,
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self {
            clinical_summary: true,
            medications: true,
            labs: false,
            imaging: false,
        }
    }
}

/// Individual share toggle addressed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareField {
    ClinicalSummary,
    Medications,
    Labs,
    Imaging,
}

impl ShareField {
    pub const ALL: [ShareField; 4] = [
        ShareField::ClinicalSummary,
        ShareField::Medications,
        ShareField::Labs,
        ShareField::Imaging,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShareField::ClinicalSummary => "Clinical summary",
            ShareField::Medications => "Medications",
            ShareField::Labs => "Labs (PDF)",
            ShareField::Imaging => "Imaging (DICOM)",
        }
    }
}

impl ShareSettings {
    /// Flip a single flag in place.
    pub fn toggle(&mut self, field: ShareField) {
        match field {
            ShareField::ClinicalSummary => self.clinical_summary = !self.clinical_summary,
            ShareField::Medications => self.medications = !self.medications,
            ShareField::Labs => self.labs = !self.labs,
            ShareField::Imaging => self.imaging = !self.imaging,
        }
    }

    pub fn get(&self, field: ShareField) -> bool {
        match field {
            ShareField::ClinicalSummary => self.clinical_summary,
            ShareField::Medications => self.medications,
            ShareField::Labs => self.labs,
            ShareField::Imaging => self.imaging,
        }
    }
}

/// Doctor entry from the static consent roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub hospital: String,
    pub address: String,
    pub verified: bool,
}

/// The three doctors offered by the consent dialog. The roster is fixed; no
/// directory lookup exists behind it.
pub fn doctor_roster() -> Vec<Doctor> {
    vec![
        Doctor {
            id: 1,
            name: String::from("Dr. Carlos Lopez"),
            specialty: String::from("Internal Medicine"),
            hospital: String::from("HMG Medical Center"),
            address: String::from("0x742d35Cc6634C0532925a3b8D4C0d8fB2C4D4d4d"),
            verified: true,
        },
        Doctor {
            id: 2,
            name: String::from("Dr. Ana Martinez"),
            specialty: String::from("Radiology"),
            hospital: String::from("HMG Hospital Imaging"),
            address: String::from("0x8ba1f109551bD432803012645Hac136c0143d160"),
            verified: true,
        },
        Doctor {
            id: 3,
            name: String::from("Dr. Roberto Silva"),
            specialty: String::from("Emergency Medicine"),
            hospital: String::from("Emergency Care Center"),
            address: String::from("0x9f2d4c8e7b1a5f3e6d9c8b7a6f5e4d3c2b1a0987"),
            verified: false,
        },
    ]
}

/// Access level offered to a doctor during a consent grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessScope {
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "BASIC")]
    Basic,
    #[serde(rename = "EMERGENCY")]
    Emergency,
}

impl AccessScope {
    pub const ALL_SCOPES: [AccessScope; 3] =
        [AccessScope::All, AccessScope::Basic, AccessScope::Emergency];

    pub fn wire_value(&self) -> &'static str {
        match self {
            AccessScope::All => "ALL",
            AccessScope::Basic => "BASIC",
            AccessScope::Emergency => "EMERGENCY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccessScope::All => "Full Access",
            AccessScope::Basic => "Basic Info",
            AccessScope::Emergency => "Emergency Only",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AccessScope::All => "Complete medical record access",
            AccessScope::Basic => "Name, age, allergies only",
            AccessScope::Emergency => "Critical medical information",
        }
    }
}

/// How long a consent grant remains valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDuration {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl AccessDuration {
    pub const ALL_DURATIONS: [AccessDuration; 4] = [
        AccessDuration::OneHour,
        AccessDuration::OneDay,
        AccessDuration::SevenDays,
        AccessDuration::ThirtyDays,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AccessDuration::OneHour => "1 Hour",
            AccessDuration::OneDay => "24 Hours",
            AccessDuration::SevenDays => "7 Days",
            AccessDuration::ThirtyDays => "30 Days",
        }
    }

    pub fn offset_secs(&self) -> u64 {
        match self {
            AccessDuration::OneHour => 3_600,
            AccessDuration::OneDay => 86_400,
            AccessDuration::SevenDays => 604_800,
            AccessDuration::ThirtyDays => 2_592_000,
        }
    }

    /// Absolute expiry timestamp for a grant confirmed at `now_secs`.
    pub fn expiry_from(&self, now_secs: u64) -> u64 {
        now_secs + self.offset_secs()
    }
}

/// Fixed demo identity shown in the header and embedded in share payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub curp: String,
}

impl PatientProfile {
    pub fn demo() -> Self {
        Self {
            name: String::from("Jazmine VB"),
            curp: String::from("JAVB750101MDFRZN09"),
        }
    }

    /// Initials rendered in the header avatar.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect()
    }
}

/// Outcome handed to the completion path when a consent grant finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentReceipt {
    pub doctor: Doctor,
    pub scope: AccessScope,
    pub duration: AccessDuration,
    pub granted_at_ms: u64,
}

/// Timeline date in the app's display form, e.g. `12 AUG 2025`.
pub fn display_date(epoch_ms: u64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms as i64).single() {
        Some(ts) => ts.format("%d %b %Y").to_string().to_uppercase(),
        None => String::from("01 JAN 1970"),
    }
}

/// Wall-clock label for the status bar, e.g. `14:05`.
pub fn display_clock(epoch_ms: u64) -> String {
    match Utc.timestamp_millis_opt(epoch_ms as i64).single() {
        Some(ts) => ts.format("%H:%M").to_string(),
        None => String::from("00:00"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_a_flag_twice_restores_it() {
        let mut settings = ShareSettings::default();
        for field in ShareField::ALL {
            let before = settings.get(field);
            settings.toggle(field);
            assert_ne!(settings.get(field), before);
            settings.toggle(field);
            assert_eq!(settings.get(field), before);
        }
        assert_eq!(settings, ShareSettings::default());
    }

    #[test]
    fn default_share_settings_match_the_dashboard() {
        let settings = ShareSettings::default();
        assert!(settings.clinical_summary);
        assert!(settings.medications);
        assert!(!settings.labs);
        assert!(!settings.imaging);
    }

    #[test]
    fn roster_has_three_doctors_two_verified() {
        let roster = doctor_roster();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.iter().filter(|d| d.verified).count(), 2);
        assert!(roster.iter().all(|d| d.address.starts_with("0x")));
    }

    #[test]
    fn duration_expiry_offsets() {
        let now = 1_000;
        assert_eq!(AccessDuration::OneHour.expiry_from(now), now + 3_600);
        assert_eq!(AccessDuration::OneDay.expiry_from(now), now + 86_400);
        assert_eq!(AccessDuration::SevenDays.expiry_from(now), now + 604_800);
        assert_eq!(AccessDuration::ThirtyDays.expiry_from(now), now + 2_592_000);
    }

    #[test]
    fn scope_wire_values_are_uppercase() {
        let encoded = serde_json::to_string(&AccessScope::Emergency).expect("encode scope");
        assert_eq!(encoded, "\"EMERGENCY\"");
        let decoded: AccessScope = serde_json::from_str("\"BASIC\"").expect("decode scope");
        assert_eq!(decoded, AccessScope::Basic);
    }

    #[test]
    fn duration_wire_values_are_compact() {
        let encoded = serde_json::to_string(&AccessDuration::SevenDays).expect("encode duration");
        assert_eq!(encoded, "\"7d\"");
    }

    #[test]
    fn display_date_is_uppercase_day_month_year() {
        // 2025-08-12 00:00:00 UTC
        assert_eq!(display_date(1_754_956_800_000), "12 AUG 2025");
    }

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(PatientProfile::demo().initials(), "JV");
    }
}
