use std::path::PathBuf;

use shared::model::{RecordSummary, RecordTag};

/// Record list interface surfaced to the UI runtime.
///
/// The shell owns the only mutable copy of the timeline; dialogs feed new
/// entries back through `insert_front` when an upload completes. Nothing is
/// persisted; the store's lifetime is the process's.
pub trait RecordStore {
    /// All records, most recent first.
    fn records(&self) -> Vec<RecordSummary>;

    /// Fetch a single record by identifier.
    fn record(&self, id: u64) -> Option<RecordSummary>;

    /// Prepend a freshly created record.
    fn insert_front(&mut self, record: RecordSummary);

    /// Reserve the next unique record id.
    fn allocate_id(&mut self) -> u64;
}

/// In-memory record store with a monotonic id allocator.
pub struct InMemoryRecords {
    records: Vec<RecordSummary>,
    next_id: u64,
}

impl InMemoryRecords {
    pub fn new(records: Vec<RecordSummary>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    /// Store preloaded with the demo timeline.
    pub fn seeded() -> Self {
        Self::new(seed_records())
    }
}

impl RecordStore for InMemoryRecords {
    fn records(&self) -> Vec<RecordSummary> {
        self.records.clone()
    }

    fn record(&self, id: u64) -> Option<RecordSummary> {
        self.records.iter().find(|record| record.id == id).cloned()
    }

    fn insert_front(&mut self, record: RecordSummary) {
        self.records.insert(0, record);
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Demo timeline shown on first launch.
pub fn seed_records() -> Vec<RecordSummary> {
    vec![
        RecordSummary {
            id: 1,
            date: String::from("12 AUG 2025"),
            title: String::from("Complete blood count"),
            meta: String::from("PDF • 2 pages • Lab ABC"),
            tag: RecordTag::Lab,
        },
        RecordSummary {
            id: 2,
            date: String::from("03 AUG 2025"),
            title: String::from("Appointment Dr. Lopez"),
            meta: String::from("Diagnosis: allergic rhinitis"),
            tag: RecordTag::Note,
        },
        RecordSummary {
            id: 3,
            date: String::from("20 JUL 2025"),
            title: String::from("Chest X-ray"),
            meta: String::from("DICOM attached • HMG Hospital"),
            tag: RecordTag::Imaging,
        },
    ]
}

/// Candidate document offered by the upload picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub size_bytes: u64,
    /// Present when the candidate is backed by a real file; the simulated
    /// backend never reads it.
    pub path: Option<PathBuf>,
}

impl FileCandidate {
    pub fn is_pdf(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf")
    }

    /// File name minus its extension, used as the synthesized record title.
    pub fn stem(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => self.name.clone(),
        }
    }

    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size_bytes as f64 / 1024.0)
    }
}

/// Demo picker contents used when no inbox directory is supplied.
pub fn sample_files() -> Vec<FileCandidate> {
    vec![
        FileCandidate {
            name: String::from("report.pdf"),
            size_bytes: 48_742,
            path: None,
        },
        FileCandidate {
            name: String::from("chest_xray.pdf"),
            size_bytes: 1_204_002,
            path: None,
        },
        FileCandidate {
            name: String::from("vacation.png"),
            size_bytes: 2_117_760,
            path: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_allocates_ids_past_the_seed() {
        let mut store = InMemoryRecords::seeded();
        let seeded: Vec<u64> = store.records().iter().map(|r| r.id).collect();
        let fresh = store.allocate_id();
        assert!(!seeded.contains(&fresh));
        assert_ne!(store.allocate_id(), fresh);
    }

    #[test]
    fn insert_front_keeps_newest_first() {
        let mut store = InMemoryRecords::seeded();
        let id = store.allocate_id();
        store.insert_front(RecordSummary {
            id,
            date: String::from("06 AUG 2026"),
            title: String::from("report"),
            meta: String::from("PDF • 47.6 KB • Wallet upload"),
            tag: RecordTag::Upload,
        });
        let records = store.records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].tag, RecordTag::Upload);
    }

    #[test]
    fn file_stem_drops_only_the_extension() {
        let file = FileCandidate {
            name: String::from("report.final.pdf"),
            size_bytes: 1,
            path: None,
        };
        assert_eq!(file.stem(), "report.final");
        assert!(file.is_pdf());
    }

    #[test]
    fn non_pdf_candidates_are_flagged() {
        let files = sample_files();
        assert_eq!(files.iter().filter(|f| f.is_pdf()).count(), 2);
        assert!(!files[2].is_pdf());
    }
}
