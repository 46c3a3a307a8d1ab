//! Lead persistence
//!
//! Stores are append-only. A lead is written exactly once and never updated.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::{Lead, LeadId};
use crate::error::{RoiError, RoiResult};

/// Persistent collection of leads keyed by id
pub trait LeadStore: Send + Sync {
    /// Add a lead; fails with `DuplicateLead` if the id is already stored
    fn insert(&self, lead: Lead) -> RoiResult<()>;

    /// All leads in insertion order
    fn all(&self) -> RoiResult<Vec<Lead>>;

    fn get(&self, id: LeadId) -> RoiResult<Option<Lead>> {
        Ok(self.all()?.into_iter().find(|lead| lead.id == id))
    }
}

impl<S: LeadStore + ?Sized> LeadStore for Arc<S> {
    fn insert(&self, lead: Lead) -> RoiResult<()> {
        (**self).insert(lead)
    }

    fn all(&self) -> RoiResult<Vec<Lead>> {
        (**self).all()
    }

    fn get(&self, id: LeadId) -> RoiResult<Option<Lead>> {
        (**self).get(id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.read().is_empty()
    }
}

impl LeadStore for InMemoryLeadStore {
    fn insert(&self, lead: Lead) -> RoiResult<()> {
        let mut leads = self.leads.write();
        if leads.iter().any(|existing| existing.id == lead.id) {
            return Err(RoiError::DuplicateLead(lead.id));
        }
        leads.push(lead);
        Ok(())
    }

    fn all(&self) -> RoiResult<Vec<Lead>> {
        Ok(self.leads.read().clone())
    }

    fn get(&self, id: LeadId) -> RoiResult<Option<Lead>> {
        Ok(self.leads.read().iter().find(|lead| lead.id == id).cloned())
    }
}

/// One JSON document per line, appended under a lock
#[derive(Debug)]
pub struct JsonLinesLeadStore {
    path: PathBuf,
    writer: Mutex<Writer>,
}

#[derive(Debug)]
struct Writer {
    file: File,
    ids: HashSet<LeadId>,
}

impl JsonLinesLeadStore {
    /// Open or create a store file
    pub fn open(path: impl Into<PathBuf>) -> RoiResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let (ids, intact_len) = if path.exists() {
            let contents = read_leads(&path)?;
            (contents.leads.into_iter().map(|lead| lead.id).collect(), contents.intact_len)
        } else {
            (HashSet::new(), 0)
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let len = file.metadata()?.len();
        if intact_len < len {
            log::warn!(
                "Truncating {} from {} to {} bytes to drop an unfinished lead",
                path.display(),
                len,
                intact_len
            );
            file.set_len(intact_len)?;
        }
        log::info!("Opened lead store {} ({} leads)", path.display(), ids.len());

        Ok(Self {
            path,
            writer: Mutex::new(Writer { file, ids }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeadStore for JsonLinesLeadStore {
    fn insert(&self, lead: Lead) -> RoiResult<()> {
        let mut line = serde_json::to_string(&lead)?;
        line.push('\n');

        let mut writer = self.writer.lock();
        let Writer { file, ids } = &mut *writer;
        if ids.contains(&lead.id) {
            return Err(RoiError::DuplicateLead(lead.id));
        }

        // A failed append is cut back off so the file only holds whole leads
        let len = file.metadata()?.len();
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            if let Err(truncate) = file.set_len(len) {
                log::error!("Could not drop partial lead from {}: {}", self.path.display(), truncate);
            }
            return Err(e.into());
        }
        ids.insert(lead.id);
        Ok(())
    }

    fn all(&self) -> RoiResult<Vec<Lead>> {
        // Hold the writer so no half-written line is read
        let _writer = self.writer.lock();
        Ok(read_leads(&self.path)?.leads)
    }
}

/// Leads in a store file and the byte length of the complete lines holding them
struct LeadLog {
    leads: Vec<Lead>,
    intact_len: u64,
}

/// Read every newline-terminated lead. An unterminated last line is an
/// unfinished append and is skipped; a bad line anywhere else is an error.
fn read_leads(path: &Path) -> RoiResult<LeadLog> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut leads = Vec::new();
    let mut intact_len = 0u64;
    let mut line = String::new();
    let mut line_no = 0;

    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        line_no += 1;

        if !line.ends_with('\n') {
            log::warn!("Skipping unfinished lead at {} line {}", path.display(), line_no);
            break;
        }
        if !line.trim().is_empty() {
            let lead = serde_json::from_str(&line)
                .map_err(|e| RoiError::Parse(format!("{} line {}: {}", path.display(), line_no, e)))?;
            leads.push(lead);
        }
        intact_len += read as u64;
    }

    Ok(LeadLog { leads, intact_len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::{CreditRating, FinancingTerms, LoanTerm};
    use crate::horizon::HorizonSet;
    use crate::metrics::HorizonMetrics;
    use crate::project::ProjectInput;
    use chrono::Utc;

    fn lead(name: &str) -> Lead {
        let financing = FinancingTerms::new(CreditRating::BBB, LoanTerm::Years20, 0.71, 0.0665).unwrap();
        Lead {
            id: LeadId::new(),
            project: ProjectInput::new(name, 750_000.0, "92101", financing).unwrap(),
            iso_rto: "CAISO".to_string(),
            load_zone: "SP-15 LMP".to_string(),
            avg_ssp_price: None,
            metrics: HorizonSet::from_fn(|h| HorizonMetrics::not_computable(h, None)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_in_memory_insert_and_get() {
        let store = InMemoryLeadStore::new();
        let first = lead("first");
        let second = lead("second");
        store.insert(first.clone()).unwrap();
        store.insert(second.clone()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(second.id).unwrap(), Some(second));
        assert_eq!(store.all().unwrap()[0], first);
        assert_eq!(store.get(LeadId::new()).unwrap(), None);
    }

    #[test]
    fn test_in_memory_rejects_duplicate() {
        let store = InMemoryLeadStore::new();
        let lead = lead("dup");
        store.insert(lead.clone()).unwrap();
        assert!(matches!(store.insert(lead), Err(RoiError::DuplicateLead(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_json_lines_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads").join("leads.jsonl");

        let first = lead("first");
        {
            let store = JsonLinesLeadStore::open(&path).unwrap();
            store.insert(first.clone()).unwrap();
            store.insert(lead("second")).unwrap();
        }

        let reopened = JsonLinesLeadStore::open(&path).unwrap();
        let all = reopened.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].project.company_name, "first");
        assert_eq!(reopened.get(first.id).unwrap().map(|l| l.id), Some(first.id));

        // Ids loaded on open still count as duplicates
        assert!(matches!(reopened.insert(first), Err(RoiError::DuplicateLead(_))));
        assert_eq!(reopened.all().unwrap().len(), 2);
    }

    #[test]
    fn test_json_lines_concurrent_inserts() {
        use rayon::prelude::*;

        let dir = tempfile::tempdir().unwrap();
        let store = JsonLinesLeadStore::open(dir.path().join("leads.jsonl")).unwrap();

        (0..32).into_par_iter().for_each(|i| {
            store.insert(lead(&format!("company {}", i))).unwrap();
        });

        let all = store.all().unwrap();
        assert_eq!(all.len(), 32);
        let ids: HashSet<LeadId> = all.iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn test_corrupt_line_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.jsonl");
        fs::write(&path, "{not json}\n").unwrap();
        assert!(matches!(JsonLinesLeadStore::open(&path), Err(RoiError::Parse(_))));
    }

    #[test]
    fn test_unfinished_last_line_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.jsonl");

        let first = lead("first");
        {
            let store = JsonLinesLeadStore::open(&path).unwrap();
            store.insert(first.clone()).unwrap();
        }
        let intact = fs::metadata(&path).unwrap().len();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"id\":\"6f0c").unwrap();
        drop(file);

        // Readable before reopening, and the reopen cuts the fragment off
        assert_eq!(read_leads(&path).unwrap().leads.len(), 1);
        let store = JsonLinesLeadStore::open(&path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), intact);

        let second = lead("second");
        store.insert(second.clone()).unwrap();
        let ids: Vec<LeadId> = JsonLinesLeadStore::open(&path)
            .unwrap()
            .all()
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
