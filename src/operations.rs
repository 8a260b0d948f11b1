//! Synchronizing `.tr` files against a freshly built template.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    formats::{
        BACKUP_SUFFIX, Line, Partition, Record, TEXTDOMAIN_PREFIX, Template, TrFile,
        UNUSED_SEPARATOR,
    },
};

/// Options controlling sync behavior.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncOptions {
    /// Restore translations from the unused partition when their key shows up
    /// in the template again. Off by default: the key is then added as a new
    /// untranslated record and its unused twin stays where it is.
    pub restore_unused: bool,
}

/// Counters describing one sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Keys in the template.
    pub total_keys: usize,
    /// Template keys that had no record before.
    pub added: usize,
    /// Template keys whose translation was carried over.
    pub preserved: usize,
    /// Template keys that still have no translation.
    pub untranslated: usize,
    /// Records moved from the used to the unused partition in this pass.
    pub moved_to_unused: usize,
    /// Records in the unused partition after the pass.
    pub unused_total: usize,
    /// Unused translations put back into use (only with `restore_unused`).
    pub restored: usize,
}

/// Exact copy of a locale file's content taken before it is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub content: String,
}

impl Backup {
    /// Where the backup of `path` is stored (`<path>.old`).
    pub fn path_for<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut name = path.as_ref().as_os_str().to_owned();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Writes the backup next to `path` and returns the backup location.
    pub fn write_next_to<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, Error> {
        let backup_path = Self::path_for(path);
        std::fs::write(&backup_path, &self.content)?;
        Ok(backup_path)
    }
}

/// Result of [`sync_tr_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub file: TrFile,
    /// Present whenever an existing file was given.
    pub backup: Option<Backup>,
    pub report: SyncReport,
}

/// A record of the existing file together with the comment lines above it.
#[derive(Debug, Clone)]
struct ExistingEntry<'a> {
    partition: Partition,
    leading: Vec<&'a Line>,
    record: &'a Record,
}

fn collect_entries(file: &TrFile) -> Vec<ExistingEntry<'_>> {
    let mut entries = Vec::new();
    let mut partition = Partition::Used;
    let mut leading: Vec<&Line> = Vec::new();

    for line in &file.lines {
        if line.is_unused_separator() {
            partition = Partition::Unused;
            leading.clear();
            continue;
        }
        match line {
            Line::Record(record) => entries.push(ExistingEntry {
                partition,
                leading: std::mem::take(&mut leading),
                record,
            }),
            _ if line.is_blank() || line.textdomain().is_some() => leading.clear(),
            _ => leading.push(line),
        }
    }

    entries
}

fn push_entry(file: &mut TrFile, leading: &[&Line], record: Record) {
    file.lines.extend(leading.iter().map(|line| (*line).clone()));
    file.push_record(record);
}

/// Produces the updated locale file for `template`.
///
/// The new file has a domain header for `modname`, one record per template key
/// (in template order, carrying over existing translations), the unused
/// separator, then every existing record that no longer belongs to the used
/// partition, in its original order. Nothing that carried a translation is
/// dropped.
pub fn sync_tr_file(
    template: &Template,
    modname: &str,
    existing: Option<&TrFile>,
    options: &SyncOptions,
) -> SyncOutcome {
    let backup = existing.map(|file| Backup {
        content: file.render(),
    });
    let entries = existing.map(collect_entries).unwrap_or_default();

    // first translated record per key wins, otherwise the first one seen
    let mut used: HashMap<&str, usize> = HashMap::new();
    let mut unused: HashMap<&str, usize> = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        let lookup = match entry.partition {
            Partition::Used => &mut used,
            Partition::Unused => &mut unused,
        };
        match lookup.get(entry.record.key.as_str()) {
            Some(&prev)
                if entries[prev].record.is_translated() || !entry.record.is_translated() => {}
            _ => {
                lookup.insert(entry.record.key.as_str(), idx);
            }
        }
    }

    let mut report = SyncReport {
        total_keys: template.len(),
        ..SyncReport::default()
    };
    let mut placed: HashSet<usize> = HashSet::new();
    let mut file = TrFile {
        lines: Vec::with_capacity(template.len() + entries.len() + 2),
        trailing_newline: true,
        crlf: existing.is_some_and(|file| file.crlf),
    };
    file.push_comment(format!("{TEXTDOMAIN_PREFIX} {modname}"));

    for key in template {
        let restorable = options.restore_unused
            && !used
                .get(key.as_str())
                .is_some_and(|&idx| entries[idx].record.is_translated());
        let source = match (used.get(key.as_str()), unused.get(key.as_str())) {
            (_, Some(&idx)) if restorable && entries[idx].record.is_translated() => {
                report.restored += 1;
                Some(idx)
            }
            (Some(&idx), _) => Some(idx),
            _ => None,
        };

        match source {
            Some(idx) => {
                let entry = &entries[idx];
                placed.insert(idx);
                if entry.record.is_translated() {
                    report.preserved += 1;
                } else {
                    report.untranslated += 1;
                }
                push_entry(&mut file, &entry.leading, entry.record.clone());
            }
            None => {
                report.added += 1;
                report.untranslated += 1;
                file.push_record(Record::untranslated(key.as_str()));
            }
        }
    }

    file.push_comment(UNUSED_SEPARATOR);

    for (idx, entry) in entries.iter().enumerate() {
        if placed.contains(&idx) {
            continue;
        }
        if entry.partition == Partition::Used && template.contains(&entry.record.key) {
            let kept = used
                .get(entry.record.key.as_str())
                .map(|&i| entries[i].record.value.as_str());
            // same key twice in use: only a differing translation needs keeping
            if !entry.record.is_translated() || kept == Some(entry.record.value.as_str()) {
                continue;
            }
        }
        if entry.partition == Partition::Used {
            report.moved_to_unused += 1;
        }
        report.unused_total += 1;
        push_entry(&mut file, &entry.leading, entry.record.clone());
    }

    debug!(
        modname,
        keys = report.total_keys,
        added = report.added,
        preserved = report.preserved,
        moved = report.moved_to_unused,
        "synchronized locale file"
    );

    SyncOutcome {
        file,
        backup,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn used_and_unused(file: &TrFile) -> (Vec<String>, Vec<String>) {
        let mut used = Vec::new();
        let mut unused = Vec::new();
        for (partition, record) in file.records() {
            match partition {
                Partition::Used => used.push(record.to_string()),
                Partition::Unused => unused.push(record.to_string()),
            }
        }
        (used, unused)
    }

    #[test]
    fn test_sync_without_existing_file() {
        let template = Template::from_keys(["b", "a"]);
        let outcome = sync_tr_file(&template, "mymod", None, &SyncOptions::default());

        assert!(outcome.backup.is_none());
        assert_eq!(
            outcome.file.render(),
            "# textdomain: mymod\na=\nb=\n##### not used anymore #####\n"
        );
        assert_eq!(outcome.report.added, 2);
        assert_eq!(outcome.report.untranslated, 2);
    }

    #[test]
    fn test_sync_keeps_crlf_terminators() {
        let existing = TrFile::parse("# textdomain: m\r\nHello=Bonjour\r\nStone=\r\nOld=x\r\n");
        let template = Template::from_keys(["Hello", "Stone"]);

        let outcome = sync_tr_file(&template, "m", Some(&existing), &SyncOptions::default());

        assert_eq!(
            outcome.file.render(),
            "# textdomain: m\r\nHello=Bonjour\r\nStone=\r\n##### not used anymore #####\r\nOld=x\r\n"
        );
        assert_eq!(outcome.report.preserved, 1);
        assert_eq!(outcome.report.untranslated, 1);
    }

    #[test]
    fn test_sync_preserves_and_moves_to_unused() {
        let existing = TrFile::parse(indoc! {"
            # textdomain: mymod
            Hello=Bonjour
            Old=Ancien
            Pending=
        "});
        let template = Template::from_keys(["Hello", "New"]);
        let outcome = sync_tr_file(&template, "mymod", Some(&existing), &SyncOptions::default());

        let (used, unused) = used_and_unused(&outcome.file);
        assert_eq!(used, vec!["Hello=Bonjour", "New="]);
        assert_eq!(unused, vec!["Old=Ancien", "Pending="]);
        assert_eq!(
            outcome.backup.map(|b| b.content),
            Some(existing.render())
        );
        assert_eq!(
            outcome.report,
            SyncReport {
                total_keys: 2,
                added: 1,
                preserved: 1,
                untranslated: 1,
                moved_to_unused: 2,
                unused_total: 2,
                restored: 0,
            }
        );
    }

    #[test]
    fn test_sync_keeps_unused_partition_order() {
        let existing = TrFile::parse(indoc! {"
            # textdomain: mymod
            B=bee
            ##### not used anymore #####
            Z=zed
            A=ay
        "});
        let outcome = sync_tr_file(
            &Template::default(),
            "mymod",
            Some(&existing),
            &SyncOptions::default(),
        );
        let (used, unused) = used_and_unused(&outcome.file);
        assert!(used.is_empty());
        assert_eq!(unused, vec!["B=bee", "Z=zed", "A=ay"]);
    }

    #[test]
    fn test_sync_does_not_resurrect_unused_by_default() {
        let existing = TrFile::parse(indoc! {"
            # textdomain: mymod
            ##### not used anymore #####
            Back=Retour
        "});
        let template = Template::from_keys(["Back"]);
        let outcome = sync_tr_file(&template, "mymod", Some(&existing), &SyncOptions::default());

        let (used, unused) = used_and_unused(&outcome.file);
        assert_eq!(used, vec!["Back="]);
        assert_eq!(unused, vec!["Back=Retour"]);
        assert_eq!(outcome.report.restored, 0);
    }

    #[test]
    fn test_sync_restores_unused_when_enabled() {
        let existing = TrFile::parse(indoc! {"
            # textdomain: mymod
            Back=
            ##### not used anymore #####
            Back=Retour
        "});
        let template = Template::from_keys(["Back"]);
        let options = SyncOptions {
            restore_unused: true,
        };
        let outcome = sync_tr_file(&template, "mymod", Some(&existing), &options);

        let (used, unused) = used_and_unused(&outcome.file);
        assert_eq!(used, vec!["Back=Retour"]);
        assert!(unused.is_empty());
        assert_eq!(outcome.report.restored, 1);
    }

    #[test]
    fn test_sync_carries_comments_with_records() {
        let existing = TrFile::parse(indoc! {"
            # textdomain: oldname
            #WARNING: AUTOTRANSLATED BY MACHINE TRANSLATION
            Hello=Bonjour

            # stray comment
        "});
        let template = Template::from_keys(["Hello"]);
        let outcome = sync_tr_file(&template, "mymod", Some(&existing), &SyncOptions::default());

        assert_eq!(
            outcome.file.render(),
            indoc! {"
                # textdomain: mymod
                #WARNING: AUTOTRANSLATED BY MACHINE TRANSLATION
                Hello=Bonjour
                ##### not used anymore #####
            "}
        );
    }

    #[test]
    fn test_sync_keeps_conflicting_duplicate_translation() {
        let existing = TrFile::parse(indoc! {"
            Key=
            Key=first
            Key=second
            Key=first
        "});
        let template = Template::from_keys(["Key"]);
        let outcome = sync_tr_file(&template, "mymod", Some(&existing), &SyncOptions::default());

        let (used, unused) = used_and_unused(&outcome.file);
        assert_eq!(used, vec!["Key=first"]);
        assert_eq!(unused, vec!["Key=second"]);
    }

    #[test]
    fn test_backup_path_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mymod.fr.tr");
        assert_eq!(
            Backup::path_for(&path),
            dir.path().join("mymod.fr.tr.old")
        );

        let backup = Backup {
            content: "Hello=Bonjour".to_string(),
        };
        let written = backup.write_next_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), "Hello=Bonjour");
    }
}
