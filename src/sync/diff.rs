//! Diff engine.
//!
//! Compares the local catalog with the remote sheet and produces the
//! mutations that make the sheet match the local file. The result depends
//! only on its inputs; nothing here touches the network or the disk.

use std::collections::{HashMap, HashSet};

use crate::model::{Catalog, RowKey};
use crate::sync::grid::{RemoteCatalog, RemoteRow};
use crate::sync::types::{MutationOp, RowValues};

/// Compute the mutations turning `remote` into `local`.
///
/// Appends and updates come first, in local catalog order. Deletes follow,
/// by descending row offset, so applying them one by one never shifts a row
/// that is still to be deleted.
///
/// When either side holds the same identity twice, the later entry wins.
/// Remote rows whose identity is gone locally are all deleted, duplicates
/// included.
#[must_use]
pub fn diff(local: &Catalog, remote: &RemoteCatalog, langs: &[String]) -> Vec<MutationOp> {
    let local_by_key = local.index_by_key();
    let remote_by_key: HashMap<RowKey, &RemoteRow> = remote
        .rows()
        .iter()
        .map(|r| (r.record.row_key(), r))
        .collect();

    let mut ops = Vec::new();
    let mut seen = HashSet::new();

    for record in local {
        let key = record.row_key();
        if !seen.insert(key.clone()) {
            continue;
        }
        let Some(record) = local_by_key.get(&key) else {
            continue;
        };

        let values = RowValues {
            category: record.category.clone(),
            key: record.key.clone(),
            values: record.values_for(langs),
        };

        match remote_by_key.get(&key) {
            None => ops.push(MutationOp::Append(values)),
            Some(row) if row.record.values_for(langs) != values.values => {
                ops.push(MutationOp::Update {
                    row: row.offset,
                    values,
                });
            }
            Some(_) => {}
        }
    }

    let mut deletes: Vec<MutationOp> = remote
        .rows()
        .iter()
        .filter(|r| !local_by_key.contains_key(&r.record.row_key()))
        .map(|r| MutationOp::Delete {
            row: r.offset,
            key: r.record.row_key(),
        })
        .collect();
    deletes.sort_by(|a, b| delete_offset(b).cmp(&delete_offset(a)));
    ops.extend(deletes);

    ops
}

fn delete_offset(op: &MutationOp) -> usize {
    match op {
        MutationOp::Delete { row, .. } => *row,
        MutationOp::Append(_) | MutationOp::Update { .. } => 0,
    }
}
