//! CSV serialization of the assembled ledger.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use pettrail_types::{flatten, UnifiedEvent, CSV_HEADER};

// Spreadsheet applications sniff this to decode UTF-8 correctly.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Write the full ledger to `path`, replacing any existing file.
///
/// One header row, then one row per event in ledger order.
pub fn write_csv(path: &Path, events: &[UnifiedEvent]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CSV_HEADER)?;
    for event in events {
        writer.write_record(flatten(event))?;
    }
    writer.flush()?;

    Ok(())
}
