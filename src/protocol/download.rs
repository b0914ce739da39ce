//! Test download stream.
//!
//! The instrument sends its stored tests to a PC as printable bytes: one
//! byte holding the test count, then every stored record byte in slot
//! order. Each byte is offset by [`ASCII_OFFSET`] (wrapping), so a count
//! of 3 goes out as `'3'`.
//!
//! Format: Count(1) + Count × Record(16)

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt::Write;
use tracing::debug;

use crate::calibration::Measurement;
use crate::data::TestRecord;
use crate::error::{Error, Result};

/// Offset added to every transmitted byte.
pub const ASCII_OFFSET: u8 = 48;

/// Build the download stream for `count` tests from their raw record bytes.
pub fn encode_dump(count: u8, records: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + records.len());
    buf.put_u8(count.wrapping_add(ASCII_OFFSET));
    for &byte in records {
        buf.put_u8(byte.wrapping_add(ASCII_OFFSET));
    }
    buf.freeze()
}

/// Decode a download stream received from the instrument.
///
/// Bytes after the last announced record are ignored.
pub fn parse_dump(data: &[u8]) -> Result<Vec<TestRecord>> {
    let mut buf = data;
    if !buf.has_remaining() {
        return Err(Error::InvalidData {
            context: "Download stream is empty".to_string(),
        });
    }

    let count = buf.get_u8().wrapping_sub(ASCII_OFFSET) as usize;
    let expected = count * TestRecord::SIZE;
    if buf.remaining() < expected {
        return Err(Error::InvalidData {
            context: format!(
                "Download incomplete: have {} record bytes, need {}",
                buf.remaining(),
                expected
            ),
        });
    }

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let mut bytes = [0u8; TestRecord::SIZE];
        buf.copy_to_slice(&mut bytes);
        for byte in bytes.iter_mut() {
            *byte = byte.wrapping_sub(ASCII_OFFSET);
        }
        records.push(TestRecord::from_bytes(&bytes));
    }

    debug!("Parsed {} tests from download", records.len());
    Ok(records)
}

/// CSV header row written by [`records_to_csv`].
pub const CSV_HEADER: &str = "test,timestamp,power,density,weight,hardness,units,aggregate,\
zero,full_scale,sample1,sample2,sample3,average,distance_mm,pressure_mpa";

/// Export records as CSV, one row per test.
///
/// Distance and pressure are the average reading converted under the
/// test's own configuration. A time stamp that is not a real date is
/// left empty.
pub fn records_to_csv(records: &[TestRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for (i, record) in records.iter().enumerate() {
        let timestamp = record
            .stamp
            .to_naive_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let settings = &record.settings;
        let [s1, s2, s3] = record.samples;
        let average = record.average();
        let measurement = Measurement::convert(average, settings, &record.calibration);

        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{:?},{:?},{:?},{:?},{:?},{:?},{},{},{},{},{},{},{:.2},{:.1}",
            i + 1,
            timestamp,
            settings.power,
            settings.density,
            settings.weight,
            settings.hardness,
            settings.units,
            settings.aggregate,
            record.calibration.zero,
            record.calibration.full_scale,
            s1,
            s2,
            s3,
            average,
            measurement.distance as f64 / 100.0,
            measurement.pressure as f64 / 10.0,
        );
    }
    out
}
