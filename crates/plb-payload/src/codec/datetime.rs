use super::{collect, write_pooled, Section};
use crate::error::PayloadResult;
use crate::null_bitmap::Nulls;
use crate::writer::PayloadWriter;
use plb_types::{EpochDateTime, EpochDateTimeOffset, ValueResult};
use plb_vector::{LiteralVector, Value, ValueVector, VectorRef};
use std::sync::Arc;

/// Epoch milliseconds in the int64 pool. Zoned values lose their offset and read back as UTC.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    nulls: Nulls,
) -> PayloadResult<()> {
    let values = collect(vector, |row| {
        vector.get_date_time(row).map(|v| v.epoch_millis())
    })?;
    write_pooled(w, &values, nulls, |a, b| a == b, |cache, buf, &millis| {
        cache.intern_int64(buf, millis)
    })
}

/// Decodes as either `datetime` or `datetimeoffset`, whichever the section's type says.
pub(super) fn decode(section: Section) -> PayloadResult<VectorRef> {
    if section.is_literal()? {
        let value = EpochDateTime::from_epoch_millis(section.literal_u64()? as i64);
        return Ok(
            LiteralVector::with_type(section.ty, Value::DateTime(value), section.rows).into_ref(),
        );
    }
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(DateTimeColumn { section }))
}

#[derive(Debug)]
struct DateTimeColumn {
    section: Section,
}

impl DateTimeColumn {
    fn epoch_millis(&self, row: usize) -> ValueResult<i64> {
        self.section.check(row);
        Ok(self.section.pooled_u64(row)? as i64)
    }
}

impl ValueVector for DateTimeColumn {
    section_vector!();

    fn get_date_time(&self, row: usize) -> ValueResult<EpochDateTime> {
        self.epoch_millis(row).map(EpochDateTime::from_epoch_millis)
    }

    fn get_date_time_offset(&self, row: usize) -> ValueResult<EpochDateTimeOffset> {
        self.epoch_millis(row).map(EpochDateTimeOffset::utc)
    }

    fn get_int64(&self, row: usize) -> ValueResult<i64> {
        self.epoch_millis(row)
    }
}
