use super::{collect, decode as decode_vector, Section, REGULAR};
use crate::error::PayloadResult;
use crate::wire::{patch_u32, position};
use crate::writer::PayloadWriter;
use plb_types::{ResolvedType, ValueResult};
use plb_vector::{LiteralVector, ValueVector, VectorRef};
use std::sync::Arc;

/// REGULAR only: a reference header whose targets are nested vector writes of the element type.
pub(super) fn encode(
    w: &mut PayloadWriter,
    vector: &dyn ValueVector,
    element: &ResolvedType,
) -> PayloadResult<()> {
    let values = collect(vector, |row| vector.get_array(row))?;
    w.buf.push(REGULAR);
    let header = w.reserve_refs(values.len())?;
    for (row, value) in values.iter().enumerate() {
        if let Some(items) = value {
            let target = position(&w.buf)?;
            patch_u32(&mut w.buf, header + row * 4, target);
            w.write_vector(items.as_ref(), element)?;
        }
    }
    Ok(())
}

pub(super) fn decode(section: Section, element: &ResolvedType) -> PayloadResult<VectorRef> {
    section.expect_regular()?;
    section.ensure_rows(section.start, 4)?;
    Ok(Arc::new(ArrayColumn {
        section,
        element: element.clone(),
    }))
}

/// Cells are decoded on access.
#[derive(Debug)]
struct ArrayColumn {
    section: Section,
    element: ResolvedType,
}

impl ValueVector for ArrayColumn {
    section_vector!();

    fn get_array(&self, row: usize) -> ValueResult<VectorRef> {
        self.section.check(row);
        match self.section.target(row)? {
            Some(target) => Ok(decode_vector(&self.section.data, target, &self.element)?),
            None => Ok(LiteralVector::null(self.element.clone(), 0).into_ref()),
        }
    }
}
