use std::{io, path::Path};

use crate::{
    config::WeightFormatConfig,
    encode::{EncodeError, EncodeFlags, EncodeTable, EncodeTuple},
    fst::{EPSILON, Tr},
    weight::Weight,
};

/// Rewrites single transitions through an [`EncodeTable`].
///
/// With `c` the code of the triple, encoding `(i, o, w)` yields `(c, c, one)`
/// when labels and weights are encoded, `(c, c, w)` for labels only,
/// `(c, o, one)` for weights only and `(c, o, w)` otherwise.
#[derive(Debug, Clone)]
pub struct EncodeMapper<W: Weight> {
    table: EncodeTable<W>,
}

impl<W: Weight> EncodeMapper<W> {
    pub fn new(flags: EncodeFlags) -> Self {
        EncodeMapper {
            table: EncodeTable::new(flags),
        }
    }

    pub fn from_table(table: EncodeTable<W>) -> Self {
        EncodeMapper { table }
    }

    pub fn flags(&self) -> EncodeFlags {
        self.table.flags()
    }

    pub fn table(&self) -> &EncodeTable<W> {
        &self.table
    }

    pub fn size(&self) -> usize {
        self.table.size()
    }

    pub fn encode_tr(&mut self, tr: &Tr<W>) -> Tr<W> {
        let flags = self.flags();
        let code = self.table.encode(EncodeTuple::new(
            tr.ilabel,
            tr.olabel,
            tr.weight.clone(),
        ));

        Tr::new(
            code,
            if flags.labels { code } else { tr.olabel },
            if flags.weights {
                W::one()
            } else {
                tr.weight.clone()
            },
        )
    }

    /// Restores the transition `tr` was encoded from. Epsilon transitions
    /// pass through unchanged.
    pub fn decode_tr(&self, tr: &Tr<W>) -> Result<Tr<W>, EncodeError> {
        if tr.ilabel == EPSILON {
            return Ok(tr.clone());
        }

        let flags = self.flags();
        if flags.labels && tr.ilabel != tr.olabel {
            return Err(EncodeError::LabelMismatch {
                ilabel: tr.ilabel,
                olabel: tr.olabel,
            });
        }
        if flags.weights && tr.weight != W::one() {
            return Err(EncodeError::NonTrivialWeight(
                tr.weight.to_text(&WeightFormatConfig::default()),
            ));
        }

        let tuple = self.table.decode(tr.ilabel)?;
        Ok(Tr::new(
            tuple.ilabel,
            if flags.labels {
                tuple.olabel
            } else {
                tr.olabel
            },
            if flags.weights {
                tuple.weight.clone()
            } else {
                tr.weight.clone()
            },
        ))
    }

    pub fn write<O: io::Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        self.table.write(out)
    }

    pub fn read<I: io::Read + ?Sized>(input: &mut I) -> Result<Self, EncodeError> {
        EncodeTable::read(input).map(Self::from_table)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EncodeError> {
        self.table.write_file(path)
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, EncodeError> {
        EncodeTable::read_file(path).map(Self::from_table)
    }
}
