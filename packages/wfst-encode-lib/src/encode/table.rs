use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use hashbrown::HashMap;

use crate::{
    encode::{ENCODE_MAGIC_NUMBER, EncodeError, EncodeFlags, EncodeTuple},
    fst::{EPSILON, Label},
    utils::{read_i32, read_string, read_u32, read_u64, write_i32, write_string, write_u32, write_u64},
    weight::Weight,
};

/// Bidirectional mapping between label/weight triples and codes.
///
/// Codes are dense and start at `1`, `0` stays free for epsilon. A code is
/// assigned the first time its triple is seen and never changes afterwards.
/// Fields not selected by the flags are normalized out of the key, so
/// triples that differ only there share a code.
#[derive(Debug, Clone)]
pub struct EncodeTable<W: Weight> {
    flags: EncodeFlags,
    tuples: Vec<EncodeTuple<W>>,
    codes: HashMap<EncodeTuple<W>, Label>,
}

impl<W: Weight> EncodeTable<W> {
    pub fn new(flags: EncodeFlags) -> Self {
        EncodeTable {
            flags,
            tuples: vec![],
            codes: HashMap::new(),
        }
    }

    pub fn flags(&self) -> EncodeFlags {
        self.flags
    }

    /// Number of distinct triples, which is also the largest code.
    pub fn size(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// The key `tuple` is stored under given the flags.
    pub fn key(&self, tuple: EncodeTuple<W>) -> EncodeTuple<W> {
        EncodeTuple {
            ilabel: tuple.ilabel,
            olabel: if self.flags.labels {
                tuple.olabel
            } else {
                EPSILON
            },
            weight: if self.flags.weights {
                tuple.weight
            } else {
                W::one()
            },
        }
    }

    /// Returns the code of `tuple`, assigning the next free code if it is new.
    pub fn encode(&mut self, tuple: EncodeTuple<W>) -> Label {
        let key = self.key(tuple);
        if let Some(code) = self.codes.get(&key) {
            return *code;
        }

        self.tuples.push(key.clone());
        let code = self.tuples.len() as Label;
        self.codes.insert(key, code);
        code
    }

    /// The code of `tuple` without assigning one.
    pub fn get_code(&self, tuple: EncodeTuple<W>) -> Option<Label> {
        self.codes.get(&self.key(tuple)).copied()
    }

    pub fn decode(&self, code: Label) -> Result<&EncodeTuple<W>, EncodeError> {
        (code as usize)
            .checked_sub(1)
            .and_then(|i| self.tuples.get(i))
            .ok_or(EncodeError::UnknownCode(code))
    }

    /// Triples in code order, the first one has code `1`.
    pub fn iter(&self) -> impl Iterator<Item = &EncodeTuple<W>> {
        self.tuples.iter()
    }

    pub fn write<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        write_i32(out, ENCODE_MAGIC_NUMBER)?;
        write_string(out, &W::weight_type())?;
        write_u32(out, self.flags.bits())?;
        write_u64(out, self.tuples.len() as u64)?;
        for tuple in &self.tuples {
            write_u32(out, tuple.ilabel)?;
            write_u32(out, tuple.olabel)?;
            tuple.weight.write_binary(out)?;
        }
        Ok(())
    }

    pub fn read<I: Read + ?Sized>(input: &mut I) -> Result<Self, EncodeError> {
        let magic = read_i32(input)?;
        if magic != ENCODE_MAGIC_NUMBER {
            return Err(EncodeError::InvalidCodex(format!(
                "bad magic number {magic}"
            )));
        }

        let weight_type = read_string(input)?;
        if weight_type != W::weight_type() {
            return Err(EncodeError::WeightTypeMismatch {
                expected: W::weight_type(),
                found: weight_type,
            });
        }

        let bits = read_u32(input)?;
        let flags = EncodeFlags::from_bits(bits)
            .ok_or_else(|| EncodeError::InvalidCodex(format!("unknown flags {bits:#x}")))?;

        let size = read_u64(input)?;
        let mut table = EncodeTable::new(flags);
        for _ in 0..size {
            let ilabel = read_u32(input)?;
            let olabel = read_u32(input)?;
            let weight = W::read_binary(input)?;
            let tuple = EncodeTuple::new(ilabel, olabel, weight);

            if table.key(tuple.clone()) != tuple {
                return Err(EncodeError::InvalidCodex(format!(
                    "entry {} carries fields not covered by flags {flags}",
                    table.size() + 1
                )));
            }
            if table.codes.contains_key(&tuple) {
                return Err(EncodeError::InvalidCodex(format!(
                    "duplicate entry {}",
                    table.size() + 1
                )));
            }
            table.encode(tuple);
        }

        Ok(table)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EncodeError> {
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut out)?;
        out.flush()?;
        tracing::debug!(
            "wrote codex with {} entries to {}",
            self.size(),
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self, EncodeError> {
        let mut input = BufReader::new(File::open(path.as_ref())?);
        let table = Self::read(&mut input)?;
        tracing::debug!(
            "read codex with {} entries from {}",
            table.size(),
            path.as_ref().display()
        );
        Ok(table)
    }
}
