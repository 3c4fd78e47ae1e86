use std::path::Path;

use crate::{
    encode::{EncodeError, EncodeFlags, EncodeMapper},
    fst::{MutableFst, Tr, TrId},
    logger::{LogLevel, Logger},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Transitions rewritten.
    pub trs: usize,
    /// Entries in the codex after encoding.
    pub codes: usize,
    /// Entries added by this run.
    pub new_codes: usize,
}

/// Encodes every transition of `fst` in place, extending the mapper's table.
/// Final weights are left as they are. Returns the number of transitions.
pub fn encode_fst<F: MutableFst>(fst: &mut F, mapper: &mut EncodeMapper<F::W>) -> usize {
    let mut count = 0;
    for id in fst.iter_tr_ids() {
        let encoded = match fst.get_tr(id) {
            Some(tr) => mapper.encode_tr(tr),
            None => continue,
        };
        fst.set_tr(id, encoded);
        count += 1;
    }
    count
}

/// Decodes every transition of `fst` in place. If any transition fails to
/// decode, `fst` is not modified.
pub fn decode_fst<F: MutableFst>(
    fst: &mut F,
    mapper: &EncodeMapper<F::W>,
) -> Result<usize, EncodeError> {
    let decoded = fst
        .iter_trs()
        .map(|(id, tr)| mapper.decode_tr(tr).map(|tr| (id, tr)))
        .collect::<Result<Vec<(TrId, Tr<F::W>)>, _>>()?;

    let count = decoded.len();
    for (id, tr) in decoded {
        fst.set_tr(id, tr);
    }
    Ok(count)
}

/// Encodes `fst` and stores the codex at `codex_path`.
///
/// With `reuse` the codex already at `codex_path` is loaded and extended, so
/// triples it knows keep their codes. Its flags must equal `flags`.
pub fn encode<F: MutableFst, P: AsRef<Path>>(
    fst: &mut F,
    flags: EncodeFlags,
    reuse: bool,
    codex_path: P,
    logger: Option<&Logger>,
) -> Result<EncodeSummary, EncodeError> {
    let codex_path = codex_path.as_ref();

    let mut mapper = if reuse {
        let mapper = EncodeMapper::read_file(codex_path)?;
        if mapper.flags() != flags {
            return Err(EncodeError::FlagsMismatch {
                codex: mapper.flags(),
                requested: flags,
            });
        }
        mapper
    } else {
        EncodeMapper::new(flags)
    };

    let before = mapper.size();
    let trs = encode_fst(fst, &mut mapper);
    mapper.write_file(codex_path)?;

    let summary = EncodeSummary {
        trs,
        codes: mapper.size(),
        new_codes: mapper.size() - before,
    };

    if let Some(logger) = logger {
        logger
            .object("Encode")
            .add_field("flags", flags)
            .add_field("reuse", reuse)
            .add_field("codex", codex_path.display())
            .add_field("trs", summary.trs)
            .add_field("codes", summary.codes)
            .add_field("new_codes", summary.new_codes)
            .log(LogLevel::Info);
    }

    Ok(summary)
}

/// Decodes `fst` with the codex stored at `codex_path`.
pub fn decode<F: MutableFst, P: AsRef<Path>>(
    fst: &mut F,
    codex_path: P,
    logger: Option<&Logger>,
) -> Result<usize, EncodeError> {
    let codex_path = codex_path.as_ref();
    let mapper = EncodeMapper::read_file(codex_path)?;

    let trs = match decode_fst(fst, &mapper) {
        Ok(trs) => trs,
        Err(e) => {
            if let Some(logger) = logger {
                logger.error(&format!(
                    "decoding with {} failed: {e}",
                    codex_path.display()
                ));
            }
            return Err(e);
        }
    };

    if let Some(logger) = logger {
        logger
            .object("Decode")
            .add_field("flags", mapper.flags())
            .add_field("codex", codex_path.display())
            .add_field("trs", trs)
            .add_field("codes", mapper.size())
            .log(LogLevel::Info);
    }

    Ok(trs)
}
