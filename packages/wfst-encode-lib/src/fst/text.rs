//! Line-oriented text format for transducers, as printed by `fstprint`.
//!
//! Every line is either a transition or a final state:
//! ```text
//! src dst ilabel olabel [weight]
//! state [final_weight]
//! ```
//! Fields are separated by spaces or tabs. An omitted weight is `one()`.
//! The source state of the first line is the start state. Lines that are
//! empty or start with `#` are skipped.
use nom::{
    Parser,
    branch::alt,
    bytes::complete::is_not,
    character::complete::{space0, space1},
    combinator::{eof, opt},
    error::ParseError,
    sequence::preceded,
};

use crate::{
    config::WeightFormatConfig,
    fst::{Fst, Label, MutableFst, StateId, Tr, VectorFst},
    weight::Weight,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TextLine<'a> {
    Tr {
        src: u32,
        dst: u32,
        ilabel: Label,
        olabel: Label,
        weight: Option<&'a str>,
    },
    Final {
        state: u32,
        weight: Option<&'a str>,
    },
}

impl TextLine<'_> {
    fn source(&self) -> u32 {
        match self {
            TextLine::Tr { src, .. } => *src,
            TextLine::Final { state, .. } => *state,
        }
    }
}

fn number<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, u32, E> {
    nom::character::complete::u32(input)
}

fn weight_token<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    is_not(" \t\r\n").parse(input)
}

fn tr_line<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, TextLine<'a>, E> {
    let (input, src) = number(input)?;
    let (input, _) = space1(input)?;
    let (input, dst) = number(input)?;
    let (input, _) = space1(input)?;
    let (input, ilabel) = number(input)?;
    let (input, _) = space1(input)?;
    let (input, olabel) = number(input)?;
    let (input, weight) = opt(preceded(space1, weight_token)).parse(input)?;
    let (input, _) = (space0, eof).parse(input)?;

    Ok((
        input,
        TextLine::Tr {
            src,
            dst,
            ilabel,
            olabel,
            weight,
        },
    ))
}

fn final_line<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> nom::IResult<&'a str, TextLine<'a>, E> {
    let (input, state) = number(input)?;
    let (input, weight) = opt(preceded(space1, weight_token)).parse(input)?;
    let (input, _) = (space0, eof).parse(input)?;

    Ok((input, TextLine::Final { state, weight }))
}

fn text_line<'a, E: ParseError<&'a str>>(input: &'a str) -> nom::IResult<&'a str, TextLine<'a>, E> {
    alt((tr_line, final_line)).parse(input)
}

#[test]
fn test_tr_line() {
    let (_, line) = text_line::<nom::error::Error<&str>>("0\t1\t3 4 2.5").unwrap();
    assert_eq!(
        line,
        TextLine::Tr {
            src: 0,
            dst: 1,
            ilabel: 3,
            olabel: 4,
            weight: Some("2.5")
        }
    );
}

#[test]
fn test_final_line() {
    let (_, line) = text_line::<nom::error::Error<&str>>("2 (1,3)").unwrap();
    assert_eq!(
        line,
        TextLine::Final {
            state: 2,
            weight: Some("(1,3)")
        }
    );

    let (_, line) = text_line::<nom::error::Error<&str>>("7").unwrap();
    assert_eq!(
        line,
        TextLine::Final {
            state: 7,
            weight: None
        }
    );
}

#[test]
fn test_malformed_line() {
    assert!(text_line::<nom::error::Error<&str>>("0 1 2").is_err());
    assert!(text_line::<nom::error::Error<&str>>("0 1 2 3 4 5").is_err());
    assert!(text_line::<nom::error::Error<&str>>("a 1 2 3").is_err());
}

fn parse_weight<W: Weight>(
    token: Option<&str>,
    config: &WeightFormatConfig,
    line: usize,
) -> anyhow::Result<W> {
    match token {
        Some(t) => W::read_text(t, config)
            .map_err(|e| anyhow::anyhow!("line {line}: bad {} weight: {e}", W::weight_type())),
        None => Ok(W::one()),
    }
}

fn ensure_state<W: Weight>(fst: &mut VectorFst<W>, state: u32) -> StateId {
    while fst.num_states() <= state as usize {
        fst.add_state();
    }
    StateId::new(state as usize)
}

/// Parses a transducer from its text form.
pub fn from_text<W: Weight>(text: &str, config: &WeightFormatConfig) -> anyhow::Result<VectorFst<W>> {
    let mut fst = VectorFst::new();

    for (i, raw) in text.lines().enumerate() {
        let line_number = i + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let (_, line) = text_line::<nom::error::Error<&str>>(content)
            .map_err(|e| anyhow::anyhow!("line {line_number}: malformed line \"{content}\": {e}"))?;

        if fst.start().is_none() {
            let start = ensure_state(&mut fst, line.source());
            fst.set_start(start);
        }

        match line {
            TextLine::Tr {
                src,
                dst,
                ilabel,
                olabel,
                weight,
            } => {
                let weight = parse_weight(weight, config, line_number)?;
                let from = ensure_state(&mut fst, src);
                let to = ensure_state(&mut fst, dst);
                fst.add_tr(from, to, Tr::new(ilabel, olabel, weight));
            }
            TextLine::Final { state, weight } => {
                let weight = parse_weight(weight, config, line_number)?;
                let state = ensure_state(&mut fst, state);
                fst.set_final(state, weight);
            }
        }
    }

    Ok(fst)
}

/// Prints a transducer in text form, start state first. Weights equal to
/// `one()` are omitted. A state without transitions always gets a state
/// line, printed with `zero()` when it is not final, so every state and the
/// start state survive a round trip through [`from_text`].
pub fn to_text<F: Fst>(fst: &F, config: &WeightFormatConfig) -> String {
    let mut out = String::new();
    let Some(start) = fst.start() else {
        return out;
    };

    let states = std::iter::once(start).chain(fst.iter_states().filter(|s| *s != start));
    for state in states {
        let mut has_trs = false;
        for id in fst.outgoing_trs(state) {
            let (Some(tr), Some((_, dst))) = (fst.get_tr(id), fst.tr_endpoints(id)) else {
                continue;
            };
            out.push_str(&format!(
                "{}\t{}\t{}\t{}",
                state.index(),
                dst.index(),
                tr.ilabel,
                tr.olabel
            ));
            if tr.weight != F::W::one() {
                out.push('\t');
                out.push_str(&tr.weight.to_text(config));
            }
            out.push('\n');
            has_trs = true;
        }

        if let Some(weight) = fst.final_weight(state)
            && (*weight != F::W::zero() || !has_trs)
        {
            out.push_str(&state.index().to_string());
            if *weight != F::W::one() {
                out.push('\t');
                out.push_str(&weight.to_text(config));
            }
            out.push('\n');
        }
    }

    out
}
