//! Little-endian primitives shared by weight and codex binary I/O.

use std::io::{self, Read, Write};

pub fn write_i32<W: Write + ?Sized>(out: &mut W, value: i32) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

pub fn write_u32<W: Write + ?Sized>(out: &mut W, value: u32) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

pub fn write_u64<W: Write + ?Sized>(out: &mut W, value: u64) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

pub fn write_f32<W: Write + ?Sized>(out: &mut W, value: f32) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

/// Writes a `u32` byte length followed by the UTF-8 bytes.
pub fn write_string<W: Write + ?Sized>(out: &mut W, value: &str) -> io::Result<()> {
    let len = u32::try_from(value.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;
    write_u32(out, len)?;
    out.write_all(value.as_bytes())
}

fn read_array<const N: usize, R: Read + ?Sized>(input: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    input.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_i32<R: Read + ?Sized>(input: &mut R) -> io::Result<i32> {
    Ok(i32::from_le_bytes(read_array(input)?))
}

pub fn read_u32<R: Read + ?Sized>(input: &mut R) -> io::Result<u32> {
    Ok(u32::from_le_bytes(read_array(input)?))
}

pub fn read_u64<R: Read + ?Sized>(input: &mut R) -> io::Result<u64> {
    Ok(u64::from_le_bytes(read_array(input)?))
}

pub fn read_f32<R: Read + ?Sized>(input: &mut R) -> io::Result<f32> {
    Ok(f32::from_le_bytes(read_array(input)?))
}

/// Reads a string written by [`write_string`]. The buffer grows with the
/// bytes actually present, so a corrupt length fails instead of allocating.
pub fn read_string<R: Read + ?Sized>(input: &mut R) -> io::Result<String> {
    let len = read_u32(input)? as usize;
    let mut buf = Vec::new();
    input.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("string of {len} bytes is truncated after {}", buf.len()),
        ));
    }
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[test]
fn test_string_layout() {
    let mut buf = Vec::new();
    write_string(&mut buf, "log").unwrap();
    assert_eq!(buf, vec![3, 0, 0, 0, b'l', b'o', b'g']);
    assert_eq!(read_string(&mut buf.as_slice()).unwrap(), "log");
}

#[test]
fn test_truncated_input() {
    let buf = [1u8, 0];
    assert!(read_u32(&mut buf.as_slice()).is_err());
}

#[test]
fn test_truncated_string() {
    let mut buf = Vec::new();
    write_u32(&mut buf, u32::MAX).unwrap();
    buf.extend_from_slice(b"log");
    let err = read_string(&mut buf.as_slice()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}
