// Reading and writing binary PPM (P6) images.
//
// Header layout:
//
// ```text
// P6                  -- image format
// # comment           -- any number of comment lines
// 200 300             -- width and height
// 255                 -- max color value
// ```
//
// followed by exactly one whitespace byte and width * height packed r, g, b
// triples in scanline order. That byte may not be a carriage return, or the
// `\n` of a CRLF header would be read as payload.

use crate::error::{DecodeError, DetectorError};
use laplacian::image::CHANNELS;
use laplacian::{FilterError, Image};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const MAGIC: &str = "P6";
pub const MAX_CHANNEL_VALUE: u32 = 255;

// longest header token we bother reading before giving up on it
const MAX_TOKEN_LEN: usize = 20;

pub fn read_image(path: &Path) -> Result<Image, DetectorError> {
    let file = File::open(path).map_err(|err| DetectorError::io(path, err))?;

    // the file is open, so a read failure is a decode error for this image
    decode(BufReader::new(file)).map_err(|source| DetectorError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_image(image: &Image, path: &Path) -> Result<(), DetectorError> {
    let file = File::create(path).map_err(|err| DetectorError::io(path, err))?;
    let mut writer = BufWriter::new(file);

    encode(image, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|err| DetectorError::io(path, err))
}

pub fn decode<R: BufRead>(mut reader: R) -> Result<Image, DecodeError> {
    let magic = read_token(&mut reader)?;
    if magic != MAGIC {
        return Err(DecodeError::Format { found: magic });
    }

    let width: usize = read_field(&mut reader, "width")?;
    let height: usize = read_field(&mut reader, "height")?;
    let max: u32 = read_field(&mut reader, "max color value")?;

    if max != MAX_CHANNEL_VALUE {
        return Err(DecodeError::Range { max });
    }
    if width == 0 || height == 0 {
        return Err(DecodeError::MalformedHeader(format!(
            "image dimensions {width}x{height} must be nonzero"
        )));
    }

    let expected = width
        .checked_mul(height)
        .and_then(|count| count.checked_mul(CHANNELS))
        .ok_or_else(|| {
            DecodeError::MalformedHeader(format!("image dimensions {width}x{height} are too large"))
        })?;

    // exactly one whitespace byte ends the header
    match next_byte(&mut reader)? {
        Some(b'\r') => {
            return Err(DecodeError::MalformedHeader(
                "carriage return after max color value".to_string(),
            ));
        }
        Some(byte) if byte.is_ascii_whitespace() => {}
        Some(byte) => {
            return Err(DecodeError::MalformedHeader(format!(
                "unexpected byte {byte:#04x} after max color value"
            )));
        }
        None => return Err(DecodeError::Truncated { expected, actual: 0 }),
    }

    // grows with the bytes actually present, not the declared size
    let mut data = Vec::new();
    reader.take(expected as u64).read_to_end(&mut data)?;

    if data.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    Image::from_rgb_bytes(width, height, &data).map_err(|err| match err {
        FilterError::Allocation { .. } => DecodeError::Allocation { bytes: expected },
        other => DecodeError::MalformedHeader(other.to_string()),
    })
}

pub fn encode<W: Write>(image: &Image, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{MAGIC}")?;
    writeln!(writer, "{} {}", image.width(), image.height())?;
    writeln!(writer, "{MAX_CHANNEL_VALUE}")?;

    for pixel in image.pixels() {
        writer.write_all(&pixel.channels())?;
    }

    Ok(())
}

fn read_field<R: BufRead, T: std::str::FromStr>(reader: &mut R, name: &str) -> Result<T, DecodeError> {
    skip_separators(reader)?;
    let token = read_token(reader)?;

    if token.is_empty() {
        return Err(DecodeError::MalformedHeader(format!("missing {name}")));
    }
    token
        .parse()
        .map_err(|_| DecodeError::MalformedHeader(format!("invalid {name} '{token}'")))
}

// whitespace and whole `#` comment lines
fn skip_separators<R: BufRead>(reader: &mut R) -> io::Result<()> {
    while let Some(byte) = peek_byte(reader)? {
        if byte == b'#' {
            let mut comment = Vec::new();
            reader.read_until(b'\n', &mut comment)?;
        } else if byte.is_ascii_whitespace() {
            reader.consume(1);
        } else {
            break;
        }
    }
    Ok(())
}

// stops at (without consuming) the first whitespace byte
fn read_token<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut token = Vec::new();

    while let Some(byte) = peek_byte(reader)? {
        if byte.is_ascii_whitespace() || token.len() == MAX_TOKEN_LEN {
            break;
        }
        token.push(byte);
        reader.consume(1);
    }

    Ok(String::from_utf8_lossy(&token).into_owned())
}

fn peek_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    let byte = peek_byte(reader)?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}
