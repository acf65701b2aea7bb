//! Parsers for the TGA file header
use nom::{
    combinator::map,
    error::ParseError,
    number::complete::{le_u16, le_u8},
    sequence::tuple,
    Finish, IResult,
};

use crate::{RawHeader, TgaError};

/// Parse the fixed 18 byte header
pub fn p_tga_header<'a, E: ParseError<&'a [u8]>>(
    input: &'a [u8],
) -> IResult<&'a [u8], RawHeader, E> {
    map(
        tuple((
            le_u8, le_u8, le_u8, le_u16, le_u16, le_u8, le_u16, le_u16, le_u16, le_u16, le_u8,
            le_u8,
        )),
        |(
            id_length,
            color_map_type,
            data_type,
            color_map_origin,
            color_map_length,
            color_map_depth,
            x_origin,
            y_origin,
            width,
            height,
            bits_per_pixel,
            image_descriptor,
        )| RawHeader {
            id_length,
            color_map_type,
            data_type,
            color_map_origin,
            color_map_length,
            color_map_depth,
            x_origin,
            y_origin,
            width,
            height,
            bits_per_pixel,
            image_descriptor,
        },
    )(input)
}

/// Read the header at the start of `input`
pub fn parse_header(input: &[u8]) -> Result<RawHeader, TgaError> {
    let (_, header) = p_tga_header::<nom::error::Error<&[u8]>>(input)
        .finish()
        .map_err(|_| TgaError::TruncatedHeader)?;
    Ok(header)
}
