#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use tilebound_core::{LevelSnapshot, GRID_COLUMNS, GRID_ROWS};

const SNAPSHOT_DOMAIN: &str = "tilebound";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const SNAPSHOT_HEADER: &str = "tilebound:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the level into a single-line string suitable for the save slot.
#[must_use]
pub(crate) fn encode(level: &LevelSnapshot) -> String {
    let json = serde_json::to_vec(level).expect("level snapshot serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{SNAPSHOT_HEADER}:{GRID_COLUMNS}x{GRID_ROWS}:{encoded}")
}

/// Decodes a level from the provided string representation.
///
/// The declared grid dimensions must match the fixed session grid; payloads
/// captured against any other grid shape are rejected before the JSON body
/// is touched.
pub(crate) fn decode(value: &str) -> Result<LevelSnapshot, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != SNAPSHOT_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SNAPSHOT_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    if columns != GRID_COLUMNS || rows != GRID_ROWS {
        return Err(LevelTransferError::DimensionMismatch { columns, rows });
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)
}

/// Errors that can occur while decoding level transfer strings.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded level.
    MissingPrefix,
    /// The encoded level did not contain a version segment.
    MissingVersion,
    /// The encoded level did not include grid dimensions.
    MissingDimensions,
    /// The encoded level did not include the payload segment.
    MissingPayload,
    /// The encoded level used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded level used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded level.
    InvalidDimensions(String),
    /// The declared grid dimensions do not match the session grid.
    DimensionMismatch {
        /// Declared column count.
        columns: u32,
        /// Declared row count.
        rows: u32,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "save payload was empty"),
            Self::MissingPrefix => write!(f, "level string is missing the prefix"),
            Self::MissingVersion => write!(f, "level string is missing the version"),
            Self::MissingDimensions => write!(f, "level string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "level string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "level prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "level version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::DimensionMismatch { columns, rows } => {
                write!(
                    f,
                    "level was captured for a {columns}x{rows} grid; expected {GRID_COLUMNS}x{GRID_ROWS}"
                )
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode level payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse level payload: {error}")
            }
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LevelTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LevelTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LevelTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LevelTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(LevelTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilebound_core::{CellCoord, LayerName, LayerSnapshot, SheetKey, TileRef};

    fn empty_cells() -> Vec<Option<TileRef>> {
        vec![None; (GRID_COLUMNS * GRID_ROWS) as usize]
    }

    fn cell_index(cell: CellCoord) -> usize {
        (cell.row() * GRID_COLUMNS + cell.column()) as usize
    }

    fn single_layer_level() -> LevelSnapshot {
        LevelSnapshot {
            layers: vec![LayerSnapshot {
                name: LayerName::new("foreground"),
                visible: true,
                sheet: SheetKey::Foreground,
                cells: empty_cells(),
            }],
        }
    }

    #[test]
    fn round_trip_empty_level() {
        let level = single_layer_level();

        let encoded = encode(&level);
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:20x12:")));

        let decoded = decode(&encoded).expect("level decodes");
        assert_eq!(level, decoded);
    }

    #[test]
    fn round_trip_populated_level() {
        let mut cells = empty_cells();
        cells[cell_index(CellCoord::new(3, 9))] = Some(TileRef::new(64, 0, SheetKey::Foreground));
        cells[cell_index(CellCoord::new(4, 9))] = Some(TileRef::new(128, 64, SheetKey::Foreground));
        let level = LevelSnapshot {
            layers: vec![
                LayerSnapshot {
                    name: LayerName::new("background"),
                    visible: false,
                    sheet: SheetKey::Background,
                    cells: empty_cells(),
                },
                LayerSnapshot {
                    name: LayerName::new("foreground"),
                    visible: true,
                    sheet: SheetKey::Foreground,
                    cells,
                },
            ],
        };

        let encoded = encode(&level);
        let decoded = decode(&encoded).expect("level decodes");
        assert_eq!(level, decoded);
    }

    #[test]
    fn decode_trims_surrounding_whitespace() {
        let level = single_layer_level();
        let encoded = format!("  {}\n", encode(&level));

        let decoded = decode(&encoded).expect("padded level decodes");
        assert_eq!(level, decoded);
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert!(matches!(
            decode("   "),
            Err(LevelTransferError::EmptyPayload)
        ));
    }

    #[test]
    fn decode_rejects_foreign_prefixes_and_versions() {
        assert!(matches!(
            decode("sokoban:v1:20x12:e30"),
            Err(LevelTransferError::InvalidPrefix(prefix)) if prefix == "sokoban"
        ));
        assert!(matches!(
            decode("tilebound:v2:20x12:e30"),
            Err(LevelTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
    }

    #[test]
    fn decode_rejects_malformed_dimensions() {
        assert!(matches!(
            decode("tilebound:v1:20by12:e30"),
            Err(LevelTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            decode("tilebound:v1:0x12:e30"),
            Err(LevelTransferError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn decode_rejects_foreign_grid_shapes() {
        assert!(matches!(
            decode("tilebound:v1:19x12:e30"),
            Err(LevelTransferError::DimensionMismatch {
                columns: 19,
                rows: 12,
            })
        ));
    }

    #[test]
    fn decode_rejects_corrupt_payloads() {
        assert!(matches!(
            decode("tilebound:v1:20x12:!!!not-base64!!!"),
            Err(LevelTransferError::InvalidEncoding(_))
        ));

        let garbage = STANDARD_NO_PAD.encode(b"not json at all");
        assert!(matches!(
            decode(&format!("tilebound:v1:20x12:{garbage}")),
            Err(LevelTransferError::InvalidPayload(_))
        ));
    }
}
