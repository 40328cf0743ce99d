use crate::consts::save_format::{MAP_PREFIX, META_PREFIXES, SEPARATOR};

/// What a file of the save directory holds, judging by its name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFile {
    /// `map_<X>_<Y>.<ext>`, one 10x10 tile cell. Coordinates are map file coordinates.
    Map { x: i64, y: i64 },
    /// `chunkdata_<X>_<Y>.<ext>` or `zpop_<X>_<Y>.<ext>`. Coordinates are chunk coordinates.
    Meta { x: i64, y: i64 },
    Unrecognized,
}

/// Classifies a file name. Anything that does not match a known pattern, or whose coordinates
/// are not integers, is [`SaveFile::Unrecognized`].
pub fn classify(file_name: &str) -> SaveFile {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => file_name,
    };

    let parts: Vec<&str> = stem.split(SEPARATOR).collect();
    let &[prefix, x, y] = parts.as_slice() else {
        return SaveFile::Unrecognized;
    };

    let (Ok(x), Ok(y)) = (x.parse::<i64>(), y.parse::<i64>()) else {
        return SaveFile::Unrecognized;
    };

    if prefix == MAP_PREFIX {
        SaveFile::Map { x, y }
    } else if META_PREFIXES.contains(&prefix) {
        SaveFile::Meta { x, y }
    } else {
        SaveFile::Unrecognized
    }
}
