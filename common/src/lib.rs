use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::normalize_string::NormalizeString;

pub mod bit_buffer2;
pub mod buffer2;
pub mod file_format;
pub mod normalize_string;

pub use bit_buffer2::BitBuffer2;
pub use buffer2::Buffer2;
pub use file_format::{FileExtensionError, SerdeFormat};

#[derive(Debug, thiserror::Error)]
pub enum SerdeFormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

pub type SerdeFormatResult<T> = Result<T, SerdeFormatError>;

pub fn serialize<T: Serialize>(value: &T, format: SerdeFormat) -> SerdeFormatResult<String> {
    let text = match format {
        SerdeFormat::Yaml => serde_yml::to_string(value)?,
        SerdeFormat::Json => serde_json::to_string_pretty(value)?,
    };
    Ok(text.normalize())
}

pub fn deserialize<T: DeserializeOwned>(
    serialized: &str,
    format: SerdeFormat,
) -> SerdeFormatResult<T> {
    match format {
        SerdeFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
        SerdeFormat::Json => Ok(serde_json::from_str(serialized)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Params {
        radius: usize,
        sigma: f32,
    }

    #[test]
    fn test_serialize_deserialize_each_format() {
        let params = Params {
            radius: 3,
            sigma: 2.5,
        };
        for format in SerdeFormat::all_formats_for_testing() {
            let text = serialize(&params, format).unwrap();
            assert!(text.ends_with('\n'), "{format:?} output not normalized");
            let back: Params = deserialize(&text, format).unwrap();
            assert_eq!(back, params);
        }
    }

    #[test]
    fn test_deserialize_error_kind() {
        let err = deserialize::<Params>("{ not json", SerdeFormat::Json).unwrap_err();
        assert!(matches!(err, SerdeFormatError::Json(_)));
    }
}
