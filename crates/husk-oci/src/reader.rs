//! Bundle config reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use husk_common::HuskResult;

use crate::runtime::Spec;

/// Decode an OCI runtime spec from `path`.
///
/// The file handle is opened and closed within this call; there is no
/// retry.
///
/// # Errors
///
/// [`HuskError::Io`](husk_common::HuskError::Io) when the file cannot be
/// opened, [`HuskError::Decode`](husk_common::HuskError::Decode) when the
/// document is not well-formed JSON or does not match the spec shape.
pub fn read_config_file(path: impl AsRef<Path>) -> HuskResult<Spec> {
    let file = File::open(path.as_ref())?;
    read_config(BufReader::new(file))
}

/// Decode an OCI runtime spec from an open reader.
///
/// # Errors
///
/// [`HuskError::Decode`](husk_common::HuskError::Decode) when the document
/// is not well-formed JSON or does not match the spec shape.
pub fn read_config<R: Read>(input: R) -> HuskResult<Spec> {
    Ok(serde_json::from_reader(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use husk_common::HuskError;

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "hostname": "bean", "root": { "path": "rootfs" } }"#,
        )
        .unwrap();

        let spec = read_config_file(&path).unwrap();
        assert_eq!(spec.hostname, "bean");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_config_file("/no/such/bundle/config.json").unwrap_err();
        assert!(matches!(err, HuskError::Io(_)));
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = read_config("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, HuskError::Decode(_)));
    }

    #[test]
    fn shape_mismatch_is_decode_error() {
        // hostname must be a string
        let err = read_config(r#"{ "hostname": 7 }"#.as_bytes()).unwrap_err();
        assert!(matches!(err, HuskError::Decode(_)));
    }
}
