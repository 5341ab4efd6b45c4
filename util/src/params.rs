//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (REACHER_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$REACHER_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    // Get the params dir
    let mut path = crate::host::get_reacher_sw_root().map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    // Load the file into a string
    let params_str = match read_to_string(path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e)),
    };

    load_from_str(params_str.as_str())
}

/// Parse a parameter struct from the contents of a TOML file.
pub fn load_from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Dummy {
        gain: f64,
        rows: [[f64; 2]; 2],
    }

    #[test]
    fn test_load_from_str() -> Result<(), LoadError> {
        let p: Dummy = load_from_str("gain = 2.5\nrows = [[1.0, 0.0], [0.0, 1.0]]\n")?;

        assert_eq!(
            p,
            Dummy {
                gain: 2.5,
                rows: [[1.0, 0.0], [0.0, 1.0]]
            }
        );

        Ok(())
    }

    #[test]
    fn test_load_from_str_bad_type() {
        let res: Result<Dummy, _> = load_from_str("gain = \"fast\"\nrows = []\n");

        assert!(matches!(res, Err(LoadError::DeserialiseError(_))));
    }
}
