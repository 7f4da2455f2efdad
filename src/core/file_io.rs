use std::path::Path;

use serde::de::DeserializeOwned;

/// Reads and parses a JSON parameter file.
pub fn read_json_params<T, P>(path: P) -> Result<T, Box<dyn std::error::Error>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|err| format!("Unable to read param file {}: {}", path.display(), err))?;
    let params = serde_json::from_str(&contents)
        .map_err(|err| format!("Unable to parse param file {}: {}", path.display(), err))?;
    Ok(params)
}
