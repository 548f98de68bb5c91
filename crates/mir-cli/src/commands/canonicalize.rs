//! Canonicalize command implementation.

use mir_canonical::canonical_string;

use crate::output::read_json_input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json_input(input)?;
    let canonical =
        canonical_string(&value).map_err(|e| format!("Canonicalization failed: {}", e))?;
    println!("{}", canonical);
    Ok(())
}
