use crate::models::error::Error;
use semver::Version;

/// Parses a version string, tolerating missing minor/patch components:
/// "2" and "1.4" become "2.0.0" and "1.4.0". Mod authors rarely write
/// full semver triples by hand.
pub fn parse_version(input: &str) -> Result<Version, Error> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::ParseError("empty version string".to_string()));
    }

    let padded = match input.matches('.').count() {
        0 => format!("{input}.0.0"),
        1 => format!("{input}.0"),
        _ => input.to_string(),
    };

    Version::parse(&padded).map_err(|e| Error::ParseError(format!("invalid version '{input}': {e}")))
}
