//! Mapping raw export filenames to the solid names written into normalized
//! files. Downstream dictionaries refer to solids by these names, so the
//! mapping has to be stable for a given filename.

use crate::error::StlError;

pub const DEFAULT_RAW_SUFFIX: &str = "_pre_formatted";

/// `raw filename -> entity name`.
pub trait EntityNameResolver {
    fn resolve(&self, raw_filename: &str) -> Result<String, StlError>;
}

impl<F> EntityNameResolver for F
where
    F: Fn(&str) -> Result<String, StlError>,
{
    fn resolve(&self, raw_filename: &str) -> Result<String, StlError> {
        self(raw_filename)
    }
}

/// Strips `<suffix>.stl` from the base filename, splits the remainder on
/// `delimiter` and takes the token at `index`.
///
/// With the defaults `bc_inlet_pre_formatted.stl` resolves to `inlet`.
#[derive(Debug, Clone)]
pub struct SuffixTokenResolver {
    pub suffix: String,
    pub delimiter: char,
    pub index: usize,
}

impl Default for SuffixTokenResolver {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_RAW_SUFFIX.to_string(),
            delimiter: '_',
            index: 1,
        }
    }
}

impl SuffixTokenResolver {
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..Self::default()
        }
    }
}

impl EntityNameResolver for SuffixTokenResolver {
    fn resolve(&self, raw_filename: &str) -> Result<String, StlError> {
        let base = base_name(raw_filename);
        let stem = strip_raw_suffix(base, &self.suffix).ok_or_else(|| {
            StlError::naming(base, format!("expected suffix {:?}", format!("{}.stl", self.suffix)))
        })?;

        match stem.split(self.delimiter).nth(self.index) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(StlError::naming(
                base,
                format!("no token {} after splitting on {:?}", self.index, self.delimiter),
            )),
        }
    }
}

/// `bc_inlet_pre_formatted.stl` -> `bc_inlet.stl`.
pub fn normalized_filename(raw_filename: &str, suffix: &str) -> Result<String, StlError> {
    let base = base_name(raw_filename);
    strip_raw_suffix(base, suffix)
        .map(|stem| format!("{stem}.stl"))
        .ok_or_else(|| StlError::naming(base, format!("expected suffix {:?}", format!("{suffix}.stl"))))
}

/// `bc` + `inlet` + `_pre_formatted` -> `bc_inlet_pre_formatted.stl`.
pub fn raw_filename(prefix: &str, entity: &str, suffix: &str) -> String {
    format!("{prefix}_{entity}{suffix}.stl")
}

fn strip_raw_suffix<'a>(base: &'a str, suffix: &str) -> Option<&'a str> {
    base.strip_suffix(".stl")?.strip_suffix(suffix)
}

fn base_name(filename: &str) -> &str {
    filename.rsplit(&['/', '\\'][..]).next().unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resolver_takes_second_token() {
        let r = SuffixTokenResolver::default();
        assert_eq!("inlet", r.resolve("bc_inlet_pre_formatted.stl").unwrap());
        assert_eq!("entry", r.resolve("some/dir/block_entry_pre_formatted.stl").unwrap());
        // Only the second token survives; names with underscores get cut.
        assert_eq!("side", r.resolve("bc_side_wall_pre_formatted.stl").unwrap());
    }

    #[test]
    fn default_resolver_rejects_unexpected_names() {
        let r = SuffixTokenResolver::default();
        assert!(r.resolve("bc_inlet.stl").is_err());
        assert!(r.resolve("inlet_pre_formatted.stl").is_err());
    }

    #[test]
    fn closures_are_resolvers() {
        let r = |name: &str| -> Result<String, StlError> { Ok(name.to_uppercase()) };
        assert_eq!("A.STL", r.resolve("a.stl").unwrap());
    }

    #[test]
    fn normalized_name_drops_suffix() {
        assert_eq!(
            "bc_inlet.stl",
            normalized_filename("bc_inlet_pre_formatted.stl", DEFAULT_RAW_SUFFIX).unwrap()
        );
        assert_eq!(
            "bc_inlet_pre_formatted.stl",
            raw_filename("bc", "inlet", DEFAULT_RAW_SUFFIX)
        );
    }
}
