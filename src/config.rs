use std::env;
use std::fmt::Debug;
use std::str::FromStr;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Returns the value of the named environment variable, if it is set.
pub fn get_optional_variable(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Parses the named environment variable, falling back to `default` if
/// it isn't set. Panics if it is set but doesn't parse.
pub fn parse_variable_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match get_optional_variable(name) {
        Some(value) => value
            .parse()
            .unwrap_or_else(|e| panic!("parse {} ({:?}): {:?}", name, value, e)),
        None => default,
    }
}
