use std::error::Error;
use std::fmt::{self, Display};

use esp_idf_svc::sys::EspError;

/// Error with a static message only.
#[derive(Debug)]
pub struct StringError(pub &'static str);

impl Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for StringError {}

/// `EspError` wrapped with a static context message.
#[derive(Debug)]
pub struct StringEspError(pub &'static str, pub EspError);

impl Display for StringEspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.1)
    }
}

impl Error for StringEspError {}
