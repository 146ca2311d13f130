//! CSV to import JSON conversion

pub mod csv;
pub mod json;

pub use self::csv::*;
pub use self::json::*;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// Open a file for reading, or stdin for `-`
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>> {
    let path = path.as_ref();
    if path == Path::new("-") {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Read a whole file, or stdin for `-`, into a string
pub fn read_input<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut text = String::new();
    open_input(path)?.read_to_string(&mut text)?;
    Ok(text)
}
