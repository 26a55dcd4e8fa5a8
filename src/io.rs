//! Thin filesystem wrappers over the codecs. The core types perform no I/O
//! of their own; everything here composes a read or write of a whole file
//! with one codec call.

use crate::{
    encoding,
    errors::Result,
    rep::{self, Describe},
    text, Value,
};
use std::{fs, path::Path};

/// Writes a value to a file as JSON text.
pub fn save_text(value: &Value, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, text::to_text(value))?;
    Ok(())
}

/// Reads a file as JSON text.
pub fn load_text(path: impl AsRef<Path>) -> Result<Value> {
    let data = fs::read(path)?;
    text::from_slice(&data)
}

/// Writes a value to a file in the condensed form.
pub fn save_condensed(value: &Value, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, encoding::encode_full(value))?;
    Ok(())
}

/// Reads a file in the condensed form.
pub fn load_condensed(path: impl AsRef<Path>) -> Result<Value> {
    let data = fs::read(path)?;
    encoding::decode_full(&data)
}

/// Saves a described structure to a file as JSON text.
pub fn save_describable<T: Describe>(value: &mut T, path: impl AsRef<Path>) -> Result<()> {
    let made = rep::save(value)?;
    save_text(&made, path)
}

/// Saves a described structure to a file in the condensed form.
pub fn save_describable_condensed<T: Describe>(value: &mut T, path: impl AsRef<Path>) -> Result<()> {
    let made = rep::save(value)?;
    save_condensed(&made, path)
}

/// Loads a described structure from a condensed file.
pub fn load_describable_condensed<T: Describe>(value: &mut T, path: impl AsRef<Path>) -> Result<()> {
    let source = load_condensed(path)?;
    rep::load_into(value, &source)
}

/// Loads a described structure from a JSON text file.
///
/// Returns `Ok(false)` without touching the structure when the file does not
/// exist or holds nothing, so freshly constructed preferences survive a
/// missing file.
pub fn load_describable<T: Describe>(value: &mut T, path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    let source = load_text(path)?;
    if source.is_null() {
        return Ok(false);
    }
    rep::load_into(value, &source)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch(name: &str) -> std::path::PathBuf {
        let mut path = env::temp_dir();
        path.push(format!("cjson-io-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn text_files_round_trip() {
        let path = scratch("text.json");
        let mut obj = Value::new_object();
        obj.insert("a", vec![1, 2]).unwrap();

        save_text(&obj, &path).unwrap();
        assert_eq!(load_text(&path).unwrap(), obj);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn condensed_files_round_trip() {
        let path = scratch("data.cjson");
        let value = Value::from(vec![1, 2, 3]);

        save_condensed(&value, &path).unwrap();
        assert_eq!(load_condensed(&path).unwrap(), value);
        fs::remove_file(&path).unwrap();
    }

    #[derive(Default, PartialEq, Debug)]
    struct Settings {
        threshold: f64,
        tags:      Vec<String>,
    }
    impl Describe for Settings {
        fn describe(&mut self, fields: &mut crate::rep::Fields<'_>) -> Result<()> {
            fields.field("threshold", &mut self.threshold)?;
            fields.field("tags", &mut self.tags)?;
            Ok(())
        }
    }

    #[test]
    fn describables_round_trip_through_files() {
        let text_path = scratch("settings.json");
        let bin_path = scratch("settings.cjson");

        let mut settings = Settings {
            threshold: 0.5,
            tags:      vec!["a".to_string(), "b".to_string()],
        };

        save_describable(&mut settings, &text_path).unwrap();
        let mut from_file = Settings::default();
        assert!(load_describable(&mut from_file, &text_path).unwrap());
        assert_eq!(from_file, settings);

        save_describable_condensed(&mut settings, &bin_path).unwrap();
        let mut from_binary = Settings::default();
        load_describable_condensed(&mut from_binary, &bin_path).unwrap();
        assert_eq!(from_binary, settings);

        fs::remove_file(&text_path).unwrap();
        fs::remove_file(&bin_path).unwrap();
    }

    #[test]
    fn missing_files_leave_describables_alone() {
        #[derive(Default)]
        struct Prefs {
            count: u32,
        }
        impl Describe for Prefs {
            fn describe(&mut self, fields: &mut crate::rep::Fields<'_>) -> Result<()> {
                fields.field("count", &mut self.count)?;
                Ok(())
            }
        }

        let mut prefs = Prefs { count: 4 };
        let loaded = load_describable(&mut prefs, scratch("absent.json")).unwrap();
        assert!(!loaded);
        assert_eq!(prefs.count, 4);
    }
}
