//! Converts files between JSON text and the condensed form, picking the
//! direction from the input extension: `.json` becomes `.cjson`, anything
//! else is treated as condensed and becomes `.json`.

use cjson::{encoding, text};
use std::{fs, path::Path, process::ExitCode};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} file_name", args[0]);
        return ExitCode::from(1);
    }
    match convert(&args[1]) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
    }
}

fn convert(file_name: &str) -> Result<String, String> {
    let path = Path::new(file_name);
    let data =
        fs::read(path).map_err(|_| format!("Cannot read file: {}", file_name))?;

    let is_json = path.extension().map_or(false, |e| e == "json");
    let (output_path, output) = if is_json {
        let value = text::from_slice(&data).map_err(|e| format!("{}: {}", file_name, e))?;
        (path.with_extension("cjson"), encoding::encode_full(&value))
    } else {
        let value =
            encoding::decode_full(&data).map_err(|e| format!("{}: {}", file_name, e))?;
        (path.with_extension("json"), text::to_text(&value).into_bytes())
    };

    fs::write(&output_path, output)
        .map_err(|_| format!("Cannot write file: {}", output_path.display()))?;
    Ok(output_path.display().to_string())
}
