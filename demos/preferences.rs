//! Builds a small document by hand, reworks it after a reparse, and keeps a
//! preferences structure synchronised with a file.

use cjson::{io, prelude::*};

#[derive(Default)]
struct Chapter {
    contents: String,
    author:   String,
}

impl Describe for Chapter {
    fn describe(&mut self, fields: &mut Fields<'_>) -> Result<()> {
        fields.field("contents", &mut self.contents)?;
        fields.field("author", &mut self.author)?;
        Ok(())
    }
}

#[derive(Default)]
struct Preferences {
    last_folder: String,
    last_open:   u32,
    privileged:  bool,
    info:        Chapter,
    chapters:    Vec<Chapter>,
}

impl Describe for Preferences {
    fn describe(&mut self, fields: &mut Fields<'_>) -> Result<()> {
        fields.field("last_folder", &mut self.last_folder)?;
        fields.field("last_open", &mut self.last_open)?;
        fields.field("privileged", &mut self.privileged)?;
        fields.record("info", &mut self.info)?;
        fields.records("chapters", &mut self.chapters)?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut test_json = Value::new_object();
    test_json.insert("file", "test.json")?;
    test_json.insert("number", 9)?;
    test_json.insert("makes_sense", false)?;
    let mut data = Value::new_array();
    for i in 0..3 {
        let mut obj = Value::new_object();
        obj.insert("index", i)?;
        let mut contents = Value::new_object();
        contents.insert("empty", Value::new_object())?;
        obj.insert("contents", contents)?;
        data.push(obj)?;
    }
    test_json.insert("data", data)?;
    io::save_text(&test_json, "test.json")?;

    let mut reread = io::load_text("test.json")?;
    *reread.at_mut("makes_sense")? = Value::from(true);
    *reread.at_mut("number")? = Value::from(42);
    io::save_text(&reread, "test-reread.json")?;

    let mut prefs = Preferences::default();
    io::load_describable(&mut prefs, "prefs.json")?;
    prefs.chapters.push(Chapter {
        contents: "There will be a lot of chapters".to_string(),
        author:   "You".to_string(),
    });
    io::save_describable(&mut prefs, "prefs.json")?;

    println!("{}", io::load_text("prefs.json")?);
    Ok(())
}
