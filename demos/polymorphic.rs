//! Saves and restores variants of a tagged structure through an explicit
//! constructor registry.

use cjson::prelude::*;

#[derive(Default, Debug, PartialEq)]
enum Payload {
    #[default]
    Empty,
    Text(String),
    Quantity(f64),
}

#[derive(Default, Debug, PartialEq)]
struct Content {
    fullscreen: bool,
    payload:    Payload,
}

impl Content {
    fn text(value: &str) -> Content {
        Content {
            fullscreen: false,
            payload:    Payload::Text(value.to_string()),
        }
    }

    fn quantity(value: f64) -> Content {
        Content {
            fullscreen: true,
            payload:    Payload::Quantity(value),
        }
    }
}

impl Describe for Content {
    fn describe(&mut self, fields: &mut Fields<'_>) -> Result<()> {
        fields.field("fullscreen", &mut self.fullscreen)?;
        match &mut self.payload {
            Payload::Empty => {}
            Payload::Text(value) => {
                fields.tag("c1")?;
                fields.field("value", value)?;
            }
            Payload::Quantity(value) => {
                fields.tag("c2")?;
                fields.field("value", value)?;
            }
        }
        Ok(())
    }
}

fn registry() -> Factory<Content> {
    let mut factory = Factory::new();
    factory.register("c1", || Content::text(""));
    factory.register("c2", || Content::quantity(0.0));
    factory
}

fn main() -> Result<()> {
    let factory = registry();

    let mut contents = vec![Content::text("hello"), Content::quantity(1.5)];
    let mut saved = Value::new_array();
    for content in &mut contents {
        saved.push(save(content)?)?;
    }

    let text = to_text(&saved);
    println!("{}", text);

    let reloaded = from_text(&text)?;
    for (i, item) in reloaded.as_array()?.iter().enumerate() {
        let restored = factory.load(item)?;
        assert_eq!(restored, contents[i]);
        println!("restored #{}: {:?}", i, restored);
    }
    Ok(())
}
