//! Example: build a styled document and round-trip it through JSON

use quire::{Color, Config, Length, Node, Value};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let registries = quire::init(Config::default().with_pretty_json(true))?;

    let doc = Node::new_style(
        vec![
            Node::new_text("Hello, "),
            Node::new_placeholder("name"),
            Node::new_text("!"),
        ],
        registries.style([
            ("textColor", Value::new(Color::rgb(0x33, 0x33, 0x33))),
            ("fontSize", Value::new(Length::px(14.0))),
        ])?,
    );

    let text = registries.to_string(&doc)?;
    println!("{text}");

    let back = registries.from_str(&text)?;
    assert_eq!(back, doc);
    println!("Round trip OK: {:?}", back.text());
    Ok(())
}
