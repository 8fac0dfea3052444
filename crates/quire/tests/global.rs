//! Process-wide registries

use quire::{Config, Error, Node};

#[test]
fn test_init_once() {
    assert!(matches!(quire::registries(), Err(Error::NotInitialized)));

    let registries = quire::init(Config::default()).unwrap();
    let json = registries.to_json(&Node::new_text("hi")).unwrap();
    assert_eq!(quire::registries().unwrap().from_json(&json).unwrap(), Node::new_text("hi"));

    assert!(matches!(quire::init(Config::default()), Err(Error::AlreadyInitialized)));
}
