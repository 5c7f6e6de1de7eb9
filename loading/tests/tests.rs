use std::path::PathBuf;
use std::sync::Arc;

use loading::{ClassLoader, ClassLoadingError, ClasspathClassSource, InMemoryClassSource};
use loading::classpath::Classpath;
use rust_jvm_common::classfile::ACC_INTERFACE;
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::test_utils::ClassfileBuilder;
use runtime_class_stuff::class_registry::ClassRegistry;

fn loader(builders: Vec<ClassfileBuilder>) -> ClassLoader {
    let mut source = InMemoryClassSource::new();
    for builder in builders {
        source.add(builder.build()).unwrap();
    }
    ClassLoader::new(Box::new(source), ClassRegistry::new())
}

fn object() -> ClassfileBuilder {
    ClassfileBuilder::new("java/lang/Object")
}

#[test]
fn supers_and_interfaces_load_first() {
    let mut iface = ClassfileBuilder::new("app/Shape");
    iface.extends("java/lang/Object").access_flags(ACC_INTERFACE);
    let mut base = ClassfileBuilder::new("app/Base");
    base.extends("java/lang/Object").field("x", "I", 0);
    let mut sub = ClassfileBuilder::new("app/Sub");
    sub.extends("app/Base").implements("app/Shape").field("y", "J", 0);
    let mut loader = loader(vec![object(), iface, base, sub]);

    let sub = loader.load(&ClassName::new("app/Sub")).unwrap();
    let base = sub.parent.clone().unwrap();
    assert_eq!(base.name, ClassName::new("app/Base"));
    assert!(base.id < sub.id);
    assert_eq!(sub.interfaces[0].name, ClassName::new("app/Shape"));
    assert!(sub.interfaces[0].is_interface());
    assert_eq!(sub.field_group.instance_size, 12);
    assert_eq!(loader.registry().len(), 4);
}

#[test]
fn loads_are_memoized() {
    let mut loader = loader(vec![object()]);
    let first = loader.load(&ClassName::object()).unwrap();
    let second = loader.load(&ClassName::object()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &loader.lookup_id(first.id).unwrap()));
    assert_eq!(loader.registry().len(), 1);
}

#[test]
fn missing_superclass_aborts() {
    let mut orphan = ClassfileBuilder::new("app/Orphan");
    orphan.extends("app/Missing");
    let mut loader = loader(vec![orphan]);
    match loader.load(&ClassName::new("app/Orphan")) {
        Err(ClassLoadingError::ClassNotFound(name)) => assert_eq!(name, ClassName::new("app/Missing")),
        other => panic!("{:?}", other.map(|class| class.name.clone())),
    }
    assert!(loader.registry().is_empty());
}

#[test]
fn circular_superclasses() {
    let mut a = ClassfileBuilder::new("A");
    a.extends("B");
    let mut b = ClassfileBuilder::new("B");
    b.extends("A");
    let mut loader = loader(vec![a, b]);
    assert!(matches!(loader.load(&ClassName::new("A")), Err(ClassLoadingError::ClassCircularity(_))));
}

#[test]
fn array_names_are_not_loadable() {
    let mut loader = loader(vec![]);
    assert!(matches!(loader.load(&ClassName::new("[I")), Err(ClassLoadingError::ArrayClass(_))));
}

fn temp_classpath(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("loading-test-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(dir.join("app/nested")).unwrap();
    dir
}

#[test]
fn classpath_search_order() {
    let first = temp_classpath("first");
    let second = temp_classpath("second");
    std::fs::write(second.join("app/nested/Thing.class"), b"second").unwrap();
    std::fs::write(second.join("app/Thing.class"), b"second").unwrap();
    std::fs::write(first.join("app/nested/Thing.class"), b"first").unwrap();
    let classpath = Classpath::from_roots(vec![first.clone(), second.clone()]);

    let found = classpath.lookup(&ClassName::from_binary_name("app.nested.Thing")).unwrap();
    assert_eq!(found, first.join("app/nested/Thing.class"));
    let found = classpath.lookup(&ClassName::new("app/Thing")).unwrap();
    assert_eq!(found, second.join("app/Thing.class"));
    assert!(classpath.lookup(&ClassName::new("Thing")).is_none());

    let mut shallow = classpath.clone();
    shallow.max_depth = 1;
    assert!(shallow.lookup(&ClassName::new("app/Thing")).is_none());

    let source = ClasspathClassSource::new(classpath);
    let mut loader = ClassLoader::new(Box::new(source), ClassRegistry::new());
    assert!(matches!(loader.load(&ClassName::new("app/Thing")), Err(ClassLoadingError::Malformed { .. })));
    assert!(matches!(loader.load(&ClassName::new("app/Nope")), Err(ClassLoadingError::ClassNotFound(_))));

    std::fs::remove_dir_all(first).unwrap();
    std::fs::remove_dir_all(second).unwrap();
}
