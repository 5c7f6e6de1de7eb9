use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;

use rust_jvm_common::classnames::ClassName;

use crate::JVMArgs;

#[test]
fn defaults() {
    let args = JVMArgs::try_parse_from(["java", "-m", "Main"]).unwrap();
    assert_eq!(args.main_class_name(), ClassName::new("Main"));
    assert_eq!(args.log_level(), LevelFilter::Info);
    assert_eq!(args.heap_size, 64 * 1024 * 1024);
    assert!(!args.trace_instructions);
    let classpath = args.classpath();
    assert!(classpath.classpath_base.is_empty());
    assert_eq!(classpath.max_depth, 32);
}

#[test]
fn runtime_roots_come_first() {
    let args = JVMArgs::try_parse_from([
        "java",
        "-c", "app",
        "--runtime-classpath", "rt",
        "--classpath", "lib",
        "--classpath-depth", "4",
        "--main", "com.example.Main",
        "--log-level", "trace",
    ]).unwrap();
    let classpath = args.classpath();
    let roots = classpath.classpath_base.iter().map(|root| root.to_path_buf()).collect::<Vec<PathBuf>>();
    assert_eq!(roots, vec![Path::new("rt").to_path_buf(), Path::new("app").to_path_buf(), Path::new("lib").to_path_buf()]);
    assert_eq!(classpath.max_depth, 4);
    assert_eq!(args.main_class_name(), ClassName::new("com/example/Main"));
    assert_eq!(args.log_level(), LevelFilter::Trace);
}

#[test]
fn main_is_required() {
    assert!(JVMArgs::try_parse_from(["java", "-c", "app"]).is_err());
}

#[test]
fn heap_size_must_be_a_number() {
    assert!(JVMArgs::try_parse_from(["java", "-m", "Main", "--heap-size", "lots"]).is_err());
}
