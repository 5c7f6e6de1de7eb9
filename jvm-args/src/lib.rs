use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use loading::classpath::{Classpath, DEFAULT_MAX_DEPTH};
use rust_jvm_common::classnames::ClassName;
use slow_interpreter::options::{DEFAULT_HEAP_SIZE, JVMOptions};

#[derive(Parser, Debug, Clone)]
#[clap(version)]
pub struct JVMArgs {
    #[clap(long, help = "root of the runtime library classes, searched before the classpath")]
    runtime_classpath: Vec<PathBuf>,
    #[clap(short, long, help = "the classpath")]
    classpath: Vec<PathBuf>,
    #[clap(short, long, help = "the main class")]
    main: String,
    #[clap(long, help = "heap size in bytes", default_value_t = DEFAULT_HEAP_SIZE)]
    heap_size: u64,
    #[clap(long, help = "how deep below a classpath root class files are looked for", default_value_t = DEFAULT_MAX_DEPTH)]
    classpath_depth: usize,
    #[clap(long, help = "log every executed instruction at trace level")]
    trace_instructions: bool,
    #[clap(long, help = "off, error, warn, info, debug or trace", default_value = "info")]
    log_level: LevelFilter,
}

impl JVMArgs {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// Accepts `a.b.C` as well as `a/b/C`.
    pub fn main_class_name(&self) -> ClassName {
        ClassName::from_binary_name(&self.main)
    }

    pub fn classpath(&self) -> Classpath {
        let mut classpath = Classpath::from_roots(self.runtime_classpath.iter().chain(self.classpath.iter()).cloned());
        classpath.max_depth = self.classpath_depth;
        classpath
    }

    pub fn to_jvm_options(&self) -> JVMOptions {
        JVMOptions::new(self.main_class_name(), self.classpath(), self.heap_size, self.trace_instructions)
    }
}

#[cfg(test)]
mod test;
