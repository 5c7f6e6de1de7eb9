use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;

use jvm_args::JVMArgs;
use slow_interpreter::jvm_state::JVMState;

fn main() -> anyhow::Result<()> {
    let args = JVMArgs::parse();
    SimpleLogger::new().with_level(args.log_level()).init()?;
    let options = args.to_jvm_options();
    let main_class = options.main_class_name().clone();
    let mut jvm = JVMState::from_options(options);
    jvm.execute(&main_class)?;
    info!("{} finished", main_class);
    Ok(())
}
