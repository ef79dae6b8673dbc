mod export;
mod runner;
mod runtime_errors;
pub(crate) mod summary;


pub(crate) use runner::run_local;
pub(crate) use runtime_errors::print_runtime_errors;
