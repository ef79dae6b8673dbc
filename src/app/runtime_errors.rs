pub(crate) fn print_runtime_errors(errors: &[String]) {
    eprintln!("Runtime errors ({}):", errors.len());
    for error in errors {
        eprintln!("- {}", error);
    }
}
