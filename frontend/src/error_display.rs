use shared::DashboardError;

/// Dashboard errors never interrupt the page; they only reach the console.
pub fn log_error_console_only(error: &DashboardError) {
    if error.is_silent() {
        return;
    }
    match error {
        DashboardError::NetworkTimeout => zoon::println!("Error: {}", error),
        _ => zoon::eprintln!("Error: {}", error),
    }
}
