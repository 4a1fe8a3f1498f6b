fn main() {
    if let Err(err) = survey_warehouse::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
