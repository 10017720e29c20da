use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = reloc_cli::cli().get_matches();
    reloc_cli::init_logging(&matches);

    let stdout = std::io::stdout();
    match reloc_cli::run(&matches, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
