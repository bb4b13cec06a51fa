fn main() {
    let _logging = quickswitch_core::logging::init("info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match quickswitch_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[quickswitch-core] {error}");
            eprintln!("usage: quickswitch-core [--config <path>] [--snapshot <path>]");
            std::process::exit(2);
        }
    };

    if let Err(error) = quickswitch_core::runtime::run_with_options(options) {
        tracing::error!(event = "runtime_failed", %error);
        eprintln!("[quickswitch-core] runtime failed: {error}");
        std::process::exit(1);
    }
}
