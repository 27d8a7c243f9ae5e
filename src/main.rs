fn main() {
    env_logger::builder().init();

    // 1. Parse commandline arguments
    let cli = coords3d::args::parse_cli_args();

    // 2. Run the requested process
    if let Err(err) = coords3d::handle_cli(cli) {
        println!("PROCESS ERROR!");
        println!("{}", err);
        std::process::exit(1);
    }
}
