use smallsh::error::ShellError;
use smallsh::flags::Flags;
use smallsh::shell::Shell;
use std::env;

fn run() -> Result<(), ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("smallsh {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    smallsh::logging::init(flags.is_set("debug"));

    let mut shell = Shell::new(&flags)?;
    shell.run()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("smallsh: {}", e);
        std::process::exit(1);
    }
}
