use std::io::Write;

use log::LevelFilter;

/// Install the stderr logger. `RUST_LOG`, when set, overrides the level chosen here.
pub fn init(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "smallsh: {}", record.args()));

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // A logger may already be installed (tests); keep that one.
    let _ = builder.try_init();
}
