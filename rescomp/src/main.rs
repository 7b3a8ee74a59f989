// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    anyhow::{anyhow, Result},
    clap::{Arg, ArgMatches, Command},
    log::LevelFilter,
    std::path::PathBuf,
};

const COMPILE_ABOUT: &str = "\
Compile a resource definition file.

The CONFIG argument is a JSON file declaring a namespace and an ordered
list of resource categories. Compilation packs every category into a
single binary image and writes three artifacts into the output
directory: the image, a master index JSON, and accessor specifications
for categories that request a specialized manager.

Output is deterministic: recompiling unchanged definitions reproduces
every artifact byte for byte.
";

const VERIFY_ABOUT: &str = "\
Verify compiled artifacts against a definition file.

Recompiles the definitions in memory and byte-compares the result with
the artifacts in the output directory. Fails if any artifact is missing
or stale. Useful in CI to catch generated files that were not
regenerated after a definition change.
";

fn config_path(args: &ArgMatches) -> PathBuf {
    PathBuf::from(args.value_of_os("config").expect("config arg is required"))
}

fn output_dir(args: &ArgMatches) -> PathBuf {
    PathBuf::from(args.value_of_os("output_dir").expect("output dir has a default"))
}

fn command_compile(args: &ArgMatches) -> Result<()> {
    rescomp::compile::compile(&config_path(args), &output_dir(args))?;
    Ok(())
}

fn command_verify(args: &ArgMatches) -> Result<()> {
    rescomp::compile::verify(&config_path(args), &output_dir(args))
}

fn main_impl() -> Result<()> {
    let app = Command::new("rescomp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile firmware resource tables into a packed image and typed index")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .multiple_occurrences(true)
                .help("Increase logging verbosity. Can be specified multiple times."),
        );

    let app = app.subcommand(
        Command::new("compile")
            .about("Compile definitions into image, index, and manager artifacts")
            .long_about(COMPILE_ABOUT)
            .arg(
                Arg::new("config")
                    .required(true)
                    .allow_invalid_utf8(true)
                    .help("Path to the resource definition JSON file"),
            )
            .arg(
                Arg::new("output_dir")
                    .short('o')
                    .long("output-dir")
                    .takes_value(true)
                    .allow_invalid_utf8(true)
                    .default_value(".")
                    .help("Directory to write artifacts into"),
            ),
    );

    let app = app.subcommand(
        Command::new("verify")
            .about("Check that existing artifacts match the definitions")
            .long_about(VERIFY_ABOUT)
            .arg(
                Arg::new("config")
                    .required(true)
                    .allow_invalid_utf8(true)
                    .help("Path to the resource definition JSON file"),
            )
            .arg(
                Arg::new("output_dir")
                    .short('o')
                    .long("output-dir")
                    .takes_value(true)
                    .allow_invalid_utf8(true)
                    .default_value(".")
                    .help("Directory holding previously compiled artifacts"),
            ),
    );

    let matches = app.get_matches();

    let log_level = match matches.occurrences_of("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.as_str()),
    );

    // Disable log context except at higher log levels.
    if log_level <= LevelFilter::Info {
        builder
            .format_timestamp(None)
            .format_level(false)
            .format_target(false);
    }

    builder.init();

    match matches.subcommand() {
        Some(("compile", args)) => command_compile(args),
        Some(("verify", args)) => command_verify(args),
        _ => Err(anyhow!("invalid sub-command")),
    }
}

fn main() {
    let exit_code = match main_impl() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            1
        }
    };

    std::process::exit(exit_code)
}
