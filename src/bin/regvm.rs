//! Register machine runner CLI.
//!
//! Reads a program file, interprets it, and prints the trace to stdout.
//!
//! # Usage
//! ```text
//! regvm <program.asm> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `program.asm`: Program source file, or `-` to read stdin
//!
//! # Options
//! - `-z, --zero-registers`: Read never-written registers as 0 instead of failing
//! - `-q, --quiet`: Only log errors to stderr
//!
//! # Environment
//! - `REGVM_ZERO_REGISTERS`: Same as `--zero-registers` when set to a truthy value
//! - `REGVM_LOG`: Minimum log level (`info`, `warn`, `error`, `off`)
//! - `REGVM_LOG_TIMESTAMP`: Set to `0` to hide log timestamps
//!
//! # Exit status
//! - `0`: program ran without errors
//! - `1`: usage or I/O error
//! - `2`: program produced errors

use regvm::utils::log::{self, Level};
use regvm::virtual_machine::parser::read_program;
use regvm::virtual_machine::table::InstructionTable;
use regvm::virtual_machine::vm::{ExecConfig, RegisterReadPolicy, run_program};
use regvm::{error, info};
use std::env;
use std::io::{self, Read};
use std::process;
use std::sync::Arc;

const STDIN_PATH: &str = "-";

fn main() {
    log::init_from_env();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let input_path = &args[1];
    let mut config = ExecConfig::from_env();

    for arg in &args[2..] {
        match arg.as_str() {
            "--zero-registers" | "-z" => {
                config = config.with_register_reads(RegisterReadPolicy::ZeroDefault);
            }
            "--quiet" | "-q" => log::set_min_level(Level::Error),
            other => {
                error!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let source = if input_path == STDIN_PATH {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            error!("Failed to read program from stdin: {}", e);
            process::exit(1);
        }
        buf
    } else {
        read_program(input_path).unwrap_or_else(|e| {
            error!("{e}");
            process::exit(1)
        })
    };

    info!(
        "Running {} ({} lines, register reads: {:?})",
        input_path,
        source.lines().count(),
        config.register_reads
    );

    let table = Arc::new(InstructionTable::standard());
    let result = run_program(table, config, &source);

    print!("{}", result.trace());

    if !result.should_compile() {
        error!(
            "{} finished with {} error(s)",
            input_path,
            result.output.errors().len()
        );
        process::exit(2);
    }
}

const USAGE: &str = "\
Register Machine Interpreter

USAGE:
    {program} <program.asm> [OPTIONS]

ARGS:
    <program.asm>    Program source file (use - for stdin)

OPTIONS:
    -z, --zero-registers    Read never-written registers as 0
    -q, --quiet             Only log errors
    -h, --help              Print this help message

EXAMPLES:
    # Run a program
    {program} program.asm

    # Run from stdin with zero-default registers
    cat program.asm | {program} - -z
";

fn print_usage(program: &str) {
    info!("{}", USAGE.replace("{program}", program));
}
