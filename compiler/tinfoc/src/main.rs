//! `tinfoc` command-line entry point.

use std::path::{Path, PathBuf};

use tinfoc::commands::{
    check_files, copy_types, dump_file, roundtrip_file, CliError, CliOptions,
};

fn main() {
    tinfoc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "dump" => {
            let options = parse_or_exit(&args[2..]);
            let [path] = options.positional.as_slice() else {
                eprintln!("Usage: tinfoc dump <file> [--expand-aliases] [--version=M.m.p]");
                std::process::exit(1);
            };
            print!("{}", or_exit(dump_file(Path::new(path), &options)));
        }
        "roundtrip" => {
            let options = parse_or_exit(&args[2..]);
            let [path] = options.positional.as_slice() else {
                eprintln!("Usage: tinfoc roundtrip <file> [--version=M.m.p]");
                std::process::exit(1);
            };
            let report = or_exit(roundtrip_file(Path::new(path), &options));
            match report.first_difference {
                None => println!("ok: {} nodes, {} octets", report.nodes, report.octets),
                Some(offset) => {
                    eprintln!(
                        "{path}: re-encoding differs from the input at octet {offset} \
                         ({} nodes, {} octets)",
                        report.nodes, report.octets
                    );
                    std::process::exit(1);
                }
            }
        }
        "check" => {
            let options = parse_or_exit(&args[2..]);
            if options.positional.is_empty() {
                eprintln!("Usage: tinfoc check <file>... [--version=M.m.p]");
                std::process::exit(1);
            }
            let paths: Vec<PathBuf> = options.positional.iter().map(PathBuf::from).collect();
            let mut failed = 0;
            for report in check_files(&paths, &options) {
                match report.outcome {
                    Ok(checked) => println!(
                        "{}: ok, {} nodes, fingerprint {:08x}",
                        report.path.display(),
                        checked.nodes,
                        checked.fingerprint
                    ),
                    Err(err) => {
                        eprintln!("{err}");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                eprintln!("{failed} of {} files failed", paths.len());
                std::process::exit(1);
            }
        }
        "copy" => {
            let options = parse_or_exit(&args[2..]);
            let [path, indices @ ..] = options.positional.as_slice() else {
                eprintln!("Usage: tinfoc copy <file> <index>... [-o <out>] [--version=M.m.p]");
                std::process::exit(1);
            };
            if indices.is_empty() {
                eprintln!("error: missing node index");
                eprintln!("Usage: tinfoc copy <file> <index>... [-o <out>] [--version=M.m.p]");
                std::process::exit(1);
            }
            let report = or_exit(copy_types(Path::new(path), indices, &options));
            match (&options.output, report.written) {
                (Some(out), Some(written)) => println!(
                    "wrote {} nodes ({written} octets) to {}",
                    report.chunk.len(),
                    out.display()
                ),
                _ => print!("{}", report.chunk.dump(options.flags)),
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("tinfoc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_or_exit(args: &[String]) -> CliOptions {
    or_exit(CliOptions::parse(args))
}

fn or_exit<T>(result: Result<T, CliError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("tinfoc: inspect type-info chunk files");
    println!();
    println!("Usage: tinfoc <command> [options]");
    println!();
    println!("Commands:");
    println!("  dump <file>              Print every node of the chunk");
    println!("  roundtrip <file>         Decode, re-encode and compare with the input");
    println!("  check <file>...          Validate files and print their fingerprints");
    println!("  copy <file> <index>...   Extract nodes and what they reach");
    println!("  help                     Show this help message");
    println!("  version                  Show version information");
    println!();
    println!("Options:");
    println!("  --version=M.m.p          Wire format version (default: 0.1.4)");
    println!("  --expand-aliases         Print aliases as `Name => target`");
    println!("  -o <path>                Output file for `copy`");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=tinfo_types=debug) for trace output.");
}
