//! Quill CLI.

use quillc::commands::{hir_file, lex_file, parse_file, parse_run_options, run_file};

fn main() {
    quillc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: quillc run <file.qy> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --no-prelude        Run without the standard prelude");
                eprintln!("  --step-limit=<n>    Abort after n instructions");
                std::process::exit(1);
            }
            let options = match parse_run_options(&args[3..]) {
                Ok(options) => options,
                Err(msg) => {
                    eprintln!("error: {msg}");
                    std::process::exit(1);
                }
            };
            run_file(&args[2], &options);
        }
        "hir" => {
            if args.len() < 3 {
                eprintln!("Usage: quillc hir <file.qy> [--json]");
                std::process::exit(1);
            }
            let json = match args.get(3).map(String::as_str) {
                None => false,
                Some("--json") => true,
                Some(other) => {
                    eprintln!("error: unknown option '{other}'");
                    std::process::exit(1);
                }
            };
            hir_file(&args[2], json);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: quillc parse <file.qy>");
                std::process::exit(1);
            }
            parse_file(&args[2]);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: quillc lex <file.qy>");
                std::process::exit(1);
            }
            lex_file(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("quillc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Quill interpreter");
    println!();
    println!("Usage: quillc <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <file>     Run a program");
    println!("  hir <file>     Dump the generated HIR (--json for JSON)");
    println!("  parse <file>   Dump the folded statement tree");
    println!("  lex <file>     Dump tokens");
    println!("  help           Show this message");
    println!("  version        Show version information");
}
