//! # symindex - Main Entry Point
//!
//! Diagnostic tool that builds the symbol index of its own process image
//! and answers queries against it: list loaded objects, dump the symbol
//! table, or resolve hex addresses to `(symbol, offset, object)` triples.
//! Mostly useful to verify what the index can and cannot see on a given
//! system (stripped binaries, split debug info, static executables).

use anyhow::{Context, Result};
use clap::Parser;

use symindex::cli::Args;
use symindex::{Symbol, SymbolIndex};

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            EXIT_ERROR
        }
    });
}

fn run() -> Result<()> {
    let args = Args::parse();

    let index = SymbolIndex::of_current_process();

    if !args.quiet {
        println!("{} objects, {} symbols", index.objects().len(), index.symbols().len());
    }

    if args.objects {
        for object in index.objects() {
            println!(
                "0x{:016x}-0x{:016x} {}",
                object.address_begin,
                object.address_end,
                object.name.display()
            );
        }
    }

    if args.symbols {
        for symbol in index.symbols() {
            println!(
                "0x{:016x}-0x{:016x} {}",
                symbol.address_begin,
                symbol.address_end,
                display_name(symbol, args.no_demangle)
            );
        }
    }

    for address in &args.addresses {
        let address = parse_address(address)?;
        print_resolution(&index, address, args.no_demangle);
    }

    Ok(())
}

fn print_resolution(index: &SymbolIndex, address: u64, no_demangle: bool) {
    let object = index
        .find_object(address)
        .map_or_else(|| "<unknown object>".to_string(), |o| o.name.display().to_string());

    match index.find_symbol(address) {
        Some(symbol) => {
            println!(
                "0x{address:016x} {} + 0x{:x} ({object})",
                display_name(symbol, no_demangle),
                address - symbol.address_begin
            );
        }
        None => println!("0x{address:016x} <unknown symbol> ({object})"),
    }
}

fn display_name(symbol: &Symbol, no_demangle: bool) -> String {
    if no_demangle {
        symbol.name.clone()
    } else {
        symbol.demangled()
    }
}

fn parse_address(input: &str) -> Result<u64> {
    let digits = input.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(digits, 16).with_context(|| format!("Invalid address: {input}"))
}
