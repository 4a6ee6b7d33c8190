//! CLI argument definitions

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "symindex",
    about = "Inspect the symbol index of the current process image",
    after_help = "\
EXAMPLES:
    symindex                         Summary of indexed objects and symbols
    symindex --objects               List every loaded object with its range
    symindex 0x7f83a2b4c780          Resolve an address of this process
    symindex --symbols | head        Dump the symbol table, sorted by address"
)]
pub struct Args {
    /// Addresses to resolve (hex, with or without 0x prefix)
    #[arg(value_name = "ADDRESS")]
    pub addresses: Vec<String>,

    /// List every loaded object with its address range
    #[arg(long)]
    pub objects: bool,

    /// Dump all indexed symbols, sorted by address
    #[arg(long)]
    pub symbols: bool,

    /// Print raw mangled names instead of demangled ones
    #[arg(long)]
    pub no_demangle: bool,

    /// Suppress the summary line
    #[arg(short, long)]
    pub quiet: bool,
}
