//! Bonnet command line host.
mod cli;

fn main() {
    cli::Entry::main();
}
