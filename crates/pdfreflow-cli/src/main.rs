mod cli;
mod meta_cmd;
mod page_range;
mod shared;
mod tables_cmd;
mod text_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Text {
            ref file,
            ref pages,
            ref format,
            ref reflow,
        } => text_cmd::run(file, pages.as_deref(), format, &reflow.to_options()),
        cli::Commands::Tables {
            ref file,
            ref pages,
            ref format,
            ref reflow,
        } => tables_cmd::run(file, pages.as_deref(), format, &reflow.to_options()),
        cli::Commands::Meta {
            ref file,
            ref pages,
            ref reflow,
        } => meta_cmd::run(file, pages.as_deref(), &reflow.to_options()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
